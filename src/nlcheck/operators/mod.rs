// SPDX-License-Identifier: MIT

//! Operator library
//!
//! Operators are ordinary keywords: a check resolves its operator by name
//! through the host, so any two-argument keyword works as an operator.
//! Symbolic names (`=`, `<`, `≤`, ...) are aliases of the spelled-out ones.

pub mod basic;
pub mod sequence;
pub mod text;

use crate::host::keyword::expect_args;
use crate::host::{Host, Keyword, KeywordError};
use crate::nlcheck::runtime::{InlineArgs, KeywordRegistry};
use async_trait::async_trait;
use basic::{basic_operator, CompareOp};
use serde_json::Value;
use std::sync::Arc;

/// Library the operators are registered in
pub const OPERATOR_LIBRARY: &str = "Operators";

type OperatorFn = fn(&dyn Host, &[Value]) -> Result<bool, KeywordError>;

/// Catalogue entry of a built-in operator
pub struct OperatorDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    arity: usize,
    /// Arguments naming a keyword are run before the operator
    inline: bool,
    eval: OperatorFn,
}

/// The built-in operators
pub static OPERATORS: &[OperatorDef] = &[
    OperatorDef {
        name: "equals",
        aliases: &["="],
        description: "Checks whether the left and right side are equal to each other",
        arity: 2,
        inline: false,
        eval: |host, args| basic_operator(host, CompareOp::Eq, &args[0], &args[1]),
    },
    OperatorDef {
        name: "is less than",
        aliases: &["<"],
        description: "Checks whether the left side is smaller than the right side",
        arity: 2,
        inline: false,
        eval: |host, args| basic_operator(host, CompareOp::Lt, &args[0], &args[1]),
    },
    OperatorDef {
        name: "is greater than",
        aliases: &[">"],
        description: "Checks whether the left side is larger than the right side",
        arity: 2,
        inline: false,
        eval: |host, args| basic_operator(host, CompareOp::Gt, &args[0], &args[1]),
    },
    OperatorDef {
        name: "is less than or equal to",
        aliases: &["≤"],
        description: "Checks whether the left side is less than or equal to the right side",
        arity: 2,
        inline: false,
        eval: |host, args| basic_operator(host, CompareOp::Lte, &args[0], &args[1]),
    },
    OperatorDef {
        name: "is greater than or equal to",
        aliases: &["≥"],
        description: "Checks whether the left side is greater than or equal to the right side",
        arity: 2,
        inline: false,
        eval: |host, args| basic_operator(host, CompareOp::Gte, &args[0], &args[1]),
    },
    OperatorDef {
        name: "does not equal",
        aliases: &["≠"],
        description: "Checks whether the left side is different from the right side",
        arity: 2,
        inline: false,
        eval: |host, args| basic_operator(host, CompareOp::NotEq, &args[0], &args[1]),
    },
    OperatorDef {
        name: "contains text",
        aliases: &[],
        description: "Case insensitive check whether the right side is a substring of the left side",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(text::contains_text(&args[0], &args[1])),
    },
    OperatorDef {
        name: "contains exact text",
        aliases: &[],
        description: "Case sensitive check whether the right side is a substring of the left side",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(text::contains_exact_text(&args[0], &args[1])),
    },
    OperatorDef {
        name: "matches without case to",
        aliases: &[],
        description: "Case insensitive check whether the left and right side texts are equal",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(text::matches_without_case_to(&args[0], &args[1])),
    },
    OperatorDef {
        name: "matches with case to",
        aliases: &[],
        description: "Case sensitive check whether the left and right side texts are equal",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(text::matches_with_case_to(&args[0], &args[1])),
    },
    OperatorDef {
        name: "does not contain text",
        aliases: &[],
        description: "Case insensitive check whether the right side is not a substring of the left side",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(!text::contains_text(&args[0], &args[1])),
    },
    OperatorDef {
        name: "does not contain exact text",
        aliases: &[],
        description: "Case sensitive check whether the right side is not a substring of the left side",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(!text::contains_exact_text(&args[0], &args[1])),
    },
    OperatorDef {
        name: "does not match without case to",
        aliases: &[],
        description: "Case insensitive check whether the left and right side texts are different",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(!text::matches_without_case_to(&args[0], &args[1])),
    },
    OperatorDef {
        name: "does not match with case to",
        aliases: &[],
        description: "Case sensitive check whether the left and right side texts are different",
        arity: 2,
        inline: false,
        eval: |_, args| Ok(!text::matches_with_case_to(&args[0], &args[1])),
    },
    OperatorDef {
        name: "is empty",
        aliases: &[],
        description: "Checks whether the sequence on the left does not contain any items",
        arity: 1,
        inline: false,
        eval: |_, args| sequence::is_empty(&args[0]),
    },
    OperatorDef {
        name: "contains ${n} items",
        aliases: &["counts ${n} elements"],
        description: "Checks whether the sequence on the left contains ${n} items",
        arity: 2,
        inline: true,
        eval: |host, args| sequence::contains_n_items(host, &args[0], &args[1]),
    },
    OperatorDef {
        name: "contains 1 item",
        aliases: &[],
        description: "Checks whether the sequence on the left contains exactly one item",
        arity: 1,
        inline: false,
        eval: |host, args| sequence::contains_n_items(host, &Value::from(1), &args[0]),
    },
    OperatorDef {
        name: "contains",
        aliases: &[],
        description: "Checks whether part is present in sequence, without type conversion",
        arity: 2,
        inline: false,
        eval: |_, args| sequence::contains(&args[0], &args[1]),
    },
    OperatorDef {
        name: "does not contain",
        aliases: &[],
        description: "Checks whether part is absent from sequence, without type conversion",
        arity: 2,
        inline: false,
        eval: |_, args| sequence::contains(&args[0], &args[1]).map(|found| !found),
    },
    OperatorDef {
        name: "contains item",
        aliases: &["contains items"],
        description: "Checks whether the right side item(s) are part of the sequence on the left side",
        arity: 2,
        inline: false,
        eval: |host, args| sequence::contains_item(host, &args[0], &args[1]),
    },
    OperatorDef {
        name: "contains exactly the items from",
        aliases: &[],
        description: "Checks whether both sides contain the same items, in any order",
        arity: 2,
        inline: false,
        eval: |host, args| sequence::contains_exactly_the_items_from(host, &args[0], &args[1]),
    },
    OperatorDef {
        name: "does not contain item",
        aliases: &[],
        description: "Checks whether the right side item is not part of the sequence on the left side",
        arity: 2,
        inline: false,
        eval: |host, args| sequence::does_not_contain_item(host, &args[0], &args[1]),
    },
];

/// Keyword running a catalogue operator
pub struct Operator {
    def: &'static OperatorDef,
}

impl Operator {
    pub fn new(def: &'static OperatorDef) -> Self {
        Self { def }
    }
}

#[async_trait]
impl Keyword for Operator {
    fn name(&self) -> &str {
        self.def.name
    }

    fn description(&self) -> &str {
        self.def.description
    }

    async fn run(&self, host: &dyn Host, args: Vec<Value>) -> Result<Value, KeywordError> {
        expect_args(self.def.name, &args, self.def.arity)?;
        (self.def.eval)(host, &args).map(Value::Bool)
    }
}

/// Register every built-in operator and its aliases
pub async fn register_operators(registry: &KeywordRegistry) {
    for def in OPERATORS {
        let operator: Arc<dyn Keyword> = Arc::new(Operator::new(def));
        let keyword: Arc<dyn Keyword> = if def.inline {
            Arc::new(InlineArgs::new(operator))
        } else {
            operator
        };
        registry
            .register_in(OPERATOR_LIBRARY, keyword.clone())
            .await;
        for alias in def.aliases {
            registry
                .register_alias(OPERATOR_LIBRARY, alias, keyword.clone())
                .await;
        }
    }
    log::debug!("Registered {} operators", OPERATORS.len());
}

/// Names and descriptions of the registered operators, aliases included
pub async fn catalogue(registry: &KeywordRegistry) -> Vec<(String, String)> {
    registry
        .keywords()
        .await
        .into_iter()
        .filter(|(library, _)| library == OPERATOR_LIBRARY)
        .map(|(_, keyword)| (keyword.name().to_string(), keyword.description().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::console::ScriptedConsole;
    use crate::nlcheck::runtime::Runtime;
    use serde_json::json;

    async fn runtime() -> Runtime {
        let rt = Runtime::new(Arc::new(ScriptedConsole::new(Vec::<String>::new())));
        register_operators(rt.registry()).await;
        rt
    }

    #[tokio::test]
    async fn test_symbolic_aliases() {
        let rt = runtime().await;
        for (name, left, right) in [
            ("=", json!(7), json!("7.0")),
            ("<", json!(2), json!("4")),
            (">", json!(4), json!("2")),
            ("≤", json!(2), json!("2")),
            ("≥", json!(4), json!("4")),
            ("≠", json!(7), json!("13")),
        ] {
            let result = rt.run_keyword(name, vec![left, right]).await.unwrap();
            assert_eq!(result, json!(true), "operator {}", name);
        }
    }

    #[tokio::test]
    async fn test_embedded_count() {
        let rt = runtime().await;
        let suitcase = json!(["toothbrush", "t-shirt"]);
        assert_eq!(
            rt.run_keyword("contains 2 items", vec![suitcase.clone()]).await.unwrap(),
            json!(true)
        );
        assert_eq!(
            rt.run_keyword("counts 3 elements", vec![suitcase]).await.unwrap(),
            json!(false)
        );
        assert_eq!(
            rt.run_keyword("contains 1 item", vec![json!(["toothbrush"])]).await.unwrap(),
            json!(true)
        );
    }

    #[tokio::test]
    async fn test_only_counted_items_run_keyword_arguments() {
        let rt = runtime().await;
        rt.registry()
            .register(Arc::new(crate::host::keyword::FnKeyword::new(
                "the suitcase",
                "A suitcase with one item",
                |_, _| Ok(json!(["toothbrush"])),
            )))
            .await;

        // `the suitcase` runs and yields one item
        assert_eq!(
            rt.run_keyword("contains 1 items", vec![json!("the suitcase")])
                .await
                .unwrap(),
            json!(true)
        );
        // Taken as text of twelve characters
        assert_eq!(
            rt.run_keyword("contains 1 item", vec![json!("the suitcase")])
                .await
                .unwrap(),
            json!(false)
        );
    }

    #[tokio::test]
    async fn test_plural_alias() {
        let rt = runtime().await;
        let result = rt
            .run_keyword("contains items", vec![json!([1, 2]), json!(["2", "1"])])
            .await
            .unwrap();
        assert_eq!(result, json!(true));
    }

    #[tokio::test]
    async fn test_wrong_argument_count() {
        let rt = runtime().await;
        let err = rt.run_keyword("equals", vec![json!(1)]).await.unwrap_err();
        assert!(matches!(err, KeywordError::Arguments { given: 1, .. }));
    }

    #[tokio::test]
    async fn test_catalogue_lists_aliases() {
        let rt = runtime().await;
        let names: Vec<String> = catalogue(rt.registry())
            .await
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert!(names.contains(&"equals".to_string()));
        assert!(names.contains(&"=".to_string()));
        assert!(names.contains(&"counts ${n} elements".to_string()));
        let aliases: usize = OPERATORS.iter().map(|def| def.aliases.len()).sum();
        assert_eq!(aliases, 8);
        assert_eq!(names.len(), OPERATORS.len() + aliases);
    }
}
