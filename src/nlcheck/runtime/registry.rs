// SPDX-License-Identifier: MIT

use crate::host::keyword::Alias;
use crate::host::{Keyword, Resolution};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Library used by [`KeywordRegistry::register`]
pub const GLOBAL_LIBRARY: &str = "Global";

static EMBEDDED_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("embedded argument pattern is valid"));

/// Keyword names compare case-insensitively, ignoring spaces and underscores
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A keyword matched by name, with the arguments embedded in that name
#[derive(Clone)]
pub struct ResolvedKeyword {
    pub keyword: Arc<dyn Keyword>,
    pub embedded: Vec<Value>,
}

/// Result of a registry lookup
#[derive(Clone)]
pub enum Lookup {
    Unique(ResolvedKeyword),
    Ambiguous(Vec<String>),
    Missing,
}

impl Lookup {
    pub fn resolution(&self) -> Resolution {
        match self {
            Lookup::Unique(_) => Resolution::Found,
            Lookup::Ambiguous(_) => Resolution::Ambiguous,
            Lookup::Missing => Resolution::NotFound,
        }
    }
}

struct Entry {
    library: String,
    keyword: Arc<dyn Keyword>,
}

impl Entry {
    fn full_name(&self) -> String {
        format!("{}.{}", self.library, self.keyword.name())
    }
}

struct EmbeddedEntry {
    entry: Entry,
    pattern: Regex,
}

#[derive(Default)]
struct RegistryInner {
    exact: HashMap<String, Vec<Entry>>,
    embedded: Vec<EmbeddedEntry>,
}

/// Name-keyed keyword table shared by the runtime
#[derive(Clone)]
pub struct KeywordRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl KeywordRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
        }
    }

    pub async fn register(&self, keyword: Arc<dyn Keyword>) {
        self.register_in(GLOBAL_LIBRARY, keyword).await;
    }

    /// Register a keyword in a library. A keyword with the same name in the
    /// same library is replaced.
    pub async fn register_in(&self, library: &str, keyword: Arc<dyn Keyword>) {
        let mut inner = self.inner.write().await;
        let key = normalize(keyword.name());
        let entry = Entry {
            library: library.to_string(),
            keyword,
        };

        if EMBEDDED_ARG.is_match(entry.keyword.name()) {
            let pattern = embedded_pattern(entry.keyword.name());
            inner.embedded.retain(|e| {
                !(e.entry.library == library && normalize(e.entry.keyword.name()) == key)
            });
            inner.embedded.push(EmbeddedEntry { entry, pattern });
        } else {
            let entries = inner.exact.entry(key).or_default();
            entries.retain(|e| e.library != library);
            entries.push(entry);
        }
    }

    /// Register `keyword` under an additional name
    pub async fn register_alias(&self, library: &str, alias: &str, keyword: Arc<dyn Keyword>) {
        self.register_in(library, Arc::new(Alias::new(alias, keyword)))
            .await;
    }

    /// Find the keyword for `name`.
    ///
    /// Exact names win over embedded-argument names. `Library.Keyword`
    /// selects one library when a name exists in several.
    pub async fn lookup(&self, name: &str) -> Lookup {
        let inner = self.inner.read().await;
        let found = inner.lookup(None, name);
        if !matches!(found, Lookup::Missing) {
            return found;
        }
        match name.split_once('.') {
            Some((library, keyword)) if !library.trim().is_empty() => {
                inner.lookup(Some(library.trim()), keyword.trim())
            }
            _ => Lookup::Missing,
        }
    }

    /// The keyword for `name`, when the name is unambiguous
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Keyword>> {
        match self.lookup(name).await {
            Lookup::Unique(resolved) => Some(resolved.keyword),
            _ => None,
        }
    }

    /// All registered keywords as `(library, keyword)`, sorted by library
    /// and name
    pub async fn keywords(&self) -> Vec<(String, Arc<dyn Keyword>)> {
        let inner = self.inner.read().await;
        let mut all: Vec<(String, Arc<dyn Keyword>)> = inner
            .exact
            .values()
            .flatten()
            .chain(inner.embedded.iter().map(|e| &e.entry))
            .map(|e| (e.library.clone(), e.keyword.clone()))
            .collect();
        all.sort_by(|a, b| {
            (a.0.as_str(), a.1.name().to_lowercase()).cmp(&(b.0.as_str(), b.1.name().to_lowercase()))
        });
        all
    }
}

impl RegistryInner {
    fn lookup(&self, library: Option<&str>, name: &str) -> Lookup {
        let in_library = |entry: &Entry| {
            library.map_or(true, |lib| normalize(lib) == normalize(&entry.library))
        };

        let exact: Vec<&Entry> = self
            .exact
            .get(&normalize(name))
            .map(|entries| entries.iter().filter(|e| in_library(*e)).collect())
            .unwrap_or_default();

        match exact.len() {
            1 => {
                return Lookup::Unique(ResolvedKeyword {
                    keyword: exact[0].keyword.clone(),
                    embedded: Vec::new(),
                })
            }
            n if n > 1 => return Lookup::Ambiguous(exact.iter().map(|e| e.full_name()).collect()),
            _ => {}
        }

        let text = name.trim();
        let matches: Vec<(&Entry, Vec<Value>)> = self
            .embedded
            .iter()
            .filter(|e| in_library(&e.entry))
            .filter_map(|e| {
                let caps = e.pattern.captures(text)?;
                let args = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| Value::String(m.as_str().to_string()))
                    .collect();
                Some((&e.entry, args))
            })
            .collect();

        match matches.len() {
            0 => Lookup::Missing,
            1 => {
                let (entry, embedded) = &matches[0];
                Lookup::Unique(ResolvedKeyword {
                    keyword: entry.keyword.clone(),
                    embedded: embedded.clone(),
                })
            }
            _ => Lookup::Ambiguous(matches.iter().map(|(e, _)| e.full_name()).collect()),
        }
    }
}

/// Regex matching a keyword name with `${arg}` placeholders
fn embedded_pattern(name: &str) -> Regex {
    let mut pattern = String::from("(?i)^");
    let mut last = 0;
    for placeholder in EMBEDDED_ARG.find_iter(name) {
        pattern.push_str(&literal_pattern(&name[last..placeholder.start()]));
        pattern.push_str("(.+?)");
        last = placeholder.end();
    }
    pattern.push_str(&literal_pattern(&name[last..]));
    pattern.push('$');
    // Built from escaped text and fixed groups only
    Regex::new(&pattern).expect("escaped keyword pattern is valid")
}

fn literal_pattern(text: &str) -> String {
    let mut out = String::new();
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push_str(r"\s+");
            }
            in_space = true;
        } else {
            out.push_str(&regex::escape(&c.to_string()));
            in_space = false;
        }
    }
    out
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::new()
    }
}
