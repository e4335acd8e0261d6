//! Keyword-or-value decision for check tokens

use crate::host::Host;
use serde_json::Value;

/// Whether `token` names a keyword. Ambiguous names count as keywords;
/// non-text tokens never do.
pub async fn is_keyword(host: &dyn Host, token: &Value) -> bool {
    match token {
        Value::String(name) => host.resolve_keyword(name).await.is_keyword(),
        _ => false,
    }
}
