//! Raw request environment.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::upload::FileInput;

/// Raw data a server extracted for one request.
///
/// Every collection defaults to empty. Server variables may be given as any JSON
/// scalar and are kept as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Server and transport variables (`REQUEST_METHOD`, `HTTP_HOST` ...).
    #[serde(deserialize_with = "scalar_strings")]
    pub server: IndexMap<String, String>,
    /// Query string parameters.
    pub get: IndexMap<String, Value>,
    /// Form body parameters.
    pub post: IndexMap<String, Value>,
    pub cookie: IndexMap<String, String>,
    /// Upload data keyed by field name.
    pub files: IndexMap<String, FileInput>,
}

impl Environment {
    /// Load an environment from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn scalar_strings<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) => text,
                Value::Null => String::new(),
                Value::Bool(flag) => (if flag { "1" } else { "" }).to_string(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}
