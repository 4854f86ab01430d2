// src/message.rs
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}

/// Reply from `/chat`. Decoding is lenient: `null` or missing fields fall back
/// to empty values instead of failing the whole response.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ChatResponse {
    /// The server-signaled failure, if `error` is truthy: not null, `false`,
    /// zero or the empty string.
    pub fn server_error(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            other => Some(display_value(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub doc_title: String,
    #[serde(default)]
    pub chunk: ChunkId,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub corpus: Option<String>,
}

impl Citation {
    pub fn new(doc_title: impl Into<String>, chunk: impl Into<ChunkId>) -> Self {
        Self {
            doc_title: doc_title.into(),
            chunk: chunk.into(),
            source: None,
            corpus: None,
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.doc_title, self.chunk)
    }
}

/// Chunk reference into the document store. Backends send either an index or a
/// name; anything else is kept as raw JSON and shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    Index(u64),
    Name(String),
    Other(Value),
}

impl Default for ChunkId {
    fn default() -> Self {
        ChunkId::Other(Value::Null)
    }
}

impl From<u64> for ChunkId {
    fn from(value: u64) -> Self {
        ChunkId::Index(value)
    }
}

impl From<&str> for ChunkId {
    fn from(value: &str) -> Self {
        ChunkId::Name(value.to_string())
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkId::Index(i) => write!(f, "{i}"),
            ChunkId::Name(s) => f.write_str(s),
            ChunkId::Other(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Strings verbatim, other JSON values in their JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(display_value(&other)),
    })
}
