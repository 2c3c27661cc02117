use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ServerFieldErrors;

/// Uniform `{ data, meta? }` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

/// Body of a cancel response; also the shape of most error bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<ServerFieldErrors>,
}

/// A per-status count as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCount {
    Count(u64),
    /// Anything that is not a whole non-negative number, kept verbatim.
    Raw(String),
}

impl StatusCount {
    fn from_value(value: serde_json::Value) -> Self {
        if let Some(n) = value.as_u64() {
            return StatusCount::Count(n);
        }
        match value {
            serde_json::Value::String(s) => match s.trim().parse() {
                Ok(n) => StatusCount::Count(n),
                Err(_) => StatusCount::Raw(s),
            },
            other => StatusCount::Raw(other.to_string()),
        }
    }
}

impl fmt::Display for StatusCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCount::Count(n) => f.pad(&n.to_string()),
            StatusCount::Raw(s) => f.pad(s),
        }
    }
}

/// Status -> count, in the order the server listed the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary(pub Vec<(String, StatusCount)>);

impl StatusSummary {
    /// Reads `{ "pending": 3, ... }`. Every key is kept; counts that are not
    /// whole numbers (or numeric strings) are carried as raw text.
    pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let count = StatusCount::from_value(value);
                if let StatusCount::Raw(raw) = &count {
                    tracing::debug!(status = %key, value = %raw, "non-numeric status count");
                }
                (key, count)
            })
            .collect();
        Self(entries)
    }
}
