use std::collections::BTreeMap;

use reqwest::StatusCode;

/// Field name -> messages, as returned by the API on HTTP 422.
pub type ServerFieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("validation failed: {}", summarize(.errors))]
    Validation {
        errors: ServerFieldErrors,
        message: Option<String>,
    },

    #[error("server returned {status}{}", suffix(.message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ApiError {
    /// Message supplied by the server body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Validation { message, .. } | ApiError::Status { message, .. } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

fn suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {m}"),
        _ => String::new(),
    }
}

fn summarize(errors: &ServerFieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}
