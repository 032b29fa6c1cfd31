//! Error types for the event administration client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("No event selected. Set EVENTADMIN_EVENT_ID or pass --event-id")]
    MissingEvent,

    #[error("Failed to parse API response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("API error (status {status_code}): {message}")]
    Api {
        status_code: u16,
        message: String,
    },

    #[error("Tag is invalid: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        AdminError::Config(err.to_string())
    }
}

impl AdminError {
    /// Message shown to the user, used as a translation key for API errors
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
