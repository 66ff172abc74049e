use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field name to user-facing message, reported inline next to each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.to_string());
        Self(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Coarse classification used to pick the reporting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inline next to the field, no network call was made
    Validation,
    /// Transient toast, state unchanged
    Network,
    /// Same path as `Network`, message from the payload
    ServerRejection,
    /// Local setup problems (config, files, user cancelled)
    Local,
}

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{message}")]
    ServerRejection { message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Missing {0}")]
    MissingEntity(&'static str),

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Delete cancelled")]
    DeleteCancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    pub fn rejected(message: impl Into<String>) -> Self {
        StudioError::ServerRejection {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StudioError::Validation(_) => ErrorKind::Validation,
            StudioError::Network(_) | StudioError::Http { .. } | StudioError::Decode(_) => {
                ErrorKind::Network
            }
            StudioError::ServerRejection { .. } => ErrorKind::ServerRejection,
            StudioError::MissingEntity(_)
            | StudioError::SaveInFlight
            | StudioError::DeleteCancelled
            | StudioError::Config(_)
            | StudioError::Io(_) => ErrorKind::Local,
        }
    }

    /// Text shown to the user in a notification
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Validation(errors) => errors.to_string(),
            StudioError::ServerRejection { message } => message.clone(),
            StudioError::Http { message, .. } if !message.is_empty() => message.clone(),
            StudioError::Http { status, .. } => format!("Request failed with HTTP {status}"),
            StudioError::Network(_) => "Could not reach the course service".to_string(),
            other => other.to_string(),
        }
    }
}

pub type StudioResult<T> = Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_is_shown_verbatim() {
        let err = StudioError::rejected("duration required");
        assert_eq!(err.kind(), ErrorKind::ServerRejection);
        assert_eq!(err.user_message(), "duration required");
    }

    #[test]
    fn test_http_failures_classify_as_network() {
        let err = StudioError::Http {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.user_message(), "Request failed with HTTP 502");
    }

    #[test]
    fn test_validation_message_joins_fields() {
        let mut errors = ValidationErrors::single("Name", "Course name is required");
        errors
            .0
            .insert("Description".to_string(), "Description is required".to_string());
        let err = StudioError::Validation(errors);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.user_message(),
            "Description is required; Course name is required"
        );
    }
}
