use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XaiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required parameter is missing or malformed. Raised before any I/O.
    #[error("Invalid parameter `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("Request timed out after {} ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("API error {status_code} {status_text}{}", format_api_message(.message))]
    Api {
        status_code: u16,
        status_text: String,
        message: Option<String>,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

fn format_api_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

impl XaiError {
    pub fn missing(field: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: "required field is missing or empty".to_string(),
        }
    }

    pub fn malformed(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status of an `Api` error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Name of the offending field of a `Validation` error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_server_message() {
        let err = XaiError::Api {
            status_code: 401,
            status_text: "Unauthorized".to_string(),
            message: Some("bad key".to_string()),
        };
        assert_eq!(err.to_string(), "API error 401 Unauthorized: bad key");
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn api_error_display_without_message() {
        let err = XaiError::Api {
            status_code: 500,
            status_text: "Internal Server Error".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "API error 500 Internal Server Error");
    }

    #[test]
    fn timeout_display_uses_milliseconds() {
        let err = XaiError::Timeout {
            timeout: Duration::from_millis(50),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 50 ms");
    }

    #[test]
    fn missing_names_the_field() {
        let err = XaiError::missing("model");
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("model"));
        assert!(err.to_string().contains("`model`"));
    }
}
