//! Classified request failures.
//!
//! A connectivity failure means no response was obtained from an origin and
//! triggers fallback to the next candidate. An application failure is a real
//! answer from a reachable server and is authoritative.

use thiserror::Error;

/// Generic message when an error response carries no usable `error` field.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

/// Message when every candidate origin was unreachable.
pub const UNREACHABLE: &str = "Could not reach the API server. Is the backend running?";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// No response at all (DNS failure, refused connection, timeout).
    #[error("{message}")]
    Connectivity { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Application { status: u16, message: String },

    /// Rejected locally before any network call was made.
    #[error("{message}")]
    Validation { message: String },
}

impl ApiError {
    pub fn connectivity(url: &str) -> Self {
        ApiError::Connectivity {
            url: url.to_string(),
            message: format!(
                "Could not reach the API ({url}). Make sure the configured API address \
                 matches the address the backend is listening on."
            ),
        }
    }

    pub fn application(status: u16, message: Option<String>) -> Self {
        ApiError::Application {
            status,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_ERROR.to_string()),
        }
    }

    pub fn validation(message: &str) -> Self {
        ApiError::Validation {
            message: message.to_string(),
        }
    }

    pub fn unreachable() -> Self {
        ApiError::Connectivity {
            url: String::new(),
            message: UNREACHABLE.to_string(),
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connectivity { .. })
    }

    /// Whether this failure should invalidate the held session token.
    /// The backend answers auth middleware rejections with an "Unauthorized"
    /// error message; match on the text, case-insensitive.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ApiError::Application { message, .. } => {
                message.to_lowercase().contains("unauthorized")
            }
            _ => false,
        }
    }

    /// Message suitable for the status banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_falls_back_to_generic_message() {
        let err = ApiError::application(500, None);
        assert_eq!(err.user_message(), GENERIC_ERROR);
        let err = ApiError::application(500, Some(String::new()));
        assert_eq!(err.user_message(), GENERIC_ERROR);
        let err = ApiError::application(409, Some("User with this email already exists".into()));
        assert_eq!(err.user_message(), "User with this email already exists");
    }

    #[test]
    fn unauthorized_is_detected_case_insensitively() {
        assert!(ApiError::application(401, Some("Unauthorized".into())).is_unauthorized());
        assert!(ApiError::application(401, Some("token UNAUTHORIZED".into())).is_unauthorized());
        assert!(!ApiError::application(500, Some("server busy".into())).is_unauthorized());
        assert!(!ApiError::connectivity("http://x").is_unauthorized());
    }
}
