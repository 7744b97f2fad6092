//! API error types for the verification service boundary

use std::fmt;

/// Errors that can occur when submitting a step to the verification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network, connect, or timeout failure - the service was never reached
    Network { message: String },
    /// Unexpected HTTP status outside the documented contract
    Http { status: u16, message: String },
    /// Server reachable but it rejected the submitted value
    Rejected { reason: String },
}

/// Generic message shown for any failure that is not a semantic rejection.
/// Transport problems carry no server detail worth surfacing to the user.
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "Could not reach the verification service. Please try again.";

impl ApiError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP error for an unexpected status
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a semantic rejection with the server-reported reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        ApiError::Rejected {
            reason: reason.into(),
        }
    }

    /// Check if this is a semantic rejection (server reached, value wrong)
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// The message to surface to the user for this failure.
    ///
    /// Rejections carry the actionable server reason; everything else
    /// collapses to one generic transport message on every step.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { reason } => reason.clone(),
            ApiError::Network { .. } | ApiError::Http { .. } => {
                TRANSPORT_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network { message } => {
                write!(f, "Network error - {}", message)
            }
            ApiError::Http { status, message } => {
                write!(f, "HTTP {} - {}", status, message)
            }
            ApiError::Rejected { reason } => {
                write!(f, "Rejected - {}", reason)
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rejection() {
        assert!(ApiError::rejected("Incorrect PIN").is_rejection());
        assert!(!ApiError::network("timeout").is_rejection());
        assert!(!ApiError::http(500, "internal").is_rejection());
    }

    #[test]
    fn test_user_message_preserves_rejection_reason() {
        let err = ApiError::rejected("Incorrect email or password");
        assert_eq!(err.user_message(), "Incorrect email or password");
    }

    #[test]
    fn test_user_message_is_generic_for_transport() {
        let network = ApiError::network("connection refused");
        let http = ApiError::http(502, "bad gateway");
        assert_eq!(network.user_message(), TRANSPORT_ERROR_MESSAGE);
        assert_eq!(http.user_message(), TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn test_display() {
        let err = ApiError::http(503, "unavailable");
        assert_eq!(err.to_string(), "HTTP 503 - unavailable");

        let err = ApiError::rejected("Incorrect code");
        assert_eq!(err.to_string(), "Rejected - Incorrect code");
    }
}
