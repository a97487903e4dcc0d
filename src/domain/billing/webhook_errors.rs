//! Webhook error types for billing event handling.
//!
//! Only authentication and parse failures reject a webhook delivery;
//! business no-ops are acknowledged with success so the provider does
//! not trigger redelivery storms.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that reject an inbound webhook before it reaches the reconciler.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// Event timestamp is older than the replay window.
    #[error("stale timestamp")]
    StaleTimestamp,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("timestamp in the future")]
    FutureTimestamp,

    /// Signature header or JSON payload could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),
}

impl WebhookError {
    /// Maps the rejection to an HTTP status.
    ///
    /// Authentication failures answer 401, malformed input 400; the
    /// provider does not retry either.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::StaleTimestamp => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::FutureTimestamp | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_failures_are_unauthorized() {
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::StaleTimestamp.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn malformed_input_is_bad_request() {
        assert_eq!(
            WebhookError::ParseError("bad json".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::FutureTimestamp.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn display_names_the_failure() {
        assert_eq!(format!("{}", WebhookError::InvalidSignature), "invalid signature");
        assert_eq!(
            format!("{}", WebhookError::ParseError("x".to_string())),
            "parse error: x"
        );
    }
}
