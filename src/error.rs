use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration missing: {field}. Check your JAZZCASH_* environment values.")]
    Configuration { field: &'static str },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway responded with status {status}")]
    Gateway { status: u16, body: String },

    #[error("Secure hash verification failed")]
    SignatureMismatch,
}

impl GatewayError {
    /// Transport failures (timeouts, connection resets) are safe for the
    /// caller to retry; everything else is a verdict, not a glitch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_missing_field() {
        let error = GatewayError::Configuration { field: "hash_key" };
        assert!(error.to_string().contains("hash_key"));
    }

    #[test]
    fn test_validation_error_carries_field_and_message() {
        let error = GatewayError::from(ValidationError::new("amount", "must be greater than zero"));
        assert_eq!(
            error.to_string(),
            "Validation error: amount: must be greater than zero"
        );
    }

    #[test]
    fn test_gateway_error_preserves_raw_body() {
        let error = GatewayError::Gateway {
            status: 422,
            body: r#"{"responseCode":"110"}"#.to_string(),
        };
        assert!(error.to_string().contains("422"));
        match error {
            GatewayError::Gateway { body, .. } => assert!(body.contains("110")),
            _ => panic!("expected gateway error"),
        }
    }

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(!GatewayError::SignatureMismatch.is_retryable());
        assert!(!GatewayError::Configuration { field: "mpin" }.is_retryable());
        assert!(!GatewayError::Gateway {
            status: 500,
            body: String::new()
        }
        .is_retryable());
    }
}
