//! Unified error handling for the request/session layer.
//!
//! HTTP-level errors are deliberately NOT errors here: a response that
//! arrived with a non-200 status resolves as data (a
//! [`NormalizedResponse`](crate::http::NormalizedResponse) carrying the
//! status), leaving interpretation to the caller. Only failures that
//! produced no usable response reject.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the request/session layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received at all (DNS, connect, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// A payload could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The target URL could not be constructed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// An operation required session context that was not resolvable.
    ///
    /// Failing fast here beats silently sending an incomplete request the
    /// backend will reject with a less useful message.
    #[error("missing {0} in session context")]
    MissingContext(&'static str),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_context_display() {
        let err = ClientError::MissingContext("shop_id");
        assert_eq!(err.to_string(), "missing shop_id in session context");
    }

    #[test]
    fn test_config_error_display() {
        let err = ClientError::Config(ConfigError::InvalidEnvVar(
            "ORDER_EASE_TIMEOUT_MS".to_string(),
            "not a number".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "config error: Invalid environment variable ORDER_EASE_TIMEOUT_MS: not a number"
        );
    }
}
