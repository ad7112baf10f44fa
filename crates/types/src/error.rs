//! Unified error type for the jwtgate workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across jwtgate crates.
///
/// None of these cross the middleware's public boundary: terminal outcomes
/// are always converted into a dispatched signal action or a handler
/// invocation before control returns to the host pipeline.
#[derive(Debug, Error)]
pub enum GateError {
    /// No refresh token is stored; the caller is effectively logged out.
    #[error("refresh token unavailable")]
    MissingRefreshToken,

    /// The refresh call failed at the transport level or was rejected
    /// upstream. Never retried automatically.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// The refresh endpoint answered successfully but without a usable
    /// `access` field.
    #[error("refresh response missing access token")]
    MalformedRefreshResponse,

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(String),

    /// The upstream endpoint returned a non-success status.
    #[error("upstream error: status={status}, body={body}")]
    Upstream { status: u16, body: String },

    /// Credential storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The action is malformed, e.g. a wire request without routing types.
    #[error("invalid action: {0}")]
    Action(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_refresh() {
        let err = GateError::MissingRefreshToken;
        assert_eq!(err.to_string(), "refresh token unavailable");
    }

    #[test]
    fn test_error_display_refresh_failed() {
        let err = GateError::RefreshFailed("connection reset".to_string());
        assert_eq!(err.to_string(), "token refresh failed: connection reset");
    }

    #[test]
    fn test_error_display_upstream() {
        let err = GateError::Upstream {
            status: 401,
            body: "expired".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("401"));
        assert!(s.contains("expired"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json {{{").unwrap_err();
        let err: GateError = json_err.into();
        assert!(matches!(err, GateError::Serialization(_)));
    }
}
