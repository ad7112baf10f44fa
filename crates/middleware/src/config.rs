//! Middleware configuration surface.

use jwtgate_types::GateError;
use jwtgate_types::error::Result;
use std::time::Duration;

/// Action type emitted on authorization failure when no override is
/// configured. The host conventionally reduces it into a login redirect.
pub const DEFAULT_FAILURE_TYPE: &str = "authorization failed";

/// Options recognized by [`JwtMiddleware`](crate::JwtMiddleware).
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Endpoint receiving `POST {"refresh": <token>}` to mint a new access
    /// token. Required.
    pub refresh_endpoint: String,
    /// Expiry applied when storing a newly issued access token.
    pub access_token_ttl: Option<Duration>,
    /// Action type emitted when the refresh token is absent.
    pub unauthenticated_action_type: String,
    /// Action type emitted when the refresh call fails.
    pub refresh_failed_action_type: String,
}

impl GateConfig {
    /// Create a configuration with the given refresh endpoint and default
    /// signal types.
    pub fn new(refresh_endpoint: impl Into<String>) -> Self {
        Self {
            refresh_endpoint: refresh_endpoint.into(),
            access_token_ttl: None,
            unauthenticated_action_type: DEFAULT_FAILURE_TYPE.to_string(),
            refresh_failed_action_type: DEFAULT_FAILURE_TYPE.to_string(),
        }
    }

    /// Set the ttl applied when storing a refreshed access token.
    #[must_use]
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = Some(ttl);
        self
    }

    /// Override the action type emitted when the refresh token is absent.
    #[must_use]
    pub fn with_unauthenticated_type(mut self, kind: impl Into<String>) -> Self {
        self.unauthenticated_action_type = kind.into();
        self
    }

    /// Override the action type emitted when the refresh call fails.
    #[must_use]
    pub fn with_refresh_failed_type(mut self, kind: impl Into<String>) -> Self {
        self.refresh_failed_action_type = kind.into();
        self
    }

    /// Check that required options are usable.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if the refresh endpoint is empty.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_endpoint.trim().is_empty() {
            return Err(GateError::Config("refreshEndpoint is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GateConfig::new("https://auth.example/refresh");
        assert_eq!(config.unauthenticated_action_type, DEFAULT_FAILURE_TYPE);
        assert_eq!(config.refresh_failed_action_type, DEFAULT_FAILURE_TYPE);
        assert!(config.access_token_ttl.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = GateConfig::new("https://auth.example/refresh")
            .with_access_token_ttl(Duration::from_secs(900))
            .with_unauthenticated_type("AUTH_REQUIRED")
            .with_refresh_failed_type("REFRESH_FAILED");
        assert_eq!(config.access_token_ttl, Some(Duration::from_secs(900)));
        assert_eq!(config.unauthenticated_action_type, "AUTH_REQUIRED");
        assert_eq!(config.refresh_failed_action_type, "REFRESH_FAILED");
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let err = GateConfig::new("   ").validate().unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }
}
