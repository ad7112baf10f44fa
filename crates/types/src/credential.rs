//! Credential identifiers and stored-value expiry logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Names the two credentials read through
/// [`CredentialStore`](crate::traits::CredentialStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// Short-lived credential sent as a bearer header on API calls.
    Access,
    /// Longer-lived credential used to obtain a new access token.
    Refresh,
}

impl CredentialKind {
    /// Canonical storage key for this credential.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque credential value with optional expiry tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Opaque token string.
    pub value: String,
    /// Unix timestamp (seconds) after which the value is unusable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl StoredCredential {
    /// Create a credential that never expires.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// Set the expiry to `ttl` from now.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        self.expires_at = Some(now + ttl.as_secs());
        self
    }

    /// Return `true` once the expiry timestamp has been reached.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        now >= expires_at
    }
}
