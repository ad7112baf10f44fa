//! Async traits implemented by the middleware's external collaborators.

use crate::action::Action;
use crate::credential::CredentialKind;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Storage for the credential pair, keyed by [`CredentialKind`].
///
/// The two credentials have independent lifetimes; absence of either is a
/// valid state. No transactional guarantee is assumed across calls.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the named credential, if present and unexpired.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails; implementations
    /// must not surface expired values as present.
    async fn get(&self, kind: CredentialKind) -> Result<Option<String>>;

    /// Persist (or overwrite) the named credential with an optional ttl.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails to persist the value.
    async fn set(&self, kind: CredentialKind, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Remove the named credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    async fn remove(&self, kind: CredentialKind) -> Result<()>;
}

/// Executes a single HTTP request and returns the parsed JSON response body.
///
/// Transport-level retries and timeouts are the implementation's concern;
/// callers issue exactly one `execute` per network call they intend to make.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request.
    ///
    /// Headers are applied in order with last-write-wins semantics on the
    /// (case-insensitive) header name.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Http`](crate::GateError::Http) on transport
    /// failure or [`GateError::Upstream`](crate::GateError::Upstream) on a
    /// non-success status.
    async fn execute(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<Value>;
}

/// Delivers a new action into the host pipeline.
///
/// Handed in per invocation; the middleware never retains a dispatcher
/// beyond the call it was passed to.
pub trait Dispatcher: Send + Sync {
    /// Deliver one action.
    fn dispatch(&self, action: Action);
}

impl<F> Dispatcher for F
where
    F: Fn(Action) + Send + Sync,
{
    fn dispatch(&self, action: Action) {
        self(action);
    }
}
