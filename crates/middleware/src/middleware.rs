//! The interception layer: classifier, credential gate, and request
//! executor/router.
//!
//! Each intercepted action runs through a linear decision pipeline:
//! classification (does it carry a request descriptor at all), the
//! credential gate (pass, reject as unauthenticated, or refresh-then-replay)
//! and finally the executor, which issues the authorized call and routes the
//! response. A successful refresh replays the original action through the
//! full pipeline from the top, re-reading the store rather than assuming the
//! write landed.

use crate::config::GateConfig;
use jwtgate_types::error::Result;
use jwtgate_types::{
    Action, CredentialKind, CredentialStore, Dispatcher, GateError, ResponseMode, Transport,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

/// Signal type dispatched after a callback handler ran with a success
/// response. Observability only; carries no data.
pub const CALLBACK_COMPLETE: &str = "jwtgate/callback complete";

/// Signal type dispatched after a callback handler ran with an error.
pub const CALLBACK_FAILED: &str = "jwtgate/callback failed";

/// Outcome of [`JwtMiddleware::intercept`] as seen by the host pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// The action carries no request descriptor; forward it unchanged to the
    /// next pipeline stage.
    Passthrough(Action),
    /// The action was consumed; its terminal outcome was already delivered
    /// through the dispatcher or the callback handler.
    Handled,
}

/// Attaches bearer-token authorization to intercepted API requests and
/// transparently refreshes a missing access token before replaying them.
pub struct JwtMiddleware {
    config: GateConfig,
    store: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    /// Serializes concurrent refresh attempts so only one network call is
    /// issued; waiters re-read the store after acquiring it.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl JwtMiddleware {
    /// Create a middleware over the injected store and transport.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if the configuration is invalid.
    pub fn new(
        config: GateConfig,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            transport,
            refresh_gate: tokio::sync::Mutex::new(()),
        })
    }

    /// Process one action.
    ///
    /// Actions without a request descriptor come back as
    /// [`Disposition::Passthrough`] with no side effects. For the rest,
    /// every branch ends in exactly one terminal emission (a dispatched
    /// signal action or one handler invocation) and never in an error.
    pub async fn intercept(&self, action: Action, dispatch: &dyn Dispatcher) -> Disposition {
        // Classifier: absence of a descriptor is the only signal.
        if action.request.is_none() {
            return Disposition::Passthrough(action);
        }
        self.gate(action, dispatch).await;
        Disposition::Handled
    }

    /// Credential gate: decide among unauthenticated-reject,
    /// refresh-then-replay, and proceed-with-access-token.
    async fn gate(&self, action: Action, dispatch: &dyn Dispatcher) {
        let Some(refresh) = self.read(CredentialKind::Refresh).await else {
            debug!(kind = %action.kind, "no refresh token, rejecting as unauthenticated");
            dispatch.dispatch(
                Action::signal(self.config.unauthenticated_action_type.clone())
                    .with_payload(Value::String(GateError::MissingRefreshToken.to_string())),
            );
            return;
        };

        match self.read(CredentialKind::Access).await {
            Some(access) => self.execute(action, &access, dispatch).await,
            None => self.refresh_then_replay(action, &refresh, dispatch).await,
        }
    }

    /// Refresh sub-flow: one network call, one store write, then replay of
    /// the original action through the full pipeline.
    async fn refresh_then_replay(
        &self,
        action: Action,
        refresh: &str,
        dispatch: &dyn Dispatcher,
    ) {
        let guard = self.refresh_gate.lock().await;

        // A concurrent caller may have refreshed while we waited for the
        // lock; re-read before issuing our own call.
        if self.read(CredentialKind::Access).await.is_some() {
            drop(guard);
            self.replay(action, dispatch).await;
            return;
        }

        debug!(endpoint = %self.config.refresh_endpoint, "access token absent, refreshing");
        let body = json!({ "refresh": refresh });
        let outcome = match self
            .transport
            .execute("POST", &self.config.refresh_endpoint, Some(&body), &[])
            .await
        {
            Ok(response) => match response.get("access").and_then(Value::as_str) {
                Some(access) => {
                    self.store
                        .set(CredentialKind::Access, access, self.config.access_token_ttl)
                        .await
                }
                None => Err(GateError::MalformedRefreshResponse),
            },
            Err(e) => Err(GateError::RefreshFailed(e.to_string())),
        };
        drop(guard);

        match outcome {
            Ok(()) => self.replay(action, dispatch).await,
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                dispatch.dispatch(
                    Action::signal(self.config.refresh_failed_action_type.clone())
                        .with_payload(Value::String(e.to_string())),
                );
            }
        }
    }

    /// Re-submit the original action from the top of the pipeline. The full
    /// classifier/gate/executor sequence re-runs against current store state.
    async fn replay(&self, action: Action, dispatch: &dyn Dispatcher) {
        match Box::pin(self.intercept(action, dispatch)).await {
            Disposition::Handled => {}
            // Unreachable for a replayed request action, but hand anything
            // unclassified back to the pipeline rather than dropping it.
            Disposition::Passthrough(action) => dispatch.dispatch(action),
        }
    }

    /// Executor: issue the authorized call, then route the response through
    /// the descriptor's delivery mode. Exactly one terminal emission.
    async fn execute(&self, action: Action, access: &str, dispatch: &dyn Dispatcher) {
        let Some(descriptor) = action.request else {
            return;
        };

        if let Some(loading) = &descriptor.loading_type {
            dispatch.dispatch(Action::signal(loading.clone()));
        }

        // Descriptor headers first, bearer header last so it always wins.
        let mut headers: Vec<(String, String)> = descriptor
            .headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
            .collect();
        headers.push(("Authorization".to_string(), format!("Bearer {access}")));

        let result = self
            .transport
            .execute(
                &descriptor.method,
                &descriptor.url,
                descriptor.body.as_ref(),
                &headers,
            )
            .await;

        match descriptor.mode {
            ResponseMode::Callback(handler) => {
                let marker = if result.is_ok() {
                    CALLBACK_COMPLETE
                } else {
                    CALLBACK_FAILED
                };
                handler(result);
                dispatch.dispatch(Action::signal(marker));
            }
            ResponseMode::Routed {
                success_type,
                failed_type,
            } => match result {
                Ok(body) => dispatch.dispatch(Action::signal(success_type).with_payload(body)),
                Err(e) => dispatch.dispatch(
                    Action::signal(failed_type).with_payload(Value::String(e.to_string())),
                ),
            },
        }
    }

    /// Store read that degrades to absence on backend failure.
    async fn read(&self, kind: CredentialKind) -> Option<String> {
        match self.store.get(kind).await {
            Ok(value) => value,
            Err(e) => {
                warn!(kind = %kind, error = %e, "credential store read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jwtgate_store::MemoryCredentialStore;
    use jwtgate_types::RequestDescriptor;
    use std::sync::Mutex;

    /// Transport that must never be reached.
    struct UnreachableTransport;

    #[async_trait]
    impl Transport for UnreachableTransport {
        async fn execute(
            &self,
            _method: &str,
            _url: &str,
            _body: Option<&Value>,
            _headers: &[(String, String)],
        ) -> Result<Value> {
            panic!("transport must not be called");
        }
    }

    #[derive(Default)]
    struct Collector {
        actions: Mutex<Vec<Action>>,
    }

    impl Dispatcher for Collector {
        fn dispatch(&self, action: Action) {
            self.actions.lock().unwrap().push(action);
        }
    }

    fn middleware() -> JwtMiddleware {
        JwtMiddleware::new(
            GateConfig::new("https://auth.example/refresh"),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(UnreachableTransport),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = JwtMiddleware::new(
            GateConfig::new(""),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(UnreachableTransport),
        )
        .err()
        .unwrap();
        assert!(matches!(err, GateError::Config(_)));
    }

    #[tokio::test]
    async fn test_passthrough_is_untouched() {
        let m = middleware();
        let collector = Collector::default();
        let action = Action::signal("NOT_AN_API_CALL").with_payload(json!(42));
        let disposition = m.intercept(action.clone(), &collector).await;
        assert_eq!(disposition, Disposition::Passthrough(action));
        assert!(collector.actions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_refresh_token_rejects_without_network() {
        let m = middleware();
        let collector = Collector::default();
        let action = Action::signal("FETCH")
            .with_request(RequestDescriptor::routed("GET", "/x", "X_OK", "X_ERR"));
        let disposition = m.intercept(action, &collector).await;
        assert_eq!(disposition, Disposition::Handled);

        let emitted = collector.actions.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].kind, "authorization failed");
        assert_eq!(
            emitted[0].payload,
            Some(Value::String("refresh token unavailable".into()))
        );
    }
}
