//! Bearer-token interception middleware for action-dispatch pipelines.
//!
//! [`JwtMiddleware`] inspects each action flowing through a host pipeline.
//! Actions without a request descriptor pass through untouched; the rest are
//! executed with a `Bearer` access token attached, after transparently
//! refreshing an absent access token with the stored refresh token and
//! replaying the original action. Storage and HTTP are injected behind the
//! [`CredentialStore`](jwtgate_types::traits::CredentialStore) and
//! [`Transport`](jwtgate_types::traits::Transport) traits; [`HttpTransport`]
//! is the batteries-included transport.

pub mod config;
pub mod middleware;
pub mod transport;

pub use config::{DEFAULT_FAILURE_TYPE, GateConfig};
pub use middleware::{CALLBACK_COMPLETE, CALLBACK_FAILED, Disposition, JwtMiddleware};
pub use transport::HttpTransport;
