//! Core types and traits for the jwtgate workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! jwtgate middleware: the action model, error types, credential identifiers,
//! and the async traits implemented by the storage and transport
//! collaborators. Every cross-crate abstraction lives here so that higher
//! layers depend only on `jwtgate-types`, not on each other.

pub mod action;
pub mod credential;
pub mod error;
pub mod traits;

pub use action::{
    Action, RequestDescriptor, ResponseHandler, ResponseMode, WireAction, WireRequest,
};
pub use credential::{CredentialKind, StoredCredential};
pub use error::GateError;
pub use traits::{CredentialStore, Dispatcher, Transport};
