//! Credential storage backends for the jwtgate middleware.
//!
//! Provides an in-memory store for testing and ephemeral use. Persistent
//! backends plug in by implementing the same
//! [`CredentialStore`](jwtgate_types::traits::CredentialStore) trait.

pub mod memory;

pub use memory::MemoryCredentialStore;
