//! In-memory credential store backed by a `HashMap` behind a `Mutex`.

use async_trait::async_trait;
use jwtgate_types::error::Result;
use jwtgate_types::traits::CredentialStore;
use jwtgate_types::{CredentialKind, StoredCredential};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// An in-memory [`CredentialStore`] implementation for testing and
/// ephemeral use. Expired values are evicted on read.
pub struct MemoryCredentialStore {
    data: Mutex<HashMap<CredentialKind, StoredCredential>>,
}

impl MemoryCredentialStore {
    /// Creates a new empty in-memory credential store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    /// Loads the named credential, evicting it if its expiry has passed.
    async fn get(&self, kind: CredentialKind) -> Result<Option<String>> {
        let mut data = self.data.lock().unwrap();
        match data.get(&kind) {
            Some(cred) if cred.is_expired() => {
                data.remove(&kind);
                Ok(None)
            }
            Some(cred) => Ok(Some(cred.value.clone())),
            None => Ok(None),
        }
    }

    /// Saves (or overwrites) the named credential.
    async fn set(&self, kind: CredentialKind, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut cred = StoredCredential::new(value);
        if let Some(ttl) = ttl {
            cred = cred.with_ttl(ttl);
        }
        self.data.lock().unwrap().insert(kind, cred);
        Ok(())
    }

    /// Removes the named credential.
    async fn remove(&self, kind: CredentialKind) -> Result<()> {
        self.data.lock().unwrap().remove(&kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryCredentialStore::new();
        store
            .set(CredentialKind::Access, "a1", None)
            .await
            .unwrap();
        let value = store.get(CredentialKind::Access).await.unwrap();
        assert_eq!(value.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryCredentialStore::new();
        assert!(store.get(CredentialKind::Refresh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let store = MemoryCredentialStore::new();
        store
            .set(CredentialKind::Refresh, "r1", None)
            .await
            .unwrap();
        assert!(store.get(CredentialKind::Access).await.unwrap().is_none());
        assert_eq!(
            store.get(CredentialKind::Refresh).await.unwrap().as_deref(),
            Some("r1")
        );
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = MemoryCredentialStore::new();
        store
            .set(CredentialKind::Access, "first", None)
            .await
            .unwrap();
        store
            .set(CredentialKind::Access, "second", None)
            .await
            .unwrap();
        assert_eq!(
            store.get(CredentialKind::Access).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_expired_value_evicted() {
        let store = MemoryCredentialStore::new();
        store
            .set(CredentialKind::Access, "a1", Some(Duration::ZERO))
            .await
            .unwrap();
        assert!(store.get(CredentialKind::Access).await.unwrap().is_none());
        // Gone for good, not merely hidden.
        assert!(store.get(CredentialKind::Access).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryCredentialStore::new();
        store
            .set(CredentialKind::Refresh, "r1", None)
            .await
            .unwrap();
        store.remove(CredentialKind::Refresh).await.unwrap();
        assert!(store.get(CredentialKind::Refresh).await.unwrap().is_none());
    }
}
