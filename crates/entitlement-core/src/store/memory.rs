//! In-memory entitlement store (for development and tests)

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EntitlementStore;
use crate::error::{EntitlementError, Result};

/// In-memory entitlement store
pub struct MemoryEntitlementStore {
    premium: RwLock<HashMap<String, bool>>,
    writes: AtomicUsize,
    failure: Option<String>,
}

impl Default for MemoryEntitlementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEntitlementStore {
    pub fn new() -> Self {
        Self {
            premium: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            failure: None,
        }
    }

    /// Store whose every update fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Current flag for a user, if ever written
    pub async fn is_premium(&self, user_id: &str) -> Option<bool> {
        self.premium.read().await.get(user_id).copied()
    }

    /// Number of update attempts so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitlementStore for MemoryEntitlementStore {
    async fn set_premium(&self, user_id: &str, is_premium: bool) -> Result<Option<serde_json::Value>> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(EntitlementError::Persistence(message.clone()));
        }

        self.premium
            .write()
            .await
            .insert(user_id.to_string(), is_premium);

        Ok(None)
    }

    fn name(&self) -> &str {
        "MemoryStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overwrite_flag() {
        let store = MemoryEntitlementStore::new();

        store.set_premium("u1", true).await.unwrap();
        store.set_premium("u1", false).await.unwrap();

        assert_eq!(store.is_premium("u1").await, Some(false));
        assert_eq!(store.is_premium("u2").await, None);
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryEntitlementStore::failing("connection refused");
        let result = store.set_premium("u1", true).await;

        assert!(matches!(result, Err(EntitlementError::Persistence(_))));
        assert_eq!(store.is_premium("u1").await, None);
    }
}
