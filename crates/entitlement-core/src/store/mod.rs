//! Entitlement Storage
//!
//! Writes the premium flag on a user's profile row.

mod memory;

pub use memory::MemoryEntitlementStore;

use async_trait::async_trait;

use crate::error::Result;

/// Entitlement store trait
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Set `is_premium` on the profile whose id equals `user_id`.
    ///
    /// Matching zero rows is not an error. Returns whatever data the backend
    /// hands back for the update, if any.
    async fn set_premium(&self, user_id: &str, is_premium: bool) -> Result<Option<serde_json::Value>>;

    /// Store name
    fn name(&self) -> &str;
}
