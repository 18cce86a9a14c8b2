//! Purchase Verification
//!
//! Abstractions over the store-side purchase lookup.

mod mock;

pub use mock::MockPurchaseVerifier;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// Lifecycle state of a one-time purchase as reported by Google Play
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseState {
    Purchased,
    Canceled,
    Pending,
    Unknown(Option<i64>),
}

impl PurchaseState {
    pub const fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Purchased,
            Some(1) => Self::Canceled,
            Some(2) => Self::Pending,
            other => Self::Unknown(other),
        }
    }

    /// Only an active purchase grants premium
    pub const fn grants_premium(self) -> bool {
        matches!(self, Self::Purchased)
    }
}

/// Purchase record returned by the verification endpoint
///
/// Only `purchase_state` drives a decision; the rest is kept for logging.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPurchase {
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub purchase_state: Option<i64>,

    #[serde(default)]
    pub consumption_state: Option<i64>,

    #[serde(default)]
    pub acknowledgement_state: Option<i64>,

    #[serde(default)]
    pub order_id: Option<String>,

    #[serde(default)]
    pub purchase_time_millis: Option<String>,

    #[serde(default)]
    pub developer_payload: Option<String>,

    #[serde(default)]
    pub region_code: Option<String>,
}

impl ProductPurchase {
    /// Record with only a purchase state set
    pub fn with_state(purchase_state: i64) -> Self {
        Self {
            purchase_state: Some(purchase_state),
            ..Default::default()
        }
    }

    pub const fn state(&self) -> PurchaseState {
        PurchaseState::from_code(self.purchase_state)
    }
}

/// Purchase verifier trait (Strategy pattern)
///
/// Implement this per store backend. A single attempt per call; retries are
/// left to the notifier's redelivery.
#[async_trait]
pub trait PurchaseVerifier: Send + Sync {
    /// Look up the purchase identified by `(product_id, purchase_token)`
    async fn verify(&self, product_id: &str, purchase_token: &str) -> Result<ProductPurchase>;

    /// Verifier name
    fn name(&self) -> &str;
}
