//! # entitlement-core
//!
//! Reconciles Google Play purchase notifications against a user's premium
//! entitlement.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │   Webhook    │──▶│   Classify   │──▶│ PurchaseVerifier │──▶│ EntitlementStore │
//! │   envelope   │   │ notification │   │    (Strategy)    │   │    (Strategy)    │
//! └──────────────┘   └──────┬───────┘   └──────────────────┘   └──────────────────┘
//!                           │ type != 1
//!                           ▼
//!                        skipped
//! ```
//!
//! The `PurchaseVerifier` and `EntitlementStore` traits keep the flow free of
//! any particular HTTP client; `entitlement-runtime` supplies the Google Play
//! and Supabase implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entitlement_core::{MemoryEntitlementStore, MockPurchaseVerifier, WebhookProcessor};
//!
//! let processor = WebhookProcessor::new(
//!     Arc::new(MockPurchaseVerifier::with_state(0)),
//!     Arc::new(MemoryEntitlementStore::new()),
//! );
//!
//! let outcome = processor.handle_body(&body).await?;
//! ```

pub mod error;
pub mod notification;
pub mod store;
pub mod verifier;
pub mod webhook;

pub use error::{EntitlementError, Result};
pub use notification::{ClassifiedNotification, NotificationKind, WebhookEnvelope, WebhookRequest};
pub use store::{EntitlementStore, MemoryEntitlementStore};
pub use verifier::{MockPurchaseVerifier, ProductPurchase, PurchaseState, PurchaseVerifier};
pub use webhook::{WebhookOutcome, WebhookProcessor};
