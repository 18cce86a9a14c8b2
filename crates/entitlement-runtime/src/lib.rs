//! # entitlement-runtime
//!
//! Concrete integrations for the entitlement webhook.
//!
//! ## Integrations
//!
//! - **Google Play**: service-account credential exchange and the Android
//!   Publisher `purchases.products.get` lookup
//! - **Supabase**: `profiles.is_premium` updates through PostgREST
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entitlement_runtime::{GooglePlayConfig, SupabaseConfig};
//!
//! let processor = entitlement_runtime::build_processor(
//!     &GooglePlayConfig::from_env()?,
//!     &SupabaseConfig::from_env()?,
//! )?;
//!
//! let outcome = processor.handle_body(&body).await?;
//! ```

use std::sync::Arc;

pub mod config;
pub mod google_auth;
pub mod google_play;
pub mod supabase;

pub use config::{GooglePlayConfig, SupabaseConfig};
pub use google_auth::ServiceAccountAuth;
pub use google_play::GooglePlayVerifier;
pub use supabase::SupabaseProfileStore;

// Re-export core types for convenience
pub use entitlement_core::{
    EntitlementError, EntitlementStore, PurchaseVerifier, Result, WebhookOutcome, WebhookProcessor,
};

/// Wire the Google Play verifier and Supabase store into a processor.
///
/// Both integrations share one HTTP connection pool.
pub fn build_processor(google_play: &GooglePlayConfig, supabase: &SupabaseConfig) -> Result<WebhookProcessor> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("entitlement-runtime/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EntitlementError::Config(format!("Failed to build HTTP client: {e}")))?;

    let verifier = GooglePlayVerifier::from_config(http.clone(), google_play)?;
    let store = SupabaseProfileStore::from_config(http, supabase);

    Ok(WebhookProcessor::new(Arc::new(verifier), Arc::new(store)))
}
