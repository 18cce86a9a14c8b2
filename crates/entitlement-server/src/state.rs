//! Application State

use std::sync::Arc;

use entitlement_core::{EntitlementError, Result, WebhookProcessor};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Webhook processor (None if integrations are not configured)
    pub processor: Option<Arc<WebhookProcessor>>,

    /// Why `processor` is missing
    pub setup_error: Option<String>,

    pub google_play_configured: bool,
    pub profile_store_configured: bool,
}

impl AppState {
    /// Build the integrations described by `config`
    pub fn from_config(config: ServerConfig) -> Self {
        let google_play_configured = config.google_play.is_ok();
        let profile_store_configured = config.supabase.is_ok();

        let processor = match (config.google_play, config.supabase) {
            (Ok(google_play), Ok(supabase)) => {
                entitlement_runtime::build_processor(&google_play, &supabase)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match processor {
            Ok(processor) => Self {
                processor: Some(Arc::new(processor)),
                setup_error: None,
                google_play_configured,
                profile_store_configured,
            },
            Err(e) => {
                tracing::warn!(error = %e, "⚠ Webhook integrations not configured");
                Self {
                    processor: None,
                    setup_error: Some(e.to_string()),
                    google_play_configured,
                    profile_store_configured,
                }
            }
        }
    }

    /// State around an already-built processor
    pub fn with_processor(processor: WebhookProcessor) -> Self {
        Self {
            processor: Some(Arc::new(processor)),
            setup_error: None,
            google_play_configured: true,
            profile_store_configured: true,
        }
    }

    pub fn processor(&self) -> Result<&WebhookProcessor> {
        self.processor.as_deref().ok_or_else(|| match &self.setup_error {
            Some(message) => EntitlementError::Config(message.clone()),
            None => EntitlementError::google_play_not_configured(),
        })
    }
}
