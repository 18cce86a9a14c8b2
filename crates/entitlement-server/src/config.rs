//! Server Configuration

use entitlement_core::Result;
use entitlement_runtime::{GooglePlayConfig, SupabaseConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process-wide configuration, read once at startup
pub struct ServerConfig {
    pub bind_addr: String,

    /// Err when the Google Play credentials are absent
    pub google_play: Result<GooglePlayConfig>,

    /// Err when the Supabase project settings are absent
    pub supabase: Result<SupabaseConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            google_play: GooglePlayConfig::from_lookup(&lookup),
            supabase: SupabaseConfig::from_lookup(&lookup),
        }
    }
}
