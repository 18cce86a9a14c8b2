//! Integration Configuration
//!
//! Read once at process start; lookups go through a closure so tests never
//! touch the process environment.

use std::fmt;

use entitlement_core::{EntitlementError, Result};

/// Google Play Developer API settings
#[derive(Clone)]
pub struct GooglePlayConfig {
    /// Service-account key file contents (JSON)
    pub service_account_key: String,

    /// Application package name, e.g. `com.example.app`
    pub package_name: String,

    /// Android Publisher API origin
    pub api_base_url: String,
}

impl GooglePlayConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://androidpublisher.googleapis.com";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let service_account_key = non_empty(lookup("GOOGLE_PLAY_SERVICE_ACCOUNT_KEY"));
        let package_name = non_empty(lookup("GOOGLE_PLAY_PACKAGE_NAME"));

        let (Some(service_account_key), Some(package_name)) = (service_account_key, package_name)
        else {
            return Err(EntitlementError::google_play_not_configured());
        };

        let api_base_url = non_empty(lookup("GOOGLE_PLAY_API_BASE_URL"))
            .unwrap_or_else(|| Self::DEFAULT_API_BASE_URL.into());

        Ok(Self {
            service_account_key,
            package_name,
            api_base_url,
        })
    }
}

impl fmt::Debug for GooglePlayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GooglePlayConfig")
            .field("service_account_key", &"<redacted>")
            .field("package_name", &self.package_name)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Supabase profile store settings
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Service role key (bypasses row-level security)
    pub service_role_key: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = non_empty(lookup("SUPABASE_URL"));
        let service_role_key = non_empty(lookup("SUPABASE_SERVICE_ROLE_KEY"));

        match (url, service_role_key) {
            (Some(url), Some(service_role_key)) => Ok(Self {
                url: url.trim_end_matches('/').to_string(),
                service_role_key,
            }),
            _ => Err(EntitlementError::Config(
                "Supabase URL or service role key not set.".into(),
            )),
        }
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
