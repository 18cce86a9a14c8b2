//! Supabase Profile Store
//!
//! Implementation of `EntitlementStore` over the PostgREST interface of a
//! Supabase project: `update profiles set is_premium = ? where id = ?`.

use async_trait::async_trait;
use entitlement_core::{EntitlementError, EntitlementStore, Result};
use serde::Serialize;

use crate::config::SupabaseConfig;

const PROFILES_TABLE: &str = "profiles";

#[derive(Serialize)]
struct PremiumPatch {
    is_premium: bool,
}

/// Profile store backed by Supabase
pub struct SupabaseProfileStore {
    http: reqwest::Client,
    url: String,
    service_role_key: String,
}

impl SupabaseProfileStore {
    pub fn from_config(http: reqwest::Client, config: &SupabaseConfig) -> Self {
        Self {
            http,
            url: config.url.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{PROFILES_TABLE}", self.url)
    }
}

#[async_trait]
impl EntitlementStore for SupabaseProfileStore {
    async fn set_premium(&self, user_id: &str, is_premium: bool) -> Result<Option<serde_json::Value>> {
        let id_filter = format!("eq.{user_id}");

        let response = self
            .http
            .patch(self.table_url())
            .query(&[("id", id_filter.as_str())])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=minimal")
            .json(&PremiumPatch { is_premium })
            .send()
            .await
            .map_err(|e| EntitlementError::Persistence(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EntitlementError::Persistence(postgrest_message(&body).unwrap_or_else(
                || format!("Profile update failed with status {}", status.as_u16()),
            )));
        }

        tracing::debug!(user_id, is_premium, "Profile row updated");

        Ok(None)
    }

    fn name(&self) -> &str {
        "Supabase"
    }
}

/// PostgREST errors carry a `message` field
fn postgrest_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
