//! Google Play Purchase Verifier
//!
//! Implementation of `PurchaseVerifier` backed by the Android Publisher API.

use async_trait::async_trait;
use entitlement_core::{EntitlementError, ProductPurchase, PurchaseVerifier, Result};
use reqwest::Url;

use crate::config::GooglePlayConfig;
use crate::google_auth::ServiceAccountAuth;

/// Google Play Developer API verifier
pub struct GooglePlayVerifier {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    package_name: String,
    api_base_url: Url,
}

impl GooglePlayVerifier {
    /// Create from configuration, sharing an existing HTTP client
    pub fn from_config(http: reqwest::Client, config: &GooglePlayConfig) -> Result<Self> {
        let auth = ServiceAccountAuth::from_json(http.clone(), &config.service_account_key)?;
        let api_base_url = Url::parse(&config.api_base_url).map_err(|e| {
            EntitlementError::Config(format!("Invalid Google Play API URL: {e}"))
        })?;

        if api_base_url.cannot_be_a_base() {
            return Err(EntitlementError::Config(format!(
                "Invalid Google Play API URL: {api_base_url}"
            )));
        }

        tracing::debug!(
            package_name = %config.package_name,
            client_email = %auth.client_email(),
            "Configured Google Play verifier"
        );

        Ok(Self {
            http,
            auth,
            package_name: config.package_name.clone(),
            api_base_url,
        })
    }

    /// `.../applications/{package}/purchases/products/{productId}/tokens/{token}`
    pub fn purchase_url(&self, product_id: &str, purchase_token: &str) -> Url {
        let mut url = self.api_base_url.clone();
        // Checked in `from_config`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "androidpublisher",
                "v3",
                "applications",
                self.package_name.as_str(),
                "purchases",
                "products",
                product_id,
                "tokens",
                purchase_token,
            ]);
        }
        url
    }
}

#[async_trait]
impl PurchaseVerifier for GooglePlayVerifier {
    async fn verify(&self, product_id: &str, purchase_token: &str) -> Result<ProductPurchase> {
        let access_token = self.auth.access_token().await?;
        let url = self.purchase_url(product_id, purchase_token);

        tracing::debug!(product_id, package_name = %self.package_name, "Fetching product purchase");

        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| EntitlementError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), product_id, "Purchase verification rejected");
            return Err(EntitlementError::VerificationFailed {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ProductPurchase>()
            .await
            .map_err(|e| EntitlementError::Http(format!("Invalid purchase response: {e}")))
    }

    fn name(&self) -> &str {
        "GooglePlay"
    }
}
