//! Google Service-Account Authentication
//!
//! Exchanges a service-account key for an OAuth2 bearer token using the
//! JWT-bearer grant.

use std::fmt;

use chrono::Utc;
use entitlement_core::{EntitlementError, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Scope required by the Android Publisher API
pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The subset of a service-account key file we need
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,

    #[serde(default)]
    pub private_key_id: Option<String>,

    #[serde(default)]
    pub token_uri: Option<String>,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Service-account credential exchanger
pub struct ServiceAccountAuth {
    http: reqwest::Client,
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    scope: String,
    signing_key: EncodingKey,
}

impl ServiceAccountAuth {
    /// Build from the raw key file contents
    pub fn from_json(http: reqwest::Client, key_json: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(key_json).map_err(|e| {
            EntitlementError::Config(format!("Invalid Google service account key: {e}"))
        })?;
        Self::from_key(http, key)
    }

    pub fn from_key(http: reqwest::Client, key: ServiceAccountKey) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            EntitlementError::Config(format!("Invalid service account private key: {e}"))
        })?;

        Ok(Self {
            http,
            client_email: key.client_email,
            key_id: key.private_key_id,
            token_uri: key.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.into()),
            scope: ANDROID_PUBLISHER_SCOPE.into(),
            signing_key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Signed JWT assertion for the token endpoint
    fn assertion(&self) -> Result<String> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);

        jsonwebtoken::encode(&header, &claims, &self.signing_key)
            .map_err(|e| EntitlementError::Auth(format!("Failed to sign assertion: {e}")))
    }

    /// Obtain a fresh access token
    pub async fn access_token(&self) -> Result<String> {
        let assertion = self.assertion()?;

        tracing::debug!(
            client_email = %self.client_email,
            token_uri = %self.token_uri,
            "Requesting Google access token"
        );

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| EntitlementError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EntitlementError::Auth(format!(
                "Token endpoint returned {}: {body}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| EntitlementError::Auth(format!("Invalid token response: {e}")))?;

        Ok(token.access_token)
    }
}
