//! Notification Classification
//!
//! Parses the webhook envelope delivered by the Play notification dispatcher
//! and pulls out the fields needed to verify a purchase.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EntitlementError, Result};

/// Notification type signalling a new purchase
pub const NEW_PURCHASE: i64 = 1;

/// Inbound request body
#[derive(Clone, Debug, Deserialize)]
pub struct WebhookRequest {
    pub record: WebhookEnvelope,
}

impl WebhookRequest {
    /// Parse a raw request body
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| EntitlementError::InvalidPayload(e.to_string()))
    }
}

/// Webhook envelope
///
/// Carries one of two notification shapes plus an application-supplied
/// user id. Unknown fields are ignored. Scalar fields are kept as raw JSON:
/// only their presence is checked, never their type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub version: Option<Value>,

    #[serde(default)]
    pub subscription_notification: Option<SubscriptionNotification>,

    #[serde(default)]
    pub one_time_product_notification: Option<OneTimeProductNotification>,

    #[serde(default)]
    pub user_id: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionNotification {
    #[serde(default)]
    pub purchase_token: Option<Value>,

    #[serde(default)]
    pub subscription_id: Option<Value>,

    #[serde(default)]
    pub notification_type: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeProductNotification {
    #[serde(default)]
    pub purchase_token: Option<Value>,

    #[serde(default)]
    pub product_id: Option<Value>,

    #[serde(default)]
    pub notification_type: Option<Value>,
}

/// Which notification shape the envelope carried
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Subscription,
    OneTimeProduct,
}

/// Fields extracted from a webhook envelope
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedNotification {
    pub kind: NotificationKind,
    pub purchase_token: Option<String>,
    pub product_id: Option<String>,
    pub notification_type: Option<Value>,
}

impl ClassifiedNotification {
    /// Only new purchases are acted on.
    ///
    /// `1` and `1.0` are the same JSON number; strings and every other value
    /// are not a new purchase.
    pub fn is_new_purchase(&self) -> bool {
        self.notification_type
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|n| (n - NEW_PURCHASE as f64).abs() < f64::EPSILON)
    }

    /// Returns `(product_id, purchase_token)`, both non-empty
    pub fn require_purchase(&self) -> Result<(&str, &str)> {
        match (self.product_id.as_deref(), self.purchase_token.as_deref()) {
            (Some(product_id), Some(purchase_token)) => Ok((product_id, purchase_token)),
            _ => Err(EntitlementError::MissingFields),
        }
    }
}

impl WebhookEnvelope {
    /// Extract token, product id and notification type.
    ///
    /// A subscription notification takes precedence; its `subscriptionId`
    /// is used as the product id.
    pub fn classify(&self) -> Result<ClassifiedNotification> {
        if let Some(sub) = &self.subscription_notification {
            return Ok(ClassifiedNotification {
                kind: NotificationKind::Subscription,
                purchase_token: present(sub.purchase_token.as_ref()),
                product_id: present(sub.subscription_id.as_ref()),
                notification_type: sub.notification_type.clone(),
            });
        }

        if let Some(one_time) = &self.one_time_product_notification {
            return Ok(ClassifiedNotification {
                kind: NotificationKind::OneTimeProduct,
                purchase_token: present(one_time.purchase_token.as_ref()),
                product_id: present(one_time.product_id.as_ref()),
                notification_type: one_time.notification_type.clone(),
            });
        }

        Err(EntitlementError::UnsupportedNotificationShape)
    }

    /// Application-supplied user id, if present
    pub fn user_id(&self) -> Option<String> {
        present(self.user_id.as_ref())
    }
}

/// A non-empty string, or a non-zero number rendered as text
fn present(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
