//! Play Webhook Processing
//!
//! Reconciles a single purchase notification: classify, verify with the
//! store, then write the resulting premium flag.

use std::sync::Arc;

use crate::error::{EntitlementError, Result};
use crate::notification::{WebhookEnvelope, WebhookRequest};
use crate::store::EntitlementStore;
use crate::verifier::{PurchaseState, PurchaseVerifier};

pub const SKIPPED_MESSAGE: &str = "Notification type not a new purchase, skipping.";
pub const PROCESSED_MESSAGE: &str = "Webhook processed successfully";

/// Result of a successfully handled notification
#[derive(Clone, Debug)]
pub enum WebhookOutcome {
    /// Not a new purchase; nothing verified or written
    Skipped,

    /// Purchase verified and entitlement written
    Processed {
        user_id: String,
        product_id: String,
        purchase_state: PurchaseState,
        is_premium: bool,
        data: Option<serde_json::Value>,
    },
}

impl WebhookOutcome {
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Skipped => SKIPPED_MESSAGE,
            Self::Processed { .. } => PROCESSED_MESSAGE,
        }
    }

    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Webhook processor
pub struct WebhookProcessor {
    verifier: Arc<dyn PurchaseVerifier>,
    store: Arc<dyn EntitlementStore>,
}

impl WebhookProcessor {
    pub fn new(verifier: Arc<dyn PurchaseVerifier>, store: Arc<dyn EntitlementStore>) -> Self {
        Self { verifier, store }
    }

    /// Parse a raw request body and process it
    pub async fn handle_body(&self, body: &str) -> Result<WebhookOutcome> {
        let request = WebhookRequest::parse(body)?;
        self.handle(&request.record).await
    }

    /// Process a parsed envelope
    pub async fn handle(&self, envelope: &WebhookEnvelope) -> Result<WebhookOutcome> {
        let notification = envelope.classify()?;

        if !notification.is_new_purchase() {
            tracing::info!(
                kind = ?notification.kind,
                notification_type = ?notification.notification_type,
                "Notification is not a new purchase, skipping"
            );
            return Ok(WebhookOutcome::Skipped);
        }

        let (product_id, purchase_token) = notification.require_purchase()?;

        tracing::debug!(
            verifier = self.verifier.name(),
            product_id,
            "Verifying purchase"
        );
        let purchase = self.verifier.verify(product_id, purchase_token).await?;

        let purchase_state = purchase.state();
        let is_premium = purchase_state.grants_premium();

        let user_id = envelope.user_id().ok_or(EntitlementError::MissingUserId)?;

        let data = self.store.set_premium(&user_id, is_premium).await?;

        tracing::info!(
            user_id = %user_id,
            product_id,
            order_id = ?purchase.order_id,
            purchase_state = ?purchase_state,
            is_premium,
            store = self.store.name(),
            "Updated premium status"
        );

        Ok(WebhookOutcome::Processed {
            user_id,
            product_id: product_id.to_string(),
            purchase_state,
            is_premium,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEntitlementStore;
    use crate::verifier::MockPurchaseVerifier;

    const ONE_TIME_PURCHASE: &str = r#"{"record": {
        "oneTimeProductNotification": {"purchaseToken": "tok1", "productId": "prod1", "notificationType": 1},
        "userId": "u1"
    }}"#;

    fn build(
        verifier: MockPurchaseVerifier,
        store: MemoryEntitlementStore,
    ) -> (WebhookProcessor, Arc<MockPurchaseVerifier>, Arc<MemoryEntitlementStore>) {
        let verifier = Arc::new(verifier);
        let store = Arc::new(store);
        (
            WebhookProcessor::new(verifier.clone(), store.clone()),
            verifier,
            store,
        )
    }

    #[tokio::test]
    async fn test_purchased_grants_premium() {
        let (processor, verifier, store) =
            build(MockPurchaseVerifier::with_state(0), MemoryEntitlementStore::new());

        let outcome = processor.handle_body(ONE_TIME_PURCHASE).await.unwrap();

        assert_eq!(outcome.message(), PROCESSED_MESSAGE);
        assert_eq!(verifier.calls(), 1);
        assert_eq!(store.is_premium("u1").await, Some(true));
    }

    #[tokio::test]
    async fn test_other_states_revoke_premium() {
        for state in [1, 2, 9] {
            let (processor, _, store) =
                build(MockPurchaseVerifier::with_state(state), MemoryEntitlementStore::new());

            let outcome = processor.handle_body(ONE_TIME_PURCHASE).await.unwrap();

            assert!(matches!(outcome, WebhookOutcome::Processed { is_premium: false, .. }));
            assert_eq!(store.is_premium("u1").await, Some(false));
        }
    }

    #[tokio::test]
    async fn test_skip_makes_no_outbound_calls() {
        let (processor, verifier, store) =
            build(MockPurchaseVerifier::default(), MemoryEntitlementStore::new());
        let body = ONE_TIME_PURCHASE.replace(r#""notificationType": 1"#, r#""notificationType": 5"#);

        let outcome = processor.handle_body(&body).await.unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(outcome.message(), SKIPPED_MESSAGE);
        assert_eq!(verifier.calls(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_subscription_verified_with_subscription_id() {
        let (processor, verifier, store) =
            build(MockPurchaseVerifier::with_state(0), MemoryEntitlementStore::new());
        let body = r#"{"record": {
            "subscriptionNotification": {"purchaseToken": "tok", "subscriptionId": "gold", "notificationType": 1},
            "userId": "u7"
        }}"#;

        let outcome = processor.handle_body(body).await.unwrap();

        match outcome {
            WebhookOutcome::Processed { product_id, .. } => assert_eq!(product_id, "gold"),
            WebhookOutcome::Skipped => panic!("expected processed outcome"),
        }
        assert_eq!(verifier.calls(), 1);
        assert_eq!(store.is_premium("u7").await, Some(true));
    }

    #[tokio::test]
    async fn test_string_notification_type_is_skipped() {
        let (processor, verifier, store) =
            build(MockPurchaseVerifier::with_state(0), MemoryEntitlementStore::new());
        let body = ONE_TIME_PURCHASE.replace(r#""notificationType": 1"#, r#""notificationType": "5""#);

        let outcome = processor.handle_body(&body).await.unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(verifier.calls(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_float_type_and_numeric_user_id_are_processed() {
        let (processor, verifier, store) =
            build(MockPurchaseVerifier::with_state(0), MemoryEntitlementStore::new());
        let body = ONE_TIME_PURCHASE
            .replace(r#""notificationType": 1"#, r#""notificationType": 1.0"#)
            .replace(r#""userId": "u1""#, r#""userId": 12345"#);

        let outcome = processor.handle_body(&body).await.unwrap();

        match outcome {
            WebhookOutcome::Processed { user_id, .. } => assert_eq!(user_id, "12345"),
            WebhookOutcome::Skipped => panic!("expected processed outcome"),
        }
        assert_eq!(verifier.calls(), 1);
        assert_eq!(store.is_premium("12345").await, Some(true));
    }

    #[tokio::test]
    async fn test_verification_failure_skips_persistence() {
        let (processor, _, store) = build(
            MockPurchaseVerifier::rejecting(400, "invalid token"),
            MemoryEntitlementStore::new(),
        );

        let err = processor.handle_body(ONE_TIME_PURCHASE).await.unwrap_err();

        assert_eq!(err.code(), "VERIFICATION_FAILED");
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_missing_user_id_skips_persistence() {
        let (processor, verifier, store) =
            build(MockPurchaseVerifier::with_state(0), MemoryEntitlementStore::new());
        let body = ONE_TIME_PURCHASE.replace(r#""userId": "u1""#, r#""version": "1.0""#);

        let err = processor.handle_body(&body).await.unwrap_err();

        assert!(matches!(err, EntitlementError::MissingUserId));
        assert_eq!(verifier.calls(), 1);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_verification() {
        let (processor, verifier, _) =
            build(MockPurchaseVerifier::with_state(0), MemoryEntitlementStore::new());
        let body = r#"{"record": {"oneTimeProductNotification": {"productId": "prod1", "notificationType": 1}, "userId": "u1"}}"#;

        let err = processor.handle_body(body).await.unwrap_err();

        assert!(matches!(err, EntitlementError::MissingFields));
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_persistence_error_propagates() {
        let (processor, _, _) = build(
            MockPurchaseVerifier::with_state(0),
            MemoryEntitlementStore::failing("relation \"profiles\" does not exist"),
        );

        let err = processor.handle_body(ONE_TIME_PURCHASE).await.unwrap_err();
        assert!(matches!(err, EntitlementError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_unsupported_shape() {
        let (processor, verifier, _) =
            build(MockPurchaseVerifier::default(), MemoryEntitlementStore::new());

        let err = processor
            .handle_body(r#"{"record": {"userId": "u1"}}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::UnsupportedNotificationShape));
        assert_eq!(verifier.calls(), 0);
    }
}
