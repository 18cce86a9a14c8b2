//! Mock Purchase Verifier
//!
//! For testing and local development. Answers every lookup with a fixed
//! result and counts how often it was asked.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ProductPurchase, PurchaseVerifier};
use crate::error::{EntitlementError, Result};

enum Answer {
    Purchase(ProductPurchase),
    Rejected { status: u16, body: String },
}

/// Mock verifier with a canned answer
pub struct MockPurchaseVerifier {
    answer: Answer,
    calls: AtomicUsize,
}

impl Default for MockPurchaseVerifier {
    fn default() -> Self {
        Self::with_state(0)
    }
}

impl MockPurchaseVerifier {
    /// Always report the given `purchaseState`
    pub fn with_state(purchase_state: i64) -> Self {
        Self {
            answer: Answer::Purchase(ProductPurchase::with_state(purchase_state)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail as if upstream returned a non-2xx status
    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self {
            answer: Answer::Rejected {
                status,
                body: body.into(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `verify` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PurchaseVerifier for MockPurchaseVerifier {
    async fn verify(&self, product_id: &str, purchase_token: &str) -> Result<ProductPurchase> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(product_id, purchase_token, "Mock purchase lookup");

        match &self.answer {
            Answer::Purchase(purchase) => Ok(purchase.clone()),
            Answer::Rejected { status, body } => Err(EntitlementError::VerificationFailed {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "MockVerifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::PurchaseState;

    #[tokio::test]
    async fn test_mock_verifier() {
        let verifier = MockPurchaseVerifier::with_state(2);

        let purchase = verifier.verify("prod", "tok").await.unwrap();
        assert_eq!(purchase.state(), PurchaseState::Pending);
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_rejecting_verifier() {
        let verifier = MockPurchaseVerifier::rejecting(404, "not found");
        let result = verifier.verify("prod", "tok").await;
        assert!(matches!(
            result,
            Err(EntitlementError::VerificationFailed { status: 404, .. })
        ));
    }
}
