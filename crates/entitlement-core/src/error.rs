//! Error Types

use thiserror::Error;

/// Result type alias for entitlement operations
pub type Result<T> = std::result::Result<T, EntitlementError>;

/// Entitlement reconciliation errors
///
/// Every variant surfaces to the notifier as a `400`; `code()` is the only
/// way a caller can tell them apart.
#[derive(Error, Debug)]
pub enum EntitlementError {
    /// Required configuration missing or malformed
    #[error("{0}")]
    Config(String),

    /// Request body is not a valid webhook payload
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// Neither a subscription nor a one-time product notification
    #[error("Unsupported Google Play webhook notification type.")]
    UnsupportedNotificationShape,

    /// Purchase token or product id absent
    #[error("Missing purchase token or product ID in webhook payload.")]
    MissingFields,

    /// Service-account credential exchange failed
    #[error("Google authentication failed: {0}")]
    Auth(String),

    /// Purchase verification endpoint answered with a non-2xx status
    #[error("Google Play API verification failed: {status} - {body}")]
    VerificationFailed { status: u16, body: String },

    /// No user to attach the entitlement to
    #[error("User ID not found in webhook payload. Cannot update premium status.")]
    MissingUserId,

    /// Profile store rejected the update
    #[error("{0}")]
    Persistence(String),

    /// Transport-level failure talking to an upstream service
    #[error("HTTP error: {0}")]
    Http(String),
}

impl EntitlementError {
    /// Missing Google Play credentials
    pub fn google_play_not_configured() -> Self {
        Self::Config("Google Play service account key or package name not set.".into())
    }

    /// Stable machine-readable tag for this error kind
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIGURATION_ERROR",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnsupportedNotificationShape => "UNSUPPORTED_NOTIFICATION_SHAPE",
            Self::MissingFields => "MISSING_FIELDS",
            Self::Auth(_) => "AUTH_FAILED",
            Self::VerificationFailed { .. } => "VERIFICATION_FAILED",
            Self::MissingUserId => "MISSING_USER_ID",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Http(_) => "HTTP_ERROR",
        }
    }

    /// Whether the failure happened after the payload was accepted
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Auth(_)
                | Self::VerificationFailed { .. }
                | Self::Persistence(_)
                | Self::Http(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_notifier_contract() {
        assert_eq!(
            EntitlementError::UnsupportedNotificationShape.to_string(),
            "Unsupported Google Play webhook notification type."
        );
        assert_eq!(
            EntitlementError::google_play_not_configured().to_string(),
            "Google Play service account key or package name not set."
        );
        let err = EntitlementError::VerificationFailed {
            status: 410,
            body: "gone".into(),
        };
        assert_eq!(err.to_string(), "Google Play API verification failed: 410 - gone");
    }

    #[test]
    fn test_codes() {
        assert_eq!(EntitlementError::MissingUserId.code(), "MISSING_USER_ID");
        assert_eq!(EntitlementError::Persistence("x".into()).code(), "PERSISTENCE_ERROR");
        assert_eq!(EntitlementError::InvalidPayload("eof".into()).code(), "INVALID_PAYLOAD");
        assert_eq!(EntitlementError::Http("timeout".into()).code(), "HTTP_ERROR");
        assert!(EntitlementError::Auth("bad key".into()).is_upstream());
        assert!(!EntitlementError::MissingFields.is_upstream());
    }
}
