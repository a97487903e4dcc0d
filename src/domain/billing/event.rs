//! Billing event envelope.
//!
//! Events arrive from the billing provider as a signed JSON envelope
//! with a string type tag. Only subscription activation and
//! cancellation drive local state; everything else is acknowledged and
//! ignored. Delivery may be duplicated or out of order, so consumers
//! must not assume arrival order.

use serde::{Deserialize, Serialize};

/// A verified billing-provider event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingEvent {
    /// Provider-assigned event id.
    pub id: String,

    /// Event type tag, e.g. `subscription.activated`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Provider-side creation time (Unix seconds).
    pub created: i64,

    /// Event payload.
    pub data: BillingEventData,
}

/// Payload carried by a billing event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingEventData {
    /// Billing customer reference the event applies to.
    pub customer: String,

    /// Subscription reference; present on activation events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

/// Parsed event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEventKind {
    SubscriptionActivated,
    SubscriptionCanceled,
    Unknown(String),
}

impl BillingEvent {
    pub const SUBSCRIPTION_ACTIVATED: &'static str = "subscription.activated";
    pub const SUBSCRIPTION_CANCELED: &'static str = "subscription.canceled";

    /// Classifies the event type tag.
    pub fn kind(&self) -> BillingEventKind {
        match self.event_type.as_str() {
            Self::SUBSCRIPTION_ACTIVATED => BillingEventKind::SubscriptionActivated,
            Self::SUBSCRIPTION_CANCELED => BillingEventKind::SubscriptionCanceled,
            other => BillingEventKind::Unknown(other.to_string()),
        }
    }
}
