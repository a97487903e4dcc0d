//! Subscription status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Free trial window after registration. Metered access while the
    /// window is open and credits remain.
    Trialing,

    /// Paid subscription confirmed by the billing provider. Unmetered.
    Active,

    /// Subscription ended at the billing provider. No access.
    Canceled,
}

impl SubscriptionStatus {
    /// Returns true for a confirmed paid subscription.
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }

    /// Returns true while the account is in its trial lifecycle.
    pub fn is_trialing(&self) -> bool {
        matches!(self, SubscriptionStatus::Trialing)
    }

    /// Stable string form used by storage adapters.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trialing" => Some(SubscriptionStatus::Trialing),
            "active" => Some(SubscriptionStatus::Active),
            "canceled" => Some(SubscriptionStatus::Canceled),
            _ => None,
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // Trial converts on the first confirmed payment
            (Trialing, Active)
            // Re-delivered or newer activation for an already-active account
                | (Active, Active)
                | (Active, Canceled)
            // Resubscribe after cancellation
                | (Canceled, Active)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trialing_can_activate() {
        assert!(SubscriptionStatus::Trialing.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn trialing_cannot_cancel_directly() {
        // Cancellation only has effect on an active subscription.
        assert!(!SubscriptionStatus::Trialing.can_transition_to(&SubscriptionStatus::Canceled));
    }

    #[test]
    fn active_can_reactivate() {
        assert!(SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn active_can_cancel() {
        assert!(SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Canceled));
    }

    #[test]
    fn canceled_can_resubscribe() {
        assert!(SubscriptionStatus::Canceled.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn canceled_is_terminal_except_resubscribe() {
        assert!(!SubscriptionStatus::Canceled.can_transition_to(&SubscriptionStatus::Trialing));
        assert!(!SubscriptionStatus::Canceled.can_transition_to(&SubscriptionStatus::Canceled));
    }

    #[test]
    fn nothing_returns_to_trialing() {
        assert!(!SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Trialing));
    }

    #[test]
    fn string_form_round_trips() {
        for status in [
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Active,
            SubscriptionStatus::Canceled,
        ] {
            assert_eq!(SubscriptionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubscriptionStatus::parse("past_due"), None);
    }
}
