//! Pure entitlement evaluation.
//!
//! `evaluate` computes the access decision for a record at a point in
//! time. It performs no I/O and is referentially transparent: the caller
//! supplies both the record snapshot and the clock.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccountRecord, SubscriptionStatus};
use crate::domain::foundation::Timestamp;

/// Outcome of an entitlement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The gated feature may be used.
    Granted,
    /// The gated feature may not be used.
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No paid subscription and no live trial to fall back on.
    NoSubscription,
    /// The trial window has elapsed.
    TrialExpired,
    /// The trial allowance is used up.
    CreditsExhausted,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DenialReason::NoSubscription => "no active subscription",
            DenialReason::TrialExpired => "trial period has ended",
            DenialReason::CreditsExhausted => "trial credits exhausted",
        };
        write!(f, "{}", s)
    }
}

/// Computes the current access decision for an account record.
///
/// Paid access requires an active status backed by a subscription
/// reference. Trial access requires all of: trialing status, an open
/// trial window, and at least one remaining credit. An expired but
/// uncanceled trial, or a trial with zero credits, grants nothing.
///
/// Denial reasons are reported in a fixed order: an elapsed trial
/// window wins over exhausted credits, which wins over the generic
/// no-subscription reason.
pub fn evaluate(record: &AccountRecord, now: Timestamp) -> AccessDecision {
    if record.subscription_status.is_active() && record.billing_subscription_ref.is_some() {
        return AccessDecision::Granted;
    }

    if record.subscription_status == SubscriptionStatus::Trialing {
        if let Some(trial_ends_at) = record.trial_ends_at {
            if now.is_before(&trial_ends_at) && record.free_credits > 0 {
                return AccessDecision::Granted;
            }
        }
    }

    if record
        .trial_ends_at
        .map_or(false, |ends| !now.is_before(&ends))
    {
        return AccessDecision::Denied(DenialReason::TrialExpired);
    }

    if record.free_credits == 0 {
        return AccessDecision::Denied(DenialReason::CreditsExhausted);
    }

    AccessDecision::Denied(DenialReason::NoSubscription)
}
