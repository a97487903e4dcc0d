//! Account record aggregate.
//!
//! One record per user, owned exclusively by the account store. All
//! mutation goes through the methods below so the aggregate can hold
//! its invariants:
//!
//! - `Active` implies a billing subscription reference is present.
//! - `Canceled` implies the subscription reference is absent.
//! - `free_credits` never goes negative.
//! - `trial_ends_at` is set exactly once, at registration.
//! - `billing_customer_ref`, once set, is never cleared or replaced.

use serde::{Deserialize, Serialize};

use super::{AccountError, SubscriptionStatus};
use crate::domain::foundation::{StateMachine, Timestamp, UserId};

/// Per-user entitlement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Owner of this record.
    pub user_id: UserId,

    /// Email used when creating the billing customer.
    pub email: String,

    /// Billing-provider customer reference. Write-once.
    pub billing_customer_ref: Option<String>,

    /// Billing-provider subscription reference. Present iff `Active`.
    pub billing_subscription_ref: Option<String>,

    /// Current subscription lifecycle status.
    pub subscription_status: SubscriptionStatus,

    /// End of the free trial window. Set once at registration.
    pub trial_ends_at: Option<Timestamp>,

    /// Remaining trial allowance.
    pub free_credits: u32,

    /// When the account was registered.
    pub created_at: Timestamp,

    /// When the record was last mutated.
    pub updated_at: Timestamp,
}

impl AccountRecord {
    /// Trial allowance granted at registration.
    pub const TRIAL_CREDITS: u32 = 5;

    /// Length of the trial window in days.
    pub const TRIAL_PERIOD_DAYS: i64 = 7;

    /// Creates the record for a newly registered user: trialing, full
    /// allowance, trial window open from `now`.
    pub fn register(user_id: UserId, email: String, now: Timestamp) -> Self {
        Self {
            user_id,
            email,
            billing_customer_ref: None,
            billing_subscription_ref: None,
            subscription_status: SubscriptionStatus::Trialing,
            trial_ends_at: Some(now.add_days(Self::TRIAL_PERIOD_DAYS)),
            free_credits: Self::TRIAL_CREDITS,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the billing customer reference if none is present.
    ///
    /// Attaching the same reference again is a no-op; a different
    /// reference is refused so the field stays write-once.
    pub fn attach_customer_ref(&mut self, customer_ref: String) -> Result<(), AccountError> {
        match &self.billing_customer_ref {
            Some(existing) if *existing == customer_ref => Ok(()),
            Some(_) => Err(AccountError::CustomerRefConflict),
            None => {
                self.billing_customer_ref = Some(customer_ref);
                self.updated_at = Timestamp::now();
                Ok(())
            }
        }
    }

    /// Applies a subscription activation event.
    ///
    /// Sets the record active with the given subscription reference and
    /// forfeits any remaining trial allowance. Returns `false` when the
    /// record is already active with the same reference (idempotent
    /// redelivery), `true` when the record changed. An activation with a
    /// newer subscription reference replaces the stored one: the most
    /// recently applied event is authoritative.
    pub fn apply_activation(&mut self, subscription_ref: &str) -> bool {
        if self.subscription_status.is_active()
            && self.billing_subscription_ref.as_deref() == Some(subscription_ref)
        {
            return false;
        }

        debug_assert!(self
            .subscription_status
            .can_transition_to(&SubscriptionStatus::Active));
        self.subscription_status = SubscriptionStatus::Active;
        self.billing_subscription_ref = Some(subscription_ref.to_string());
        self.free_credits = 0;
        self.updated_at = Timestamp::now();
        true
    }

    /// Applies a subscription cancellation event.
    ///
    /// Cancellation only has effect on an active subscription; a stale
    /// or duplicate cancel against a trialing or already-canceled record
    /// is a no-op. Returns `true` when the record changed.
    pub fn apply_cancellation(&mut self) -> bool {
        if !self.subscription_status.is_active() {
            return false;
        }

        debug_assert!(self
            .subscription_status
            .can_transition_to(&SubscriptionStatus::Canceled));
        self.subscription_status = SubscriptionStatus::Canceled;
        self.billing_subscription_ref = None;
        self.updated_at = Timestamp::now();
        true
    }

    /// Decrements the trial allowance by one.
    ///
    /// Refused when the allowance is already zero, so the counter can
    /// never go negative even against a stale entitlement check.
    pub fn consume_credit(&mut self) -> Result<u32, AccountError> {
        if self.free_credits == 0 {
            return Err(AccountError::NoCreditsRemaining);
        }
        self.free_credits -= 1;
        self.updated_at = Timestamp::now();
        Ok(self.free_credits)
    }

    /// Invariant check used by tests and debug assertions.
    pub fn invariants_hold(&self) -> bool {
        let active_has_ref = !self.subscription_status.is_active()
            || self.billing_subscription_ref.is_some();
        let canceled_has_no_ref = self.subscription_status != SubscriptionStatus::Canceled
            || self.billing_subscription_ref.is_none();
        active_has_ref && canceled_has_no_ref
    }
}
