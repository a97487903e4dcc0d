//! ReconcileBillingEventHandler - applies billing events to local state.
//!
//! Events may arrive duplicated or out of order. Idempotence is
//! state-based: activation short-circuits when the record already holds
//! the same subscription, and cancellation only has effect on an active
//! record, so stale or repeated deliveries converge instead of
//! corrupting state. The handler does not sequence subscription
//! references; the most recently applied event is authoritative.
//!
//! Events referencing an unknown billing customer are logged and
//! acknowledged: the account may simply not exist locally (test events,
//! deleted accounts), and failing the delivery would only trigger
//! provider-side redelivery.

use std::sync::Arc;

use crate::application::handlers::MAX_COMMIT_ATTEMPTS;
use crate::domain::account::AccountError;
use crate::domain::billing::{BillingEvent, BillingEventKind};
use crate::ports::{AccountStore, CommitOutcome};

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The record was mutated and committed.
    Applied,
    /// The event was already reflected in the record; nothing written.
    NoChange,
    /// No local account matches the billing customer reference.
    UnknownAccount,
    /// The event type is not one this system reconciles.
    Ignored,
}

/// Handler for verified billing events.
pub struct ReconcileBillingEventHandler {
    store: Arc<dyn AccountStore>,
}

impl ReconcileBillingEventHandler {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Dispatches a verified event to the matching transition.
    pub async fn handle(&self, event: &BillingEvent) -> Result<ReconcileOutcome, AccountError> {
        match event.kind() {
            BillingEventKind::SubscriptionActivated => {
                let subscription_ref = match event.data.subscription.as_deref() {
                    Some(r) => r,
                    None => {
                        tracing::warn!(
                            event_id = %event.id,
                            "activation event without subscription reference; ignoring"
                        );
                        return Ok(ReconcileOutcome::Ignored);
                    }
                };
                self.apply_subscription_activated(&event.data.customer, subscription_ref)
                    .await
            }
            BillingEventKind::SubscriptionCanceled => {
                self.apply_subscription_canceled(&event.data.customer).await
            }
            BillingEventKind::Unknown(kind) => {
                tracing::debug!(event_id = %event.id, kind = %kind, "unhandled billing event type");
                Ok(ReconcileOutcome::Ignored)
            }
        }
    }

    /// Marks the account active under the given subscription, forfeiting
    /// the trial allowance. Idempotent against redelivery.
    pub async fn apply_subscription_activated(
        &self,
        customer_ref: &str,
        subscription_ref: &str,
    ) -> Result<ReconcileOutcome, AccountError> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let Some(snapshot) = self.store.find_by_customer_ref(customer_ref).await? else {
                tracing::info!(
                    customer_ref,
                    "activation for unknown billing customer; acknowledging without change"
                );
                return Ok(ReconcileOutcome::UnknownAccount);
            };

            let mut record = snapshot.record;
            if !record.apply_activation(subscription_ref) {
                return Ok(ReconcileOutcome::NoChange);
            }

            match self.store.commit(&record, snapshot.version).await? {
                CommitOutcome::Committed(_) => {
                    tracing::info!(
                        user_id = %record.user_id,
                        subscription_ref,
                        "subscription activated"
                    );
                    return Ok(ReconcileOutcome::Applied);
                }
                CommitOutcome::Conflict => continue,
            }
        }

        Err(AccountError::Contention)
    }

    /// Cancels the account's subscription. No effect unless the record
    /// is currently active.
    pub async fn apply_subscription_canceled(
        &self,
        customer_ref: &str,
    ) -> Result<ReconcileOutcome, AccountError> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let Some(snapshot) = self.store.find_by_customer_ref(customer_ref).await? else {
                tracing::info!(
                    customer_ref,
                    "cancellation for unknown billing customer; acknowledging without change"
                );
                return Ok(ReconcileOutcome::UnknownAccount);
            };

            let mut record = snapshot.record;
            if !record.apply_cancellation() {
                return Ok(ReconcileOutcome::NoChange);
            }

            match self.store.commit(&record, snapshot.version).await? {
                CommitOutcome::Committed(_) => {
                    tracing::info!(user_id = %record.user_id, "subscription canceled");
                    return Ok(ReconcileOutcome::Applied);
                }
                CommitOutcome::Conflict => continue,
            }
        }

        Err(AccountError::Contention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountStore;
    use crate::domain::account::{AccountRecord, SubscriptionStatus};
    use crate::domain::billing::BillingEventData;
    use crate::domain::foundation::{Timestamp, UserId};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    async fn store_with_customer(customer_ref: &str) -> Arc<InMemoryAccountStore> {
        let mut record =
            AccountRecord::register(user(), "user@example.com".to_string(), Timestamp::now());
        record.attach_customer_ref(customer_ref.to_string()).unwrap();
        let store = Arc::new(InMemoryAccountStore::new());
        store.insert(record).await.unwrap();
        store
    }

    async fn record_in(store: &InMemoryAccountStore) -> AccountRecord {
        store.load(&user()).await.unwrap().unwrap().record
    }

    #[tokio::test]
    async fn activation_converts_trial_and_forfeits_credits() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        let outcome = handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Applied);

        let record = record_in(&store).await;
        assert_eq!(record.subscription_status, SubscriptionStatus::Active);
        assert_eq!(record.billing_subscription_ref.as_deref(), Some("sub_1"));
        assert_eq!(record.free_credits, 0);
    }

    #[tokio::test]
    async fn activation_is_idempotent() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();
        let after_first = record_in(&store).await;

        let outcome = handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::NoChange);
        assert_eq!(record_in(&store).await, after_first);
    }

    #[tokio::test]
    async fn activation_for_unknown_customer_is_acknowledged_noop() {
        let store = Arc::new(InMemoryAccountStore::new());
        let handler = ReconcileBillingEventHandler::new(store);

        let outcome = handler
            .apply_subscription_activated("cus_missing", "sub_1")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::UnknownAccount);
    }

    #[tokio::test]
    async fn cancellation_only_affects_active_records() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        // Trialing record: stale cancel is a no-op.
        let outcome = handler.apply_subscription_canceled("cus_1").await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::NoChange);
        let record = record_in(&store).await;
        assert_eq!(record.subscription_status, SubscriptionStatus::Trialing);
        assert_eq!(record.free_credits, 5);
    }

    #[tokio::test]
    async fn cancellation_clears_active_subscription() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();
        let outcome = handler.apply_subscription_canceled("cus_1").await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Applied);

        let record = record_in(&store).await;
        assert_eq!(record.subscription_status, SubscriptionStatus::Canceled);
        assert!(record.billing_subscription_ref.is_none());
    }

    #[tokio::test]
    async fn duplicate_cancellation_is_noop() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();
        handler.apply_subscription_canceled("cus_1").await.unwrap();

        let outcome = handler.apply_subscription_canceled("cus_1").await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::NoChange);
    }

    #[tokio::test]
    async fn activate_cancel_activate_converges_to_active() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();
        handler.apply_subscription_canceled("cus_1").await.unwrap();
        handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();

        let record = record_in(&store).await;
        assert_eq!(record.subscription_status, SubscriptionStatus::Active);
        assert_eq!(record.billing_subscription_ref.as_deref(), Some("sub_1"));
        assert_eq!(record.free_credits, 0);
    }

    #[tokio::test]
    async fn out_of_order_cancel_then_activate_ends_active() {
        // The cancel for a subscription that "logically followed" the
        // activation arrives first; the most recently applied event wins.
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        handler.apply_subscription_canceled("cus_1").await.unwrap();
        handler
            .apply_subscription_activated("cus_1", "sub_1")
            .await
            .unwrap();

        let record = record_in(&store).await;
        assert_eq!(record.subscription_status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn dispatch_routes_by_event_type() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        let event = BillingEvent {
            id: "evt_1".to_string(),
            event_type: BillingEvent::SUBSCRIPTION_ACTIVATED.to_string(),
            created: 1767225600,
            data: BillingEventData {
                customer: "cus_1".to_string(),
                subscription: Some("sub_1".to_string()),
            },
        };

        assert_eq!(handler.handle(&event).await.unwrap(), ReconcileOutcome::Applied);
        assert!(record_in(&store).await.subscription_status.is_active());
    }

    #[tokio::test]
    async fn dispatch_ignores_unknown_event_types() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store);

        let event = BillingEvent {
            id: "evt_2".to_string(),
            event_type: "invoice.paid".to_string(),
            created: 1767225600,
            data: BillingEventData {
                customer: "cus_1".to_string(),
                subscription: None,
            },
        };

        assert_eq!(handler.handle(&event).await.unwrap(), ReconcileOutcome::Ignored);
    }

    #[tokio::test]
    async fn dispatch_ignores_activation_without_subscription_ref() {
        let store = store_with_customer("cus_1").await;
        let handler = ReconcileBillingEventHandler::new(store.clone());

        let event = BillingEvent {
            id: "evt_3".to_string(),
            event_type: BillingEvent::SUBSCRIPTION_ACTIVATED.to_string(),
            created: 1767225600,
            data: BillingEventData {
                customer: "cus_1".to_string(),
                subscription: None,
            },
        };

        assert_eq!(handler.handle(&event).await.unwrap(), ReconcileOutcome::Ignored);
        assert!(record_in(&store).await.subscription_status.is_trialing());
    }
}
