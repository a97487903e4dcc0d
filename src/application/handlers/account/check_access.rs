//! CheckAccessHandler - Query handler for the entitlement decision.

use std::sync::Arc;

use crate::domain::account::{evaluate, AccessDecision, AccountError, SubscriptionStatus};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::AccountStore;

/// Query for a user's current access decision.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
}

/// Result of an access check.
#[derive(Debug, Clone)]
pub struct CheckAccessResult {
    pub decision: AccessDecision,
    pub status: SubscriptionStatus,
    pub remaining_credits: u32,
    pub trial_ends_at: Option<Timestamp>,
}

/// Handler for entitlement queries.
///
/// Read-only: loads a snapshot and runs the pure evaluator against the
/// current clock. The most frequently called path in the system.
pub struct CheckAccessHandler {
    store: Arc<dyn AccountStore>,
}

impl CheckAccessHandler {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<CheckAccessResult, AccountError> {
        let snapshot = self
            .store
            .load(&query.user_id)
            .await?
            .ok_or(AccountError::NotFound(query.user_id))?;

        let record = snapshot.record;
        Ok(CheckAccessResult {
            decision: evaluate(&record, Timestamp::now()),
            status: record.subscription_status,
            remaining_credits: record.free_credits,
            trial_ends_at: record.trial_ends_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountStore;
    use crate::domain::account::{AccountRecord, DenialReason};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    async fn store_with(record: AccountRecord) -> Arc<InMemoryAccountStore> {
        let store = Arc::new(InMemoryAccountStore::new());
        store.insert(record).await.unwrap();
        store
    }

    #[tokio::test]
    async fn fresh_trial_account_is_granted() {
        let record =
            AccountRecord::register(user(), "user@example.com".to_string(), Timestamp::now());
        let handler = CheckAccessHandler::new(store_with(record).await);

        let result = handler.handle(CheckAccessQuery { user_id: user() }).await.unwrap();
        assert_eq!(result.decision, AccessDecision::Granted);
        assert_eq!(result.remaining_credits, 5);
    }

    #[tokio::test]
    async fn expired_trial_reports_trial_expired() {
        let mut record =
            AccountRecord::register(user(), "user@example.com".to_string(), Timestamp::now());
        record.trial_ends_at = Some(Timestamp::now().minus_days(1));
        let handler = CheckAccessHandler::new(store_with(record).await);

        let result = handler.handle(CheckAccessQuery { user_id: user() }).await.unwrap();
        assert_eq!(
            result.decision,
            AccessDecision::Denied(DenialReason::TrialExpired)
        );
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let handler = CheckAccessHandler::new(Arc::new(InMemoryAccountStore::new()));

        let result = handler.handle(CheckAccessQuery { user_id: user() }).await;
        assert!(matches!(result, Err(AccountError::NotFound(_))));
    }
}
