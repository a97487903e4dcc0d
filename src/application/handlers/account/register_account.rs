//! RegisterAccountHandler - Command handler for account registration.

use std::sync::Arc;

use crate::domain::account::{AccountError, AccountRecord};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::AccountStore;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterAccountCommand {
    pub user_id: UserId,
    pub email: String,
}

/// Result of registration.
#[derive(Debug, Clone)]
pub struct RegisterAccountResult {
    pub record: AccountRecord,
}

/// Handler for account registration.
///
/// Creates the entitlement record with the trial defaults: trialing
/// status, full credit allowance, trial window opening now.
pub struct RegisterAccountHandler {
    store: Arc<dyn AccountStore>,
}

impl RegisterAccountHandler {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RegisterAccountCommand,
    ) -> Result<RegisterAccountResult, AccountError> {
        let record = AccountRecord::register(cmd.user_id, cmd.email, Timestamp::now());
        self.store.insert(record.clone()).await?;

        tracing::info!(user_id = %record.user_id, "account registered with trial allowance");
        Ok(RegisterAccountResult { record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountStore;
    use crate::domain::account::SubscriptionStatus;

    fn test_command() -> RegisterAccountCommand {
        RegisterAccountCommand {
            user_id: UserId::new("user-1").unwrap(),
            email: "user@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn registration_creates_trialing_record() {
        let store = Arc::new(InMemoryAccountStore::new());
        let handler = RegisterAccountHandler::new(store.clone());

        let result = handler.handle(test_command()).await.unwrap();
        assert_eq!(result.record.subscription_status, SubscriptionStatus::Trialing);
        assert_eq!(result.record.free_credits, AccountRecord::TRIAL_CREDITS);

        let stored = store
            .load(&UserId::new("user-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.record, result.record);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let store = Arc::new(InMemoryAccountStore::new());
        let handler = RegisterAccountHandler::new(store);

        handler.handle(test_command()).await.unwrap();
        let result = handler.handle(test_command()).await;

        assert!(matches!(result, Err(AccountError::AlreadyRegistered(_))));
    }
}
