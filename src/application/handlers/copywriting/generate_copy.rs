//! GenerateCopyHandler - the gated feature flow.
//!
//! Order matters: entitlement is checked before the generator runs, and
//! the credit is charged only after generation succeeds, so a failed
//! generation never costs a credit. If the post-generation charge loses
//! a race (allowance spent concurrently), the ledger error wins and the
//! draft is withheld, keeping the ledger authoritative over delivery.

use std::sync::Arc;

use crate::application::handlers::credits::{ConsumeCreditCommand, ConsumeCreditHandler};
use crate::domain::account::{evaluate, AccessDecision, AccountError};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{AccountStore, CopyDraft, CopyGenerator, CopyRequest};

/// Command to generate campaign copy for a user.
#[derive(Debug, Clone)]
pub struct GenerateCopyCommand {
    pub user_id: UserId,
    pub request: CopyRequest,
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GenerateCopyResult {
    pub draft: CopyDraft,
    pub remaining_credits: u32,
    /// Whether the call was metered (trial) or unmetered (paid).
    pub metered: bool,
}

/// Handler for the gated copy-generation feature.
pub struct GenerateCopyHandler {
    store: Arc<dyn AccountStore>,
    generator: Arc<dyn CopyGenerator>,
}

impl GenerateCopyHandler {
    pub fn new(store: Arc<dyn AccountStore>, generator: Arc<dyn CopyGenerator>) -> Self {
        Self { store, generator }
    }

    pub async fn handle(
        &self,
        cmd: GenerateCopyCommand,
    ) -> Result<GenerateCopyResult, AccountError> {
        let snapshot = self
            .store
            .load(&cmd.user_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(cmd.user_id.clone()))?;

        if let AccessDecision::Denied(reason) = evaluate(&snapshot.record, Timestamp::now()) {
            return Err(AccountError::AccessDenied(reason));
        }

        let draft = self
            .generator
            .generate(cmd.request)
            .await
            .map_err(|e| AccountError::GenerationFailed(e.to_string()))?;

        let ledger = ConsumeCreditHandler::new(self.store.clone());
        let charge = ledger
            .handle(ConsumeCreditCommand {
                user_id: cmd.user_id,
            })
            .await?;

        Ok(GenerateCopyResult {
            draft,
            remaining_credits: charge.remaining_credits,
            metered: charge.metered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCopywriter;
    use crate::adapters::memory::InMemoryAccountStore;
    use crate::domain::account::{AccountRecord, DenialReason};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn brief() -> CopyRequest {
        CopyRequest {
            topic: "Spring sale".to_string(),
            audience: "runners".to_string(),
            benefit: "lighter shoes".to_string(),
            placement: "social".to_string(),
        }
    }

    async fn store_with(record: AccountRecord) -> Arc<InMemoryAccountStore> {
        let store = Arc::new(InMemoryAccountStore::new());
        store.insert(record).await.unwrap();
        store
    }

    fn trial_record() -> AccountRecord {
        AccountRecord::register(user(), "user@example.com".to_string(), Timestamp::now())
    }

    #[tokio::test]
    async fn trial_generation_charges_one_credit() {
        let store = store_with(trial_record()).await;
        let handler = GenerateCopyHandler::new(store.clone(), Arc::new(MockCopywriter::new()));

        let result = handler
            .handle(GenerateCopyCommand {
                user_id: user(),
                request: brief(),
            })
            .await
            .unwrap();

        assert!(result.metered);
        assert_eq!(result.remaining_credits, 4);
        assert!(!result.draft.headline.is_empty());
        assert_eq!(
            store.load(&user()).await.unwrap().unwrap().record.free_credits,
            4
        );
    }

    #[tokio::test]
    async fn paid_generation_is_unmetered() {
        let mut record = trial_record();
        record.apply_activation("sub_1");
        let store = store_with(record).await;
        let handler = GenerateCopyHandler::new(store, Arc::new(MockCopywriter::new()));

        let result = handler
            .handle(GenerateCopyCommand {
                user_id: user(),
                request: brief(),
            })
            .await
            .unwrap();

        assert!(!result.metered);
        assert_eq!(result.remaining_credits, 0);
    }

    #[tokio::test]
    async fn denied_account_never_reaches_the_generator() {
        let mut record = trial_record();
        record.free_credits = 0;
        let store = store_with(record).await;
        let copywriter = Arc::new(MockCopywriter::new());
        let handler = GenerateCopyHandler::new(store, copywriter.clone());

        let result = handler
            .handle(GenerateCopyCommand {
                user_id: user(),
                request: brief(),
            })
            .await;

        assert_eq!(
            result.err(),
            Some(AccountError::AccessDenied(DenialReason::CreditsExhausted))
        );
        assert_eq!(copywriter.calls(), 0);
    }

    #[tokio::test]
    async fn failed_generation_charges_nothing() {
        let store = store_with(trial_record()).await;
        let handler = GenerateCopyHandler::new(store.clone(), Arc::new(MockCopywriter::failing()));

        let result = handler
            .handle(GenerateCopyCommand {
                user_id: user(),
                request: brief(),
            })
            .await;

        assert!(matches!(result, Err(AccountError::GenerationFailed(_))));
        assert_eq!(
            store.load(&user()).await.unwrap().unwrap().record.free_credits,
            5
        );
    }
}
