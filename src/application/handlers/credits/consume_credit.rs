//! ConsumeCreditHandler - the credit ledger.
//!
//! Applies the exactly-once-per-use decrement that meters trial
//! accounts. The load-evaluate-decrement-commit sequence is made atomic
//! against concurrent spends by the store's compare-and-commit: a
//! conflicting write forces a fresh read, so two racing requests can
//! never both spend the last credit.

use std::sync::Arc;

use crate::application::handlers::MAX_COMMIT_ATTEMPTS;
use crate::domain::account::{evaluate, AccessDecision, AccountError};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{AccountStore, CommitOutcome};

/// Command to charge one credit for a successful feature use.
#[derive(Debug, Clone)]
pub struct ConsumeCreditCommand {
    pub user_id: UserId,
}

/// Result of a ledger call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumeCreditResult {
    /// Credits left after the call.
    pub remaining_credits: u32,
    /// Whether a credit was actually charged. Paid accounts are
    /// unmetered and report `false`.
    pub metered: bool,
}

/// Handler for credit consumption.
pub struct ConsumeCreditHandler {
    store: Arc<dyn AccountStore>,
}

impl ConsumeCreditHandler {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Charges one trial credit, re-evaluating entitlement at current
    /// time on every attempt.
    ///
    /// Fails with `AccessDenied` (no mutation) when the evaluator
    /// denies, `NoCreditsRemaining` when the allowance is already zero,
    /// and `Contention` when commit retries are exhausted.
    pub async fn handle(
        &self,
        cmd: ConsumeCreditCommand,
    ) -> Result<ConsumeCreditResult, AccountError> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let snapshot = self
                .store
                .load(&cmd.user_id)
                .await?
                .ok_or_else(|| AccountError::NotFound(cmd.user_id.clone()))?;
            let mut record = snapshot.record;

            if let AccessDecision::Denied(reason) = evaluate(&record, Timestamp::now()) {
                return Err(AccountError::AccessDenied(reason));
            }

            // Paid accounts are unmetered; nothing to commit.
            if record.subscription_status.is_active() {
                return Ok(ConsumeCreditResult {
                    remaining_credits: record.free_credits,
                    metered: false,
                });
            }

            let remaining = record.consume_credit()?;
            match self.store.commit(&record, snapshot.version).await? {
                CommitOutcome::Committed(_) => {
                    return Ok(ConsumeCreditResult {
                        remaining_credits: remaining,
                        metered: true,
                    });
                }
                CommitOutcome::Conflict => continue,
            }
        }

        Err(AccountError::Contention)
    }
}
