//! Account operation error taxonomy.
//!
//! Denials and exhausted credits are expected business outcomes that
//! callers surface to the user; contention and upstream failures are
//! transient and may be retried by the caller as a whole request.

use thiserror::Error;

use super::DenialReason;
use crate::domain::foundation::UserId;

/// Errors from entitlement, ledger, reconciliation, and checkout operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The entitlement evaluator denied access.
    #[error("access denied: {0}")]
    AccessDenied(DenialReason),

    /// A credit decrement was refused because the allowance is already zero.
    #[error("no trial credits remaining")]
    NoCreditsRemaining,

    /// Optimistic commit retries were exhausted.
    #[error("record contention: concurrent updates exhausted retries")]
    Contention,

    /// The external billing collaborator failed or timed out.
    #[error("billing provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// No account record exists for the user.
    #[error("no account for user {0}")]
    NotFound(UserId),

    /// An account record already exists for the user.
    #[error("account already registered for user {0}")]
    AlreadyRegistered(UserId),

    /// A billing customer reference is already attached and may not change.
    #[error("billing customer reference already set")]
    CustomerRefConflict,

    /// The gated copy-generation call failed; nothing was charged.
    #[error("copy generation failed: {0}")]
    GenerationFailed(String),

    /// The record store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AccountError {
    pub fn upstream(reason: impl std::fmt::Display) -> Self {
        AccountError::UpstreamUnavailable(reason.to_string())
    }

    pub fn storage(reason: impl std::fmt::Display) -> Self {
        AccountError::Storage(reason.to_string())
    }

    /// Expected business outcomes are surfaced to the caller for
    /// user-facing messaging and never logged as failures.
    pub fn is_expected_outcome(&self) -> bool {
        matches!(
            self,
            AccountError::AccessDenied(_) | AccountError::NoCreditsRemaining
        )
    }

    /// Transient errors where the caller may retry the whole request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AccountError::Contention | AccountError::UpstreamUnavailable(_)
        )
    }
}
