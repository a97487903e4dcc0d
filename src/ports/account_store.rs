//! Account record store port.
//!
//! The store holds one entitlement record per user and is the only
//! shared mutable state in the system. Every write is an optimistic
//! compare-and-commit against the version observed at read time; the
//! store guarantees atomicity at single-record granularity.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::account::{AccountError, AccountRecord};
use crate::domain::foundation::UserId;

/// A record snapshot together with the version it was read at.
#[derive(Debug, Clone)]
pub struct VersionedRecord {
    pub record: AccountRecord,
    pub version: u64,
}

/// Result of a compare-and-commit write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The write landed; carries the new stored version.
    Committed(u64),
    /// The stored version moved since the snapshot was read; the caller
    /// must re-read and retry.
    Conflict,
}

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account already exists for user {0}")]
    AlreadyExists(UserId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(user_id) => AccountError::AlreadyRegistered(user_id),
            StoreError::Backend(msg) => AccountError::Storage(msg),
        }
    }
}

/// Durable storage for account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a freshly registered record at version 1.
    ///
    /// Fails with `AlreadyExists` if the user already has a record.
    async fn insert(&self, record: AccountRecord) -> Result<(), StoreError>;

    /// Loads the record for a user.
    async fn load(&self, user_id: &UserId) -> Result<Option<VersionedRecord>, StoreError>;

    /// Looks a record up by its billing customer reference
    /// (secondary index used by webhook reconciliation).
    async fn find_by_customer_ref(
        &self,
        customer_ref: &str,
    ) -> Result<Option<VersionedRecord>, StoreError>;

    /// Commits a mutated record if the stored version still equals
    /// `expected_version`.
    async fn commit(
        &self,
        record: &AccountRecord,
        expected_version: u64,
    ) -> Result<CommitOutcome, StoreError>;
}
