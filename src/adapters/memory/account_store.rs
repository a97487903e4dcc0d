//! In-memory account store with optimistic versioning.
//!
//! Each record carries a monotonically increasing version; `commit`
//! applies the write only when the caller's snapshot version still
//! matches. The whole map sits behind one async lock, which is enough
//! for tests and single-process use: the lock makes every individual
//! operation atomic, while cross-operation atomicity comes from the
//! version check exactly like a real backend.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::account::AccountRecord;
use crate::domain::foundation::UserId;
use crate::ports::{AccountStore, CommitOutcome, StoreError, VersionedRecord};

/// Account store backed by a process-local map.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<UserId, (AccountRecord, u64)>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, record: AccountRecord) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&record.user_id) {
            return Err(StoreError::AlreadyExists(record.user_id));
        }
        accounts.insert(record.user_id.clone(), (record, 1));
        Ok(())
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<VersionedRecord>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(user_id).map(|(record, version)| VersionedRecord {
            record: record.clone(),
            version: *version,
        }))
    }

    async fn find_by_customer_ref(
        &self,
        customer_ref: &str,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|(record, _)| record.billing_customer_ref.as_deref() == Some(customer_ref))
            .map(|(record, version)| VersionedRecord {
                record: record.clone(),
                version: *version,
            }))
    }

    async fn commit(
        &self,
        record: &AccountRecord,
        expected_version: u64,
    ) -> Result<CommitOutcome, StoreError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&record.user_id) {
            None => Err(StoreError::Backend(format!(
                "commit against missing record for user {}",
                record.user_id
            ))),
            Some((stored, version)) => {
                if *version != expected_version {
                    return Ok(CommitOutcome::Conflict);
                }
                *stored = record.clone();
                *version += 1;
                Ok(CommitOutcome::Committed(*version))
            }
        }
    }
}
