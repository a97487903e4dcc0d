//! PostgreSQL account store.
//!
//! One row per user with a `version` column; compare-and-commit is an
//! `UPDATE ... WHERE user_id = $1 AND version = $2`, so conflicting
//! writers are detected by the affected-row count without any explicit
//! locking.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     user_id                  TEXT PRIMARY KEY,
//!     email                    TEXT NOT NULL,
//!     billing_customer_ref     TEXT,
//!     billing_subscription_ref TEXT,
//!     subscription_status      TEXT NOT NULL,
//!     trial_ends_at            TIMESTAMPTZ,
//!     free_credits             INTEGER NOT NULL CHECK (free_credits >= 0),
//!     created_at               TIMESTAMPTZ NOT NULL,
//!     updated_at               TIMESTAMPTZ NOT NULL,
//!     version                  BIGINT NOT NULL
//! );
//! CREATE INDEX accounts_billing_customer_ref_idx
//!     ON accounts (billing_customer_ref);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::domain::account::{AccountRecord, SubscriptionStatus};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{AccountStore, CommitOutcome, StoreError, VersionedRecord};

/// Account store backed by PostgreSQL.
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<VersionedRecord, StoreError> {
        let user_id: String = row.try_get("user_id").map_err(backend)?;
        let status: String = row.try_get("subscription_status").map_err(backend)?;
        let trial_ends_at: Option<DateTime<Utc>> =
            row.try_get("trial_ends_at").map_err(backend)?;
        let free_credits: i32 = row.try_get("free_credits").map_err(backend)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(backend)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(backend)?;
        let version: i64 = row.try_get("version").map_err(backend)?;

        let record = AccountRecord {
            user_id: UserId::new(user_id)
                .map_err(|e| StoreError::Backend(format!("corrupt user_id column: {e}")))?,
            email: row.try_get("email").map_err(backend)?,
            billing_customer_ref: row.try_get("billing_customer_ref").map_err(backend)?,
            billing_subscription_ref: row.try_get("billing_subscription_ref").map_err(backend)?,
            subscription_status: SubscriptionStatus::parse(&status).ok_or_else(|| {
                StoreError::Backend(format!("corrupt subscription_status column: {status}"))
            })?,
            trial_ends_at: trial_ends_at.map(Timestamp::from_datetime),
            free_credits: free_credits.max(0) as u32,
            created_at: Timestamp::from_datetime(created_at),
            updated_at: Timestamp::from_datetime(updated_at),
        };

        Ok(VersionedRecord {
            record,
            version: version as u64,
        })
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

const SELECT_COLUMNS: &str = "user_id, email, billing_customer_ref, billing_subscription_ref, \
     subscription_status, trial_ends_at, free_credits, created_at, updated_at, version";

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn insert(&self, record: AccountRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO accounts (user_id, email, billing_customer_ref, \
             billing_subscription_ref, subscription_status, trial_ends_at, free_credits, \
             created_at, updated_at, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(record.user_id.as_str())
        .bind(&record.email)
        .bind(&record.billing_customer_ref)
        .bind(&record.billing_subscription_ref)
        .bind(record.subscription_status.as_str())
        .bind(record.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(record.free_credits as i32)
        .bind(*record.created_at.as_datetime())
        .bind(*record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(record.user_id));
        }
        Ok(())
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<VersionedRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE user_id = $1"
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_by_customer_ref(
        &self,
        customer_ref: &str,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE billing_customer_ref = $1"
        ))
        .bind(customer_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn commit(
        &self,
        record: &AccountRecord,
        expected_version: u64,
    ) -> Result<CommitOutcome, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET email = $3, billing_customer_ref = $4, \
             billing_subscription_ref = $5, subscription_status = $6, trial_ends_at = $7, \
             free_credits = $8, updated_at = $9, version = version + 1 \
             WHERE user_id = $1 AND version = $2",
        )
        .bind(record.user_id.as_str())
        .bind(expected_version as i64)
        .bind(&record.email)
        .bind(&record.billing_customer_ref)
        .bind(&record.billing_subscription_ref)
        .bind(record.subscription_status.as_str())
        .bind(record.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(record.free_credits as i32)
        .bind(*record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Ok(CommitOutcome::Conflict);
        }
        Ok(CommitOutcome::Committed(expected_version + 1))
    }
}
