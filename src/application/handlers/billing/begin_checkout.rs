//! BeginCheckoutHandler - starts the paid subscription flow.
//!
//! Ensures the account has a billing customer reference (creating one
//! lazily, guarded so an existing reference is never overwritten), then
//! asks the billing provider for a checkout session and returns its
//! redirect target. Upstream failure surfaces `UpstreamUnavailable`
//! with no local state touched beyond the customer reference itself.

use std::sync::Arc;

use crate::application::handlers::MAX_COMMIT_ATTEMPTS;
use crate::domain::account::AccountError;
use crate::domain::foundation::UserId;
use crate::ports::{
    AccountStore, BillingProvider, CommitOutcome, CreateCheckoutRequest, CreateCustomerRequest,
};

/// Checkout destination settings, fixed per deployment.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Provider price identifier for the subscription product.
    pub price_id: String,
    /// Redirect after successful checkout.
    pub success_url: String,
    /// Redirect after abandoned checkout.
    pub cancel_url: String,
}

/// Command to begin checkout for a user.
#[derive(Debug, Clone)]
pub struct BeginCheckoutCommand {
    pub user_id: UserId,
}

/// Result of checkout initiation.
#[derive(Debug, Clone)]
pub struct BeginCheckoutResult {
    /// Opaque redirect target for the payment page.
    pub redirect_url: String,
}

/// Handler for checkout initiation.
pub struct BeginCheckoutHandler {
    store: Arc<dyn AccountStore>,
    billing: Arc<dyn BillingProvider>,
    settings: CheckoutSettings,
}

impl BeginCheckoutHandler {
    pub fn new(
        store: Arc<dyn AccountStore>,
        billing: Arc<dyn BillingProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            store,
            billing,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: BeginCheckoutCommand,
    ) -> Result<BeginCheckoutResult, AccountError> {
        let customer_ref = self.ensure_customer_ref(&cmd.user_id).await?;

        let session = self
            .billing
            .create_checkout_session(CreateCheckoutRequest {
                customer_ref,
                price_id: self.settings.price_id.clone(),
                success_url: self.settings.success_url.clone(),
                cancel_url: self.settings.cancel_url.clone(),
            })
            .await
            .map_err(AccountError::upstream)?;

        Ok(BeginCheckoutResult {
            redirect_url: session.url,
        })
    }

    /// Returns the account's billing customer reference, creating and
    /// persisting one first if absent.
    ///
    /// The persist is a conditional write: losing the commit race means
    /// another request attached a reference concurrently, in which case
    /// the fresh read adopts the winner's value instead of overwriting.
    async fn ensure_customer_ref(&self, user_id: &UserId) -> Result<String, AccountError> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let snapshot = self
                .store
                .load(user_id)
                .await?
                .ok_or_else(|| AccountError::NotFound(user_id.clone()))?;
            let mut record = snapshot.record;

            if let Some(existing) = record.billing_customer_ref.clone() {
                return Ok(existing);
            }

            let customer = self
                .billing
                .create_customer(CreateCustomerRequest {
                    user_id: user_id.clone(),
                    email: record.email.clone(),
                })
                .await
                .map_err(AccountError::upstream)?;

            record.attach_customer_ref(customer.id.clone())?;
            match self.store.commit(&record, snapshot.version).await? {
                CommitOutcome::Committed(_) => {
                    tracing::info!(user_id = %user_id, customer_ref = %customer.id,
                        "billing customer attached");
                    return Ok(customer.id);
                }
                CommitOutcome::Conflict => continue,
            }
        }

        Err(AccountError::Contention)
    }
}
