//! Billing provider port for external payment processing.
//!
//! Covers the two black-box RPCs the checkout flow needs: creating a
//! customer and creating a checkout session. Both return opaque
//! references; implementations must apply a request timeout and surface
//! failure without any local side effect.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;

/// Port for the external billing collaborator.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Creates a customer at the billing provider.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<BillingCustomer, BillingError>;

    /// Creates a checkout session scoped to an existing customer and a
    /// fixed price. Returns the redirect target.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, BillingError>;
}

/// Request to create a billing customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Internal user id, stored as provider metadata.
    pub user_id: UserId,
    /// Customer email address.
    pub email: String,
}

/// A customer at the billing provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingCustomer {
    /// Opaque customer reference.
    pub id: String,
    /// Email the customer was created with.
    pub email: String,
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Existing billing customer reference.
    pub customer_ref: String,
    /// Provider price identifier for the subscription product.
    pub price_id: String,
    /// Redirect after successful checkout.
    pub success_url: String,
    /// Redirect after abandoned checkout.
    pub cancel_url: String,
}

/// A checkout session at the billing provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Opaque session reference.
    pub id: String,
    /// Redirect target for the user to complete payment.
    pub url: String,
}

/// Errors from billing provider calls.
#[derive(Debug, Clone, Error)]
pub enum BillingError {
    /// Network failure or timeout reaching the provider.
    #[error("billing provider unreachable: {0}")]
    Unavailable(String),

    /// The provider answered with an error response.
    #[error("billing provider rejected the request: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn BillingProvider) {}
    }

    #[test]
    fn errors_display_their_cause() {
        let err = BillingError::Unavailable("connect timeout".to_string());
        assert!(err.to_string().contains("connect timeout"));
    }
}
