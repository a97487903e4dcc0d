//! Mock billing provider for tests and local development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

use crate::ports::{
    BillingCustomer, BillingError, BillingProvider, CheckoutSession, CreateCheckoutRequest,
    CreateCustomerRequest,
};

/// Deterministic in-process billing provider.
///
/// Issues sequential customer/session references and counts calls so
/// tests can assert how often the upstream was hit.
pub struct MockBillingProvider {
    customers: AtomicU32,
    sessions: AtomicU32,
    fail_customers: bool,
    fail_sessions: bool,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self {
            customers: AtomicU32::new(0),
            sessions: AtomicU32::new(0),
            fail_customers: false,
            fail_sessions: false,
        }
    }

    /// Provider where every call fails as unreachable.
    pub fn failing() -> Self {
        Self {
            fail_customers: true,
            fail_sessions: true,
            ..Self::new()
        }
    }

    /// Provider where customer creation works but sessions fail.
    pub fn failing_sessions() -> Self {
        Self {
            fail_sessions: true,
            ..Self::new()
        }
    }

    pub fn customers_created(&self) -> u32 {
        self.customers.load(Ordering::SeqCst)
    }

    pub fn sessions_created(&self) -> u32 {
        self.sessions.load(Ordering::SeqCst)
    }
}

impl Default for MockBillingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<BillingCustomer, BillingError> {
        if self.fail_customers {
            return Err(BillingError::Unavailable("simulated outage".to_string()));
        }
        self.customers.fetch_add(1, Ordering::SeqCst);
        Ok(BillingCustomer {
            id: format!("cus_mock_{}", Uuid::new_v4().simple()),
            email: request.email,
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        if self.fail_sessions {
            return Err(BillingError::Unavailable("simulated outage".to_string()));
        }
        self.sessions.fetch_add(1, Ordering::SeqCst);
        let id = format!("cs_mock_{}", Uuid::new_v4().simple());
        Ok(CheckoutSession {
            url: format!("https://checkout.example.com/{}/{id}", request.customer_ref),
            id,
        })
    }
}
