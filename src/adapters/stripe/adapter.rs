//! Stripe implementation of the billing provider port.
//!
//! Thin HTTP adapter over the two RPCs the checkout flow needs. All
//! requests carry a client-level timeout; timeouts and connection
//! failures surface as `BillingError::Unavailable` so the caller maps
//! them to `UpstreamUnavailable` without touching local state.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::ports::{
    BillingCustomer, BillingError, BillingProvider, CheckoutSession, CreateCheckoutRequest,
    CreateCustomerRequest,
};

use super::api_types::{StripeCheckoutSession, StripeCustomer};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,

    /// Request timeout applied to every call.
    timeout: Duration,
}

impl StripeConfig {
    /// Creates a configuration with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Billing provider backed by the Stripe API.
pub struct StripeBillingAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeBillingAdapter {
    pub fn new(config: StripeConfig) -> Result<Self, BillingError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BillingError::Unavailable(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn map_send_error(err: reqwest::Error) -> BillingError {
        BillingError::Unavailable(err.to_string())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BillingError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%status, error = %body, "Stripe API call failed");
        Err(BillingError::Rejected(format!("{status}: {body}")))
    }
}

#[async_trait]
impl BillingProvider for StripeBillingAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<BillingCustomer, BillingError> {
        let url = format!("{}/v1/customers", self.config.api_base_url);
        let params = [
            ("email", request.email.clone()),
            ("metadata[user_id]", request.user_id.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let customer: StripeCustomer = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BillingError::Rejected(format!("unparseable customer response: {e}")))?;

        Ok(BillingCustomer {
            id: customer.id,
            email: customer.email.unwrap_or(request.email),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = [
            ("customer", request.customer_ref),
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", request.price_id),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", uuid::Uuid::new_v4().to_string())
            .form(&params)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let session: StripeCheckoutSession = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BillingError::Rejected(format!("unparseable session response: {e}")))?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_overrides_endpoint_and_timeout() {
        let config = StripeConfig::new("sk_test_key")
            .with_base_url("http://localhost:12111")
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.api_base_url, "http://localhost:12111");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_unavailable() {
        // Nothing listens on this port; the connect fails fast.
        let config = StripeConfig::new("sk_test_key")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_millis(200));
        let adapter = StripeBillingAdapter::new(config).unwrap();

        let result = adapter
            .create_customer(CreateCustomerRequest {
                user_id: crate::domain::foundation::UserId::new("user-1").unwrap(),
                email: "user@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(BillingError::Unavailable(_))));
    }
}
