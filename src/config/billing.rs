//! Billing configuration (Stripe).

use serde::Deserialize;

use super::error::ValidationError;

/// Billing provider configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingConfig {
    /// Stripe API key.
    pub api_key: String,

    /// Webhook signing secret shared with the provider.
    pub webhook_secret: String,

    /// Price identifier for the subscription product.
    pub price_id: String,

    /// Redirect after successful checkout.
    pub success_url: String,

    /// Redirect after abandoned checkout.
    pub cancel_url: String,
}

impl BillingConfig {
    /// Check if using Stripe test mode.
    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with("sk_test_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("BILLING__API_KEY"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("BILLING__WEBHOOK_SECRET"));
        }
        if self.price_id.is_empty() {
            return Err(ValidationError::MissingRequired("BILLING__PRICE_ID"));
        }

        // Verify key prefixes for safety
        if !self.api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }

        if !is_http_url(&self.success_url) {
            return Err(ValidationError::InvalidRedirectUrl("success_url"));
        }
        if !is_http_url(&self.cancel_url) {
            return Err(ValidationError::InvalidRedirectUrl("cancel_url"));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
