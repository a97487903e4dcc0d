//! Axum router for the copyforge API.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    begin_checkout, check_entitlement, generate_copy, handle_billing_webhook, register_account,
    AppState,
};

/// Create the API router.
///
/// # Routes
///
/// ## User endpoints (identity forwarded by the gateway)
/// - `POST /api/accounts` - register with trial defaults
/// - `GET  /api/entitlement` - current access decision
/// - `POST /api/checkout` - begin the paid subscription flow
/// - `POST /api/copy` - generate campaign copy (gated)
///
/// ## Webhook endpoints (no user auth, signature verified)
/// - `POST /api/webhooks/billing` - billing-provider events
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/accounts", post(register_account))
        .route("/api/entitlement", get(check_entitlement))
        .route("/api/checkout", post(begin_checkout))
        .route("/api/copy", post(generate_copy))
        .route("/api/webhooks/billing", post(handle_billing_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::MockCopywriter;
    use crate::adapters::memory::InMemoryAccountStore;
    use crate::adapters::stripe::MockBillingProvider;
    use crate::application::handlers::billing::CheckoutSettings;
    use crate::domain::billing::BillingWebhookVerifier;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(InMemoryAccountStore::new()),
            billing: Arc::new(MockBillingProvider::new()),
            copywriter: Arc::new(MockCopywriter::new()),
            webhook_verifier: Arc::new(BillingWebhookVerifier::new("whsec_test")),
            checkout_settings: CheckoutSettings {
                price_id: "price_test".to_string(),
                success_url: "https://app.example.com/dashboard".to_string(),
                cancel_url: "https://app.example.com/pricing".to_string(),
            },
        }
    }

    #[test]
    fn api_router_builds_with_state() {
        let router = api_router();
        let _: Router<()> = router.with_state(test_state());
    }
}
