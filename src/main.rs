//! Copyforge server binary.
//!
//! Wires the Postgres account store, the Stripe billing adapter, and
//! the OpenAI copywriter into the axum API.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use copyforge::adapters::ai::{OpenAiConfig, OpenAiCopywriter};
use copyforge::adapters::http::{api_router, AppState};
use copyforge::adapters::postgres::PostgresAccountStore;
use copyforge::adapters::stripe::{StripeBillingAdapter, StripeConfig};
use copyforge::application::handlers::billing::CheckoutSettings;
use copyforge::config::AppConfig;
use copyforge::domain::billing::BillingWebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    if config.billing.is_test_mode() {
        tracing::warn!("billing provider is in test mode");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let billing_adapter =
        StripeBillingAdapter::new(StripeConfig::new(config.billing.api_key.clone()))?;
    let copywriter = OpenAiCopywriter::new(
        OpenAiConfig::new(config.ai.api_key.clone()).with_model(config.ai.model.clone()),
    )?;

    let state = AppState {
        store: Arc::new(PostgresAccountStore::new(pool)),
        billing: Arc::new(billing_adapter),
        copywriter: Arc::new(copywriter),
        webhook_verifier: Arc::new(BillingWebhookVerifier::new(
            config.billing.webhook_secret.clone(),
        )),
        checkout_settings: CheckoutSettings {
            price_id: config.billing.price_id.clone(),
            success_url: config.billing.success_url.clone(),
            cancel_url: config.billing.cancel_url.clone(),
        },
    };

    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "copyforge listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
