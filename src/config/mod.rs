//! Application configuration module.
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `COPYFORGE`
//! prefix with `__` separating nested sections, e.g.
//! `COPYFORGE__SERVER__PORT=8080` and `COPYFORGE__BILLING__API_KEY=...`.

mod ai;
mod billing;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection).
    pub database: DatabaseConfig,

    /// Billing configuration (Stripe keys, price, redirect URLs).
    pub billing: BillingConfig,

    /// Copy generator configuration (OpenAI).
    pub ai: AiConfig,
}

impl AppConfig {
    /// Loads configuration from the environment, reading a `.env` file
    /// first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COPYFORGE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.billing.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}
