//! Database configuration.

use serde::Deserialize;

use super::error::ValidationError;

fn default_max_connections() -> u32 {
    10
}

/// PostgreSQL connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (postgres://...).
    pub url: String,

    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_url_is_valid() {
        let config = DatabaseConfig {
            url: "postgres://localhost/copyforge".to_string(),
            max_connections: 10,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let config = DatabaseConfig {
            url: "mysql://localhost/copyforge".to_string(),
            max_connections: 10,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_url_is_rejected() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: 10,
        };
        assert!(config.validate().is_err());
    }
}
