//! Copy generator port - the gated feature.
//!
//! The entitlement layer treats generation as an opaque call: it is
//! invoked only after access is granted, and a credit is charged only
//! after the call succeeds, never before.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for the campaign copy generator.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Generates campaign copy for the given brief.
    async fn generate(&self, request: CopyRequest) -> Result<CopyDraft, CopyError>;
}

/// Brief describing the copy to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRequest {
    /// What the campaign is about.
    pub topic: String,
    /// Who the copy should speak to.
    pub audience: String,
    /// The key benefit to highlight.
    pub benefit: String,
    /// Where the copy will run (social, search, email, ...).
    pub placement: String,
}

/// Generated campaign copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyDraft {
    pub headline: String,
    pub body: String,
}

/// Errors from the copy generator.
#[derive(Debug, Clone, Error)]
pub enum CopyError {
    /// Provider unreachable or timed out.
    #[error("copy provider unavailable: {0}")]
    Unavailable(String),

    /// Provider answered with something unusable.
    #[error("copy provider returned an unusable response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn CopyGenerator) {}
    }
}
