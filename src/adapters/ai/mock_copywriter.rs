//! Mock copy generator for tests and local development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::ports::{CopyDraft, CopyError, CopyGenerator, CopyRequest};

/// Deterministic in-process copy generator.
pub struct MockCopywriter {
    calls: AtomicU32,
    fail: bool,
}

impl MockCopywriter {
    pub fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail: false,
        }
    }

    /// Generator where every call fails.
    pub fn failing() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail: true,
        }
    }

    /// Number of generation attempts made.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCopywriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CopyGenerator for MockCopywriter {
    async fn generate(&self, request: CopyRequest) -> Result<CopyDraft, CopyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CopyError::Unavailable("simulated outage".to_string()));
        }
        Ok(CopyDraft {
            headline: format!("{} for {}", request.topic, request.audience),
            body: format!("{}. Now on {}.", request.benefit, request.placement),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> CopyRequest {
        CopyRequest {
            topic: "Spring sale".to_string(),
            audience: "runners".to_string(),
            benefit: "Lighter shoes".to_string(),
            placement: "social".to_string(),
        }
    }

    #[tokio::test]
    async fn produces_draft_from_brief_and_counts_calls() {
        let copywriter = MockCopywriter::new();
        let draft = copywriter.generate(brief()).await.unwrap();

        assert!(draft.headline.contains("Spring sale"));
        assert_eq!(copywriter.calls(), 1);
    }

    #[tokio::test]
    async fn failing_copywriter_reports_unavailable() {
        let copywriter = MockCopywriter::failing();
        assert!(copywriter.generate(brief()).await.is_err());
        assert_eq!(copywriter.calls(), 1);
    }
}
