//! HTTP DTOs for the copyforge API.
//!
//! JSON request/response shapes at the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::account::CheckAccessResult;
use crate::application::handlers::copywriting::GenerateCopyResult;
use crate::domain::account::{AccessDecision, DenialReason, SubscriptionStatus};

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccountRequest {
    pub user_id: String,
    pub email: String,
}

/// Response for a newly registered account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub user_id: String,
    pub status: SubscriptionStatus,
    pub free_credits: u32,
    /// End of the trial window (ISO 8601).
    pub trial_ends_at: Option<String>,
}

/// Response for an entitlement check.
#[derive(Debug, Clone, Serialize)]
pub struct EntitlementResponse {
    /// Whether the gated feature may be used right now.
    pub has_access: bool,
    /// Denial reason when access is refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    pub status: SubscriptionStatus,
    pub remaining_credits: u32,
    pub trial_ends_at: Option<String>,
}

impl From<CheckAccessResult> for EntitlementResponse {
    fn from(result: CheckAccessResult) -> Self {
        let (has_access, reason) = match result.decision {
            AccessDecision::Granted => (true, None),
            AccessDecision::Denied(reason) => (false, Some(reason)),
        };
        Self {
            has_access,
            reason,
            status: result.status,
            remaining_credits: result.remaining_credits,
            trial_ends_at: result
                .trial_ends_at
                .map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// Response for checkout initiation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    /// Redirect target for the payment page.
    pub checkout_url: String,
}

/// Request to generate campaign copy.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCopyRequest {
    pub topic: String,
    pub audience: String,
    pub benefit: String,
    pub placement: String,
}

/// Response carrying generated copy.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateCopyResponse {
    pub headline: String,
    pub body: String,
    pub remaining_credits: u32,
    pub metered: bool,
}

impl From<GenerateCopyResult> for GenerateCopyResponse {
    fn from(result: GenerateCopyResult) -> Self {
        Self {
            headline: result.draft.headline,
            body: result.draft.body,
            remaining_credits: result.remaining_credits,
            metered: result.metered,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
