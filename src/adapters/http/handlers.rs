//! HTTP handlers for the copyforge API.
//!
//! These handlers connect axum routes to application layer command and
//! query handlers.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{Json, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::account::{
    CheckAccessHandler, CheckAccessQuery, RegisterAccountCommand, RegisterAccountHandler,
};
use crate::application::handlers::billing::{
    BeginCheckoutCommand, BeginCheckoutHandler, CheckoutSettings, ReconcileBillingEventHandler,
};
use crate::application::handlers::copywriting::{GenerateCopyCommand, GenerateCopyHandler};
use crate::domain::account::AccountError;
use crate::domain::billing::BillingWebhookVerifier;
use crate::domain::foundation::UserId;
use crate::ports::{AccountStore, BillingProvider, CopyGenerator, CopyRequest};

use super::dto::{
    AccountResponse, CheckoutResponse, EntitlementResponse, ErrorResponse, GenerateCopyRequest,
    GenerateCopyResponse, RegisterAccountRequest,
};

/// Shared application state.
///
/// Cloned per request; dependencies are Arc-wrapped and handlers are
/// built on demand from them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub billing: Arc<dyn BillingProvider>,
    pub copywriter: Arc<dyn CopyGenerator>,
    pub webhook_verifier: Arc<BillingWebhookVerifier>,
    pub checkout_settings: CheckoutSettings,
}

impl AppState {
    fn register_handler(&self) -> RegisterAccountHandler {
        RegisterAccountHandler::new(self.store.clone())
    }

    fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(self.store.clone())
    }

    fn checkout_handler(&self) -> BeginCheckoutHandler {
        BeginCheckoutHandler::new(
            self.store.clone(),
            self.billing.clone(),
            self.checkout_settings.clone(),
        )
    }

    fn generate_copy_handler(&self) -> GenerateCopyHandler {
        GenerateCopyHandler::new(self.store.clone(), self.copywriter.clone())
    }

    fn reconcile_handler(&self) -> ReconcileBillingEventHandler {
        ReconcileBillingEventHandler::new(self.store.clone())
    }
}

/// Authenticated user context extracted from the request.
///
/// Identity verification itself lives outside this crate; the gateway
/// in front of the API forwards the verified id in an `X-User-Id`
/// header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection for missing/invalid user identity.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// POST /api/accounts - register a new account with trial defaults
pub async fn register_account(
    State(state): State<AppState>,
    Json(request): Json<RegisterAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(request.user_id).map_err(|e| ApiError::validation(e.to_string()))?;

    let result = state
        .register_handler()
        .handle(RegisterAccountCommand {
            user_id,
            email: request.email,
        })
        .await?;

    let record = result.record;
    let response = AccountResponse {
        user_id: record.user_id.to_string(),
        status: record.subscription_status,
        free_credits: record.free_credits,
        trial_ends_at: record.trial_ends_at.map(|t| t.as_datetime().to_rfc3339()),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/entitlement - current access decision for the caller
pub async fn check_entitlement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .check_access_handler()
        .handle(CheckAccessQuery {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(EntitlementResponse::from(result)))
}

/// POST /api/checkout - begin the paid subscription flow
pub async fn begin_checkout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .checkout_handler()
        .handle(BeginCheckoutCommand {
            user_id: user.user_id,
        })
        .await?;

    let response = CheckoutResponse {
        checkout_url: result.redirect_url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/copy - generate campaign copy (gated)
pub async fn generate_copy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<GenerateCopyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .generate_copy_handler()
        .handle(GenerateCopyCommand {
            user_id: user.user_id,
            request: CopyRequest {
                topic: request.topic,
                audience: request.audience,
                benefit: request.benefit,
                placement: request.placement,
            },
        })
        .await?;

    Ok(Json(GenerateCopyResponse::from(result)))
}

/// POST /api/webhooks/billing - signed billing events
///
/// Signature or parse failures reject the delivery; business no-ops
/// (unknown customer, stale cancel, duplicate activation) acknowledge
/// with 200 so the provider does not redeliver.
pub async fn handle_billing_webhook(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> axum::response::Response {
    let Some(signature) = headers
        .get("Billing-Signature")
        .and_then(|v| v.to_str().ok())
    else {
        let error = ErrorResponse::new("MISSING_SIGNATURE", "Missing Billing-Signature header");
        return (StatusCode::BAD_REQUEST, Json(error)).into_response();
    };

    let event = match state.webhook_verifier.verify_and_parse(&body, signature) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "rejected billing webhook");
            let error = ErrorResponse::new("WEBHOOK_REJECTED", err.to_string());
            return (err.status_code(), Json(error)).into_response();
        }
    };

    match state.reconcile_handler().handle(&event).await {
        Ok(outcome) => {
            tracing::debug!(event_id = %event.id, ?outcome, "billing event reconciled");
            StatusCode::OK.into_response()
        }
        Err(err) => {
            // Transient local failure: answer 500 so the provider redelivers.
            tracing::error!(event_id = %event.id, error = %err, "billing event reconciliation failed");
            let error = ErrorResponse::new("RECONCILIATION_FAILED", err.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}

/// API error type that converts domain errors to HTTP responses.
pub enum ApiError {
    Domain(AccountError),
    Validation(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        ApiError::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            ApiError::Validation(message) => {
                let body = ErrorResponse::new("VALIDATION_FAILED", message);
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Domain(err) => err,
        };

        let (status, code) = match &err {
            AccountError::AccessDenied(_) => (StatusCode::PAYMENT_REQUIRED, "ACCESS_DENIED"),
            AccountError::NoCreditsRemaining => {
                (StatusCode::PAYMENT_REQUIRED, "NO_CREDITS_REMAINING")
            }
            AccountError::Contention => (StatusCode::CONFLICT, "CONTENTION"),
            AccountError::UpstreamUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "BILLING_UNAVAILABLE")
            }
            AccountError::NotFound(_) => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),
            AccountError::AlreadyRegistered(_) => (StatusCode::CONFLICT, "ACCOUNT_EXISTS"),
            AccountError::CustomerRefConflict => (StatusCode::CONFLICT, "CUSTOMER_REF_CONFLICT"),
            AccountError::GenerationFailed(_) => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"),
            AccountError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if !err.is_expected_outcome() {
            tracing::error!(error = %err, "request failed");
        }

        let body = ErrorResponse::new(code, err.to_string());
        (status, Json(body)).into_response()
    }
}
