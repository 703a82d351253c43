//! Caller-facing identity endpoints.
//!
//! Flow Overview:
//! 1) Run the required or optional guard against the request headers.
//! 2) Answer guard failures with the uniform error body.
//! 3) Store faults become a bare 500.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use super::auth::{Account, AuthGuard, AuthOutcome};
use super::error::ErrorBody;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MeUpdateRequest {
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    pub account: Option<Account>,
}

#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Return the authenticated account.", body = Account),
        (status = 401, description = "Missing or invalid credential.", body = ErrorBody),
        (status = 404, description = "Credential resolved to an unknown account.", body = ErrorBody),
    ),
    tag = "me"
)]
pub async fn get_me(headers: HeaderMap, guard: Extension<Arc<AuthGuard>>) -> impl IntoResponse {
    match guard.authenticate(&headers).await {
        Ok(AuthOutcome::Authenticated(account)) => (StatusCode::OK, Json(account)).into_response(),
        Ok(AuthOutcome::Unauthenticated(err)) => err.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/v1/me",
    request_body = MeUpdateRequest,
    responses(
        (status = 200, description = "Display name updated.", body = Account),
        (status = 400, description = "Blank display name."),
        (status = 401, description = "Missing or invalid credential.", body = ErrorBody),
        (status = 403, description = "Missing or invalid CSRF token.", body = ErrorBody),
        (status = 404, description = "Credential resolved to an unknown account.", body = ErrorBody),
    ),
    tag = "me"
)]
pub async fn patch_me(
    headers: HeaderMap,
    guard: Extension<Arc<AuthGuard>>,
    Json(payload): Json<MeUpdateRequest>,
) -> impl IntoResponse {
    let account = match guard.authenticate(&headers).await {
        Ok(outcome) => match outcome.into_result() {
            Ok(account) => account,
            Err(err) => return err.into_response(),
        },
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    let display_name = payload.display_name.trim();
    if display_name.is_empty() {
        return (StatusCode::BAD_REQUEST, "Display name must not be blank.").into_response();
    }

    match guard.store().update_display_name(account.id, display_name).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        // Deleted between the guard lookup and the update.
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to update display name for {}: {err}", account.id);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/whoami",
    responses(
        (status = 200, description = "Authenticated account, or anonymous caller.", body = WhoAmIResponse),
    ),
    tag = "me"
)]
pub async fn whoami(headers: HeaderMap, guard: Extension<Arc<AuthGuard>>) -> impl IntoResponse {
    match guard.authenticate_optional(&headers).await {
        Ok(account) => {
            let response = WhoAmIResponse {
                authenticated: account.is_some(),
                account,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
