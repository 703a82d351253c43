use axum::{
    Json,
    extract::{Extension, Request, State},
    http::{HeaderMap, Method, StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use super::{
    error::CsrfError,
    settings::CsrfSettings,
    token::{csrf_cookie, issue_token, validate_request},
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Reject state-changing requests without a valid CSRF header/cookie pair.
pub async fn csrf_protect(
    State(settings): State<Arc<CsrfSettings>>,
    request: Request,
    next: Next,
) -> Response {
    if is_safe(request.method()) {
        return next.run(request).await;
    }

    if let Err(err) = validate_request(&settings, request.headers()) {
        warn!(
            http.method = %request.method(),
            http.path = request.uri().path(),
            "CSRF validation failed: {err}"
        );
        return CsrfError::from(err).into_response();
    }

    next.run(request).await
}

#[utoipa::path(
    get,
    path = "/v1/csrf",
    responses(
        (status = 200, description = "CSRF token issued; the signed copy is set as a cookie.", body = CsrfTokenResponse),
        (status = 500, description = "Token could not be generated.")
    ),
    tag = "csrf"
)]
pub async fn csrf_token(settings: Extension<Arc<CsrfSettings>>) -> impl IntoResponse {
    let issued = match issue_token(&settings) {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to issue CSRF token: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let cookie = match csrf_cookie(&settings, &issued.signed) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build CSRF cookie: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    (
        StatusCode::OK,
        headers,
        Json(CsrfTokenResponse {
            csrf_token: issued.token,
        }),
    )
        .into_response()
}
