//! Uniform error body shared by auth and CSRF failures, plus message locale.

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::ACCEPT_LANGUAGE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape of every guard failure: `{ "error_code": ..., "message": ... }`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }

    /// Pair the body with a status code as an axum response.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Language used for user-facing error messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Pick the locale from `Accept-Language`.
    ///
    /// Only the first language range counts; quality weights are ignored.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map_or(Self::En, Self::from_accept_language)
    }

    fn from_accept_language(value: &str) -> Self {
        let primary = value
            .split(',')
            .next()
            .and_then(|range| range.split(';').next())
            .and_then(|tag| tag.trim().split(['-', '_']).next())
            .unwrap_or_default();

        if primary.eq_ignore_ascii_case("zh") {
            Self::Zh
        } else {
            Self::En
        }
    }
}
