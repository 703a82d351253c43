//! CSRF validation failures and their translation to the uniform error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::api::handlers::error::ErrorBody;

pub const INVALID_CSRF: &str = "INVALID_CSRF";

/// Why a state-changing request failed CSRF validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CsrfValidationError {
    #[error("Bad headers. CSRF token is missing from header `{0}`.")]
    MissingHeader(String),
    #[error("Missing Cookie: `{0}`.")]
    MissingCookie(String),
    #[error("The CSRF token is invalid.")]
    InvalidToken,
    #[error("The CSRF tokens do not match.")]
    TokenMismatch,
}

/// `{ error_code: "INVALID_CSRF", message }`, built from a validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CsrfError {
    error_code: &'static str,
    message: String,
}

impl CsrfError {
    /// Translate any validation failure, keeping its message verbatim.
    #[must_use]
    pub fn translate<E: fmt::Display + ?Sized>(failure: &E) -> Self {
        Self {
            error_code: INVALID_CSRF,
            message: failure.to_string(),
        }
    }

    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.error_code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CsrfValidationError> for CsrfError {
    fn from(err: CsrfValidationError) -> Self {
        Self::translate(&err)
    }
}

impl From<CsrfError> for ErrorBody {
    fn from(err: CsrfError) -> Self {
        Self::new(err.error_code, err.message)
    }
}

impl IntoResponse for CsrfError {
    fn into_response(self) -> Response {
        ErrorBody::from(self).into_response_with(StatusCode::FORBIDDEN)
    }
}
