//! Guard failures and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::api::handlers::error::{ErrorBody, Locale};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthErrorCode {
    /// No credential, or the credential failed verification.
    NotAuthenticated,
    /// The credential resolved to an identifier with no account behind it.
    UserNotFound,
}

impl AuthErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::UserNotFound => "USER_NOT_FOUND",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
        }
    }

    const fn message(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::NotAuthenticated, Locale::En) => "User is not logged in.",
            (Self::NotAuthenticated, Locale::Zh) => "用户未登录。",
            (Self::UserNotFound, Locale::En) => "User not found.",
            (Self::UserNotFound, Locale::Zh) => "用户不存在。",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable guard failure, created at the point of failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthError {
    #[serde(rename = "error_code")]
    code: AuthErrorCode,
    message: String,
}

impl AuthError {
    #[must_use]
    pub fn new(code: AuthErrorCode, locale: Locale) -> Self {
        Self {
            code,
            message: code.message(locale).to_string(),
        }
    }

    #[must_use]
    pub fn not_authenticated(locale: Locale) -> Self {
        Self::new(AuthErrorCode::NotAuthenticated, locale)
    }

    #[must_use]
    pub fn user_not_found(locale: Locale) -> Self {
        Self::new(AuthErrorCode::UserNotFound, locale)
    }

    #[must_use]
    pub const fn code(&self) -> AuthErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ErrorBody {
    fn from(err: AuthError) -> Self {
        Self::new(err.code.as_str(), err.message)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        ErrorBody::from(self).into_response_with(status)
    }
}
