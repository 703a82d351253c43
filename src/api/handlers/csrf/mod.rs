//! CSRF protection for state-changing endpoints.
//!
//! ## Secret (`CSRF_SECRET_KEY`)
//!
//! Tokens are signed with HMAC-SHA256 keyed by `CSRF_SECRET_KEY`. All instances
//! must share the secret or cookies issued by one instance are rejected by another.
//!
//! > **Warning:** when the variable is unset a fixed, public default is used.
//! > Never run production traffic with it.

mod error;
pub(crate) mod middleware;
mod settings;
mod token;

pub use error::{CsrfError, CsrfValidationError, INVALID_CSRF};
pub use middleware::{CsrfTokenResponse, csrf_protect};
pub use settings::{
    CSRF_SECRET_KEY_ENV, CsrfSettings, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME,
    INSECURE_DEFAULT_SECRET, SameSite,
};
pub use token::{IssuedToken, csrf_cookie, issue_token, validate_request};
