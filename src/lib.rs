//! # Gatekeeper (request-time identity resolution)
//!
//! `gatekeeper` decides, for every incoming request, who the caller is. It reads
//! the raw `Authorization` header, resolves it to an account identifier, loads the
//! account from Postgres, and answers failures with a uniform, bilingual error body:
//!
//! ```json
//! { "error_code": "NOT_AUTHENTICATED", "message": "User is not logged in." }
//! ```
//!
//! ## Guards
//!
//! - **Required:** [`api::handlers::auth::AuthGuard::authenticate`] fails fast with
//!   `NOT_AUTHENTICATED` (401) or `USER_NOT_FOUND` (404).
//! - **Optional:** [`api::handlers::auth::AuthGuard::authenticate_optional`] degrades
//!   any guard failure to an anonymous caller. Store faults are never swallowed.
//!
//! ## CSRF
//!
//! State-changing requests carry a signed double-submit token (cookie + header).
//! Validation failures are answered with `403` and `error_code = INVALID_CSRF`.
//!
//! > **Warning:** identity resolution is a placeholder that maps every non-empty
//! > credential to one fixed account. Replace
//! > [`api::handlers::auth::PlaceholderResolver`] before exposing the service.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
