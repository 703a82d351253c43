use axum::http::{HeaderMap, header::AUTHORIZATION};

/// Read the raw credential from the `Authorization` header.
///
/// The scheme is not enforced; `Bearer xyz` is returned as-is. Missing, blank
/// or non-visible-ASCII values all read as "no credential".
#[must_use]
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
