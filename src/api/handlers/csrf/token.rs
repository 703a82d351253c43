//! Signed double-submit CSRF tokens.
//!
//! The client receives the raw token in the response body and a signed copy in a
//! cookie. State-changing requests echo the raw token in the CSRF header; the
//! cookie signature proves the server issued it.

use anyhow::{Context, Result, anyhow};
use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use secrecy::ExposeSecret;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{error::CsrfValidationError, settings::CsrfSettings};

type HmacSha256 = Hmac<Sha256>;

/// A freshly issued token pair.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Returned to the client and echoed back in the CSRF header.
    pub token: String,
    /// Stored in the CSRF cookie as `<token>.<signature>`.
    pub signed: String,
}

fn mac_for(settings: &CsrfSettings) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(settings.secret_key().expose_secret().as_bytes())
        .map_err(|err| anyhow!("invalid CSRF secret: {err}"))
}

/// Create a new random token and its signed cookie form.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn issue_token(settings: &CsrfSettings) -> Result<IssuedToken> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate CSRF token")?;
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let signed = sign(settings, &token)?;
    Ok(IssuedToken { token, signed })
}

fn sign(settings: &CsrfSettings, token: &str) -> Result<String> {
    let mut mac = mac_for(settings)?;
    mac.update(token.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{token}.{signature}"))
}

/// Recover the raw token from its signed form, checking the signature.
fn unsign<'a>(settings: &CsrfSettings, signed: &'a str) -> Option<&'a str> {
    let (token, signature) = signed.rsplit_once('.')?;
    if token.is_empty() {
        return None;
    }
    let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
    let mut mac = mac_for(settings).ok()?;
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(token)
}

/// Build the `Set-Cookie` value carrying the signed token.
///
/// # Errors
/// Returns an error if the cookie contains bytes not allowed in a header.
pub fn csrf_cookie(settings: &CsrfSettings, signed: &str) -> Result<HeaderValue> {
    let mut cookie = format!(
        "{}={signed}; Path=/; HttpOnly; SameSite={}",
        settings.cookie_name(),
        settings.cookie_samesite().cookie_attribute()
    );
    if settings.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build CSRF cookie header")
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
}

/// Check the CSRF header against the signed cookie.
///
/// # Errors
/// Returns the first failing check: header, cookie, signature, then equality.
pub fn validate_request(
    settings: &CsrfSettings,
    headers: &HeaderMap,
) -> Result<(), CsrfValidationError> {
    let header_token = headers
        .get(settings.header_name())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CsrfValidationError::MissingHeader(settings.header_name().to_string()))?;

    let signed = extract_cookie(headers, settings.cookie_name())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CsrfValidationError::MissingCookie(settings.cookie_name().to_string()))?;

    let cookie_token = unsign(settings, &signed).ok_or(CsrfValidationError::InvalidToken)?;

    if bool::from(header_token.as_bytes().ct_eq(cookie_token.as_bytes())) {
        Ok(())
    } else {
        Err(CsrfValidationError::TokenMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::csrf::settings::SameSite;

    fn settings() -> CsrfSettings {
        CsrfSettings::with_secret(Some("test-secret".to_string()))
    }

    fn request_headers(header: Option<&str>, cookie: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(header) = header {
            headers.insert("x-csrf-token", HeaderValue::from_str(header)?);
        }
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        Ok(headers)
    }

    #[test]
    fn issued_token_validates() -> Result<()> {
        let settings = settings();
        let issued = issue_token(&settings)?;
        assert_eq!(URL_SAFE_NO_PAD.decode(&issued.token)?.len(), 32);

        let headers = request_headers(
            Some(&issued.token),
            Some(&format!("theme=dark; gatekeeper-csrf-token={}", issued.signed)),
        )?;
        assert_eq!(validate_request(&settings, &headers), Ok(()));
        Ok(())
    }

    #[test]
    fn missing_header_is_reported_first() -> Result<()> {
        let headers = request_headers(None, None)?;
        assert_eq!(
            validate_request(&settings(), &headers),
            Err(CsrfValidationError::MissingHeader("X-CSRF-Token".to_string()))
        );
        Ok(())
    }

    #[test]
    fn missing_cookie_is_reported() -> Result<()> {
        let headers = request_headers(Some("token"), Some("other=value"))?;
        assert_eq!(
            validate_request(&settings(), &headers),
            Err(CsrfValidationError::MissingCookie(
                "gatekeeper-csrf-token".to_string()
            ))
        );
        Ok(())
    }

    #[test]
    fn forged_signature_is_invalid() -> Result<()> {
        let settings = settings();
        let issued = issue_token(&settings)?;
        let other = CsrfSettings::with_secret(Some("another-secret".to_string()));
        let forged = issue_token(&other)?;

        let headers = request_headers(
            Some(&issued.token),
            Some(&format!("gatekeeper-csrf-token={}", forged.signed)),
        )?;
        assert_eq!(
            validate_request(&settings, &headers),
            Err(CsrfValidationError::InvalidToken)
        );

        let headers = request_headers(Some(&issued.token), Some("gatekeeper-csrf-token=garbage"))?;
        assert_eq!(
            validate_request(&settings, &headers),
            Err(CsrfValidationError::InvalidToken)
        );
        Ok(())
    }

    #[test]
    fn header_must_match_cookie_token() -> Result<()> {
        let settings = settings();
        let first = issue_token(&settings)?;
        let second = issue_token(&settings)?;

        let headers = request_headers(
            Some(&second.token),
            Some(&format!("gatekeeper-csrf-token={}", first.signed)),
        )?;
        assert_eq!(
            validate_request(&settings, &headers),
            Err(CsrfValidationError::TokenMismatch)
        );
        Ok(())
    }

    #[test]
    fn cookie_attributes_follow_settings() -> Result<()> {
        let cookie = csrf_cookie(&settings(), "abc.def")?;
        assert_eq!(
            cookie.to_str()?,
            "gatekeeper-csrf-token=abc.def; Path=/; HttpOnly; SameSite=Lax"
        );

        let strict = settings()
            .with_cookie_secure(true)
            .with_cookie_samesite(SameSite::Strict);
        let cookie = csrf_cookie(&strict, "abc.def")?;
        assert_eq!(
            cookie.to_str()?,
            "gatekeeper-csrf-token=abc.def; Path=/; HttpOnly; SameSite=Strict; Secure"
        );
        Ok(())
    }
}
