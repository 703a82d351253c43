//! CSRF cookie/header configuration.

use secrecy::{ExposeSecret, SecretString};
use std::{env, fmt, str::FromStr};
use tracing::warn;

pub const CSRF_SECRET_KEY_ENV: &str = "CSRF_SECRET_KEY";
pub const INSECURE_DEFAULT_SECRET: &str = "insecure-csrf-secret-do-not-use-in-production";
pub const DEFAULT_HEADER_NAME: &str = "X-CSRF-Token";
pub const DEFAULT_COOKIE_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "-csrf-token");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lax => "lax",
            Self::None => "none",
        }
    }

    /// Attribute value as written in `Set-Cookie`.
    #[must_use]
    pub const fn cookie_attribute(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!("invalid samesite value: {value}")),
        }
    }
}

/// Immutable once built; share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct CsrfSettings {
    secret_key: SecretString,
    cookie_secure: bool,
    cookie_samesite: SameSite,
    header_name: String,
    cookie_name: String,
}

impl CsrfSettings {
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            cookie_secure: false,
            cookie_samesite: SameSite::Lax,
            header_name: DEFAULT_HEADER_NAME.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    /// Build from `CSRF_SECRET_KEY`, falling back to [`INSECURE_DEFAULT_SECRET`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_secret(env::var(CSRF_SECRET_KEY_ENV).ok())
    }

    /// Build from an optional secret, falling back to [`INSECURE_DEFAULT_SECRET`].
    #[must_use]
    pub fn with_secret(secret: Option<String>) -> Self {
        let secret = secret.filter(|value| !value.is_empty()).unwrap_or_else(|| {
            warn!("{CSRF_SECRET_KEY_ENV} is not set, using the insecure default CSRF secret");
            INSECURE_DEFAULT_SECRET.to_string()
        });
        Self::new(SecretString::from(secret))
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_cookie_samesite(mut self, samesite: SameSite) -> Self {
        self.cookie_samesite = samesite;
        self
    }

    #[must_use]
    pub fn with_header_name(mut self, header_name: String) -> Self {
        self.header_name = header_name;
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, cookie_name: String) -> Self {
        self.cookie_name = cookie_name;
        self
    }

    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    #[must_use]
    pub fn uses_insecure_default(&self) -> bool {
        self.secret_key.expose_secret() == INSECURE_DEFAULT_SECRET
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn cookie_samesite(&self) -> SameSite {
        self.cookie_samesite
    }

    #[must_use]
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_secret_env() {
        temp_env::with_vars([(CSRF_SECRET_KEY_ENV, None::<&str>)], || {
            let settings = CsrfSettings::from_env();
            assert_eq!(settings.secret_key().expose_secret(), INSECURE_DEFAULT_SECRET);
            assert!(settings.uses_insecure_default());
            assert!(!settings.cookie_secure());
            assert_eq!(settings.cookie_samesite(), SameSite::Lax);
            assert_eq!(settings.cookie_samesite().to_string(), "lax");
            assert_eq!(settings.header_name(), "X-CSRF-Token");
            assert_eq!(settings.cookie_name(), "gatekeeper-csrf-token");
        });
    }

    #[test]
    fn secret_read_from_env() {
        temp_env::with_vars([(CSRF_SECRET_KEY_ENV, Some("s3cr3t"))], || {
            let settings = CsrfSettings::from_env();
            assert_eq!(settings.secret_key().expose_secret(), "s3cr3t");
            assert!(!settings.uses_insecure_default());
        });
    }

    #[test]
    fn empty_secret_falls_back_to_default() {
        let settings = CsrfSettings::with_secret(Some(String::new()));
        assert!(settings.uses_insecure_default());
    }

    #[test]
    fn builders_override_defaults() {
        let settings = CsrfSettings::with_secret(Some("key".to_string()))
            .with_cookie_secure(true)
            .with_cookie_samesite(SameSite::Strict)
            .with_header_name("X-Custom-Csrf".to_string())
            .with_cookie_name("custom-csrf".to_string());
        assert!(settings.cookie_secure());
        assert_eq!(settings.cookie_samesite(), SameSite::Strict);
        assert_eq!(settings.header_name(), "X-Custom-Csrf");
        assert_eq!(settings.cookie_name(), "custom-csrf");
    }

    #[test]
    fn debug_output_redacts_secret() {
        let settings = CsrfSettings::with_secret(Some("super-secret-value".to_string()));
        assert!(!format!("{settings:?}").contains("super-secret-value"));
    }

    #[test]
    fn samesite_parses_case_insensitively() {
        assert_eq!("Strict".parse::<SameSite>(), Ok(SameSite::Strict));
        assert_eq!("LAX".parse::<SameSite>(), Ok(SameSite::Lax));
        assert_eq!("none".parse::<SameSite>(), Ok(SameSite::None));
        assert!("sometimes".parse::<SameSite>().is_err());
        assert_eq!(SameSite::None.cookie_attribute(), "None");
    }
}
