use crate::api::{self, handlers::csrf::{CsrfSettings, SameSite}};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub csrf_secret_key: Option<SecretString>,
    pub csrf_cookie_secure: bool,
    pub csrf_cookie_samesite: SameSite,
    pub csrf_header_name: String,
    pub csrf_cookie_name: String,
}

impl Args {
    /// Immutable CSRF settings for the lifetime of the server.
    #[must_use]
    pub fn csrf_settings(&self) -> CsrfSettings {
        let secret = self
            .csrf_secret_key
            .as_ref()
            .map(|secret| secret.expose_secret().to_string());

        CsrfSettings::with_secret(secret)
            .with_cookie_secure(self.csrf_cookie_secure)
            .with_cookie_samesite(self.csrf_cookie_samesite)
            .with_header_name(self.csrf_header_name.clone())
            .with_cookie_name(self.csrf_cookie_name.clone())
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let csrf_settings = args.csrf_settings();

    debug!(
        port = args.port,
        csrf_cookie_secure = csrf_settings.cookie_secure(),
        csrf_cookie_samesite = %csrf_settings.cookie_samesite(),
        csrf_header_name = csrf_settings.header_name(),
        csrf_cookie_name = csrf_settings.cookie_name(),
        "Starting server"
    );

    api::new(args.port, args.dsn, csrf_settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::csrf::INSECURE_DEFAULT_SECRET;

    fn args(secret: Option<&str>) -> Args {
        Args {
            port: 8080,
            dsn: "postgres://localhost/gatekeeper".to_string(),
            csrf_secret_key: secret.map(|s| SecretString::from(s.to_string())),
            csrf_cookie_secure: true,
            csrf_cookie_samesite: SameSite::Strict,
            csrf_header_name: "X-CSRF-Token".to_string(),
            csrf_cookie_name: "gatekeeper-csrf-token".to_string(),
        }
    }

    #[test]
    fn csrf_settings_from_args() {
        let settings = args(Some("from-cli")).csrf_settings();
        assert_eq!(settings.secret_key().expose_secret(), "from-cli");
        assert!(settings.cookie_secure());
        assert_eq!(settings.cookie_samesite(), SameSite::Strict);
    }

    #[test]
    fn csrf_settings_fall_back_to_insecure_default() {
        let settings = args(None).csrf_settings();
        assert_eq!(settings.secret_key().expose_secret(), INSECURE_DEFAULT_SECRET);
    }

    #[test]
    fn debug_output_redacts_secret() {
        assert!(!format!("{:?}", args(Some("from-cli"))).contains("from-cli"));
    }
}
