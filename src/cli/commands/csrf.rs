use crate::api::handlers::csrf::{
    CSRF_SECRET_KEY_ENV, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME, SameSite,
};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_CSRF_SECRET_KEY: &str = "csrf-secret-key";
pub const ARG_CSRF_COOKIE_SECURE: &str = "csrf-cookie-secure";
pub const ARG_CSRF_COOKIE_SAMESITE: &str = "csrf-cookie-samesite";
pub const ARG_CSRF_HEADER_NAME: &str = "csrf-header-name";
pub const ARG_CSRF_COOKIE_NAME: &str = "csrf-cookie-name";

#[derive(Debug)]
pub struct Options {
    pub secret_key: Option<SecretString>,
    pub cookie_secure: bool,
    pub cookie_samesite: SameSite,
    pub header_name: String,
    pub cookie_name: String,
}

impl Options {
    /// Parse CSRF arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a header or cookie name is blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_name = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            secret_key: matches
                .get_one::<String>(ARG_CSRF_SECRET_KEY)
                .filter(|v| !v.is_empty())
                .map(|v| SecretString::from(v.clone())),
            cookie_secure: matches
                .get_one::<bool>(ARG_CSRF_COOKIE_SECURE)
                .copied()
                .unwrap_or(false),
            cookie_samesite: matches
                .get_one::<SameSite>(ARG_CSRF_COOKIE_SAMESITE)
                .copied()
                .unwrap_or_default(),
            header_name: read_name(ARG_CSRF_HEADER_NAME)?,
            cookie_name: read_name(ARG_CSRF_COOKIE_NAME)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_CSRF_SECRET_KEY)
                .long(ARG_CSRF_SECRET_KEY)
                .help("Secret used to sign CSRF tokens (insecure default when unset)")
                .env(CSRF_SECRET_KEY_ENV)
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_CSRF_COOKIE_SECURE)
                .long(ARG_CSRF_COOKIE_SECURE)
                .help("Mark the CSRF cookie as Secure")
                .env("GATEKEEPER_CSRF_COOKIE_SECURE")
                .default_value("false")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new(ARG_CSRF_COOKIE_SAMESITE)
                .long(ARG_CSRF_COOKIE_SAMESITE)
                .help("SameSite attribute of the CSRF cookie: strict, lax or none")
                .env("GATEKEEPER_CSRF_COOKIE_SAMESITE")
                .default_value("lax")
                .value_parser(|value: &str| value.parse::<SameSite>()),
        )
        .arg(
            Arg::new(ARG_CSRF_HEADER_NAME)
                .long(ARG_CSRF_HEADER_NAME)
                .help("Request header carrying the CSRF token")
                .env("GATEKEEPER_CSRF_HEADER_NAME")
                .default_value(DEFAULT_HEADER_NAME),
        )
        .arg(
            Arg::new(ARG_CSRF_COOKIE_NAME)
                .long(ARG_CSRF_COOKIE_NAME)
                .help("Cookie carrying the signed CSRF token")
                .env("GATEKEEPER_CSRF_COOKIE_NAME")
                .default_value(DEFAULT_COOKIE_NAME),
        )
}
