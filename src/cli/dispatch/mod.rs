//! Map validated CLI arguments to an action.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_DSN, ARG_PORT, csrf};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let csrf_opts = csrf::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        csrf_secret_key: csrf_opts.secret_key,
        csrf_cookie_secure: csrf_opts.cookie_secure,
        csrf_cookie_samesite: csrf_opts.cookie_samesite,
        csrf_header_name: csrf_opts.header_name,
        csrf_cookie_name: csrf_opts.cookie_name,
    }))
}
