//! Command-line argument dispatch.
//!
//! Parses validated CLI arguments and maps them to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{database, ARG_DSN, ARG_PORT};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let database_opts = database::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn: SecretString::from(dsn),
        environment: database_opts.environment,
        max_connections: database_opts.max_connections,
    }))
}
