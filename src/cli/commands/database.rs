use crate::api::database::Environment;
use clap::{Arg, ArgMatches, Command};

pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";

#[derive(Debug, Clone)]
pub struct Options {
    pub environment: Environment,
    pub max_connections: u32,
}

impl Options {
    /// Parse database arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the environment name is unknown.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let environment = matches
            .get_one::<String>(ARG_ENVIRONMENT)
            .map_or(Ok(Environment::Production), |name| name.parse())?;

        Ok(Self {
            environment,
            max_connections: matches
                .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
                .copied()
                .unwrap_or(5),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Runtime environment")
                .long_help(
                    "Runtime environment. `development` forces an encrypted database connection without certificate verification and logs every SQL statement.",
                )
                .env("DEALERSHIP_ENV")
                .default_value("production")
                .value_parser(["development", "production"]),
        )
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum number of pooled database connections")
                .env("DEALERSHIP_DB_MAX_CONNECTIONS")
                .default_value("5")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
}
