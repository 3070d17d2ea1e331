//! Connection pool setup.
//!
//! The pool is built once at startup and handed to handlers as an axum
//! `Extension`. TLS and statement logging depend on the runtime environment:
//! development databases are reached over TLS without certificate
//! verification and every statement is logged, production honors whatever
//! `sslmode` the DSN carries and keeps statements out of the logs.

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    ConnectOptions, PgPool,
};
use std::{fmt, str::FromStr, time::Duration};
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(anyhow!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct DatabaseConfig {
    dsn: SecretString,
    environment: Environment,
    max_connections: u32,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(dsn: SecretString, environment: Environment) -> Self {
        Self {
            dsn,
            environment,
            max_connections: 5,
        }
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Build connect options for the configured environment.
    ///
    /// # Errors
    /// Returns an error if the DSN cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let options = PgConnectOptions::from_str(self.dsn.expose_secret())
            .context("Invalid database connection string")?;

        Ok(match self.environment {
            Environment::Development => options.ssl_mode(PgSslMode::Require),
            Environment::Production => options.disable_statement_logging(),
        })
    }

    /// Connect the pool. Connections are opened lazily, so a database outage
    /// surfaces per request rather than at startup.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid.
    pub fn connect(&self) -> Result<PgPool> {
        let options = self.connect_options()?;

        info!(
            database = %redacted_dsn(self.dsn.expose_secret()),
            environment = %self.environment,
            "Configuring database pool"
        );

        Ok(PgPoolOptions::new()
            .max_connections(self.max_connections)
            .max_lifetime(Duration::from_secs(60 * 2))
            .acquire_timeout(Duration::from_secs(5))
            .test_before_acquire(true)
            .connect_lazy_with(options))
    }
}

/// Strip credentials from a DSN so it can be logged.
fn redacted_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            let _ = url.set_password(None);
            let _ = url.set_username("");
            url.to_string()
        }
        Err(_) => "<unparseable dsn>".to_string(),
    }
}
