use crate::api::{self, database::DatabaseConfig, database::Environment};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub environment: Environment,
    pub max_connections: u32,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        environment = args.environment.as_str(),
        max_connections = args.max_connections,
        "Starting dealership server"
    );

    let database = DatabaseConfig::new(args.dsn, args.environment)
        .with_max_connections(args.max_connections);

    api::new(args.port, database).await
}
