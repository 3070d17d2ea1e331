//! Database fixtures for handler tests.
//!
//! Each [`TestDb`] owns its own Postgres container with `sql/schema.sql`
//! applied. When no container runtime is reachable `TestDb::new` fails and the
//! calling test returns early.

pub mod postgres;
pub mod runtime;

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool, Row};
use ulid::Ulid;

use self::postgres::PostgresContainer;
use crate::api::handlers::session::hash_session_token;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

pub(crate) fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new().to_string().to_lowercase())
}

pub struct TestDb {
    _postgres: PostgresContainer,
    pub pool: PgPool,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        if let Err(err) = runtime::ensure_container_runtime() {
            eprintln!("Skipping integration test: {err}");
            return Err(err);
        }

        let postgres = PostgresContainer::start().await?;
        postgres.wait_until_ready().await?;
        apply_schema(&postgres.dsn()).await?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&postgres.dsn())
            .await
            .context("failed to connect test pool")?;

        Ok(Self {
            _postgres: postgres,
            pool,
        })
    }
}

async fn apply_schema(dsn: &str) -> Result<()> {
    let mut connection = PgConnection::connect(dsn)
        .await
        .context("failed to connect for schema setup")?;

    for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
        sqlx::query(statement)
            .execute(&mut connection)
            .await
            .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
    }

    Ok(())
}

/// Split on lines ending with `;`. Comment-only lines are dropped.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

/// Insert an account with the given `account_type` label.
pub async fn insert_account(
    pool: &PgPool,
    firstname: &str,
    lastname: &str,
    account_type: &str,
) -> Result<i32> {
    let query = r"
        INSERT INTO account (account_firstname, account_lastname, account_email, account_password, account_type)
        VALUES ($1, $2, $3, 'not-a-real-hash', $4::account_type)
        RETURNING account_id
    ";
    let row = sqlx::query(query)
        .bind(firstname)
        .bind(lastname)
        .bind(format!("{}@example.com", unique_name(&firstname.to_lowercase())))
        .bind(account_type)
        .fetch_one(pool)
        .await
        .context("insert account")?;
    Ok(row.try_get("account_id")?)
}

/// Random cookie token, as the account subsystem issues them.
pub fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Open a session for `account_id` and return the raw cookie token.
pub async fn insert_session(pool: &PgPool, account_id: i32) -> Result<String> {
    let token = generate_session_token()?;
    let query = r"
        INSERT INTO account_session (session_hash, account_id, expires_at)
        VALUES ($1, $2, NOW() + INTERVAL '1 hour')
    ";
    sqlx::query(query)
        .bind(hash_session_token(&token))
        .bind(account_id)
        .execute(pool)
        .await
        .context("insert session")?;
    Ok(token)
}

/// Insert a classification and one vehicle in it.
pub async fn insert_vehicle(pool: &PgPool, make: &str, model: &str) -> Result<i32> {
    let row = sqlx::query(
        "INSERT INTO classification (classification_name) VALUES ($1) RETURNING classification_id",
    )
    .bind(unique_name("class"))
    .fetch_one(pool)
    .await
    .context("insert classification")?;
    let classification_id: i32 = row.try_get("classification_id")?;

    let query = r"
        INSERT INTO inventory (
            inv_make, inv_model, inv_year, inv_description, inv_image, inv_thumbnail,
            inv_price, inv_miles, inv_color, classification_id
        )
        VALUES ($1, $2, '2019', 'Test vehicle', '/images/no-image.png', '/images/no-image-tn.png',
                25000, 42000, 'Blue', $3)
        RETURNING inv_id
    ";
    let row = sqlx::query(query)
        .bind(make)
        .bind(model)
        .bind(classification_id)
        .fetch_one(pool)
        .await
        .context("insert vehicle")?;
    Ok(row.try_get("inv_id")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sql_statements_keeps_multiline_statements() {
        let sql = "-- header\nCREATE TABLE a (\n  id INT\n);\nCREATE INDEX a_idx ON a (id);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE a"));
        assert!(statements[0].ends_with(");"));
        assert_eq!(statements[1], "CREATE INDEX a_idx ON a (id);");
    }

    #[test]
    fn schema_splits_into_statements() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert!(statements
            .iter()
            .any(|s| s.starts_with("CREATE TABLE IF NOT EXISTS review (")));
        assert!(statements.iter().all(|s| s.ends_with(';')));
    }

    #[test]
    fn session_tokens_are_unique_and_url_safe() {
        let first = generate_session_token().expect("token");
        let second = generate_session_token().expect("token");
        assert_ne!(first, second);
        assert_eq!(first.len(), 43);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn unique_names_differ() {
        assert_ne!(unique_name("db"), unique_name("db"));
    }
}
