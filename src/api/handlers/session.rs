//! Current-account resolution from the session cookie.
//!
//! Sessions are issued by the account subsystem. This module only reads them:
//! the cookie carries a random token, the database stores its SHA-256 hash.

use axum::{http::HeaderMap, response::Response};
use sha2::{Digest, Sha256};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{error, info_span, warn, Instrument};

use super::flash::{self, Notice};

pub const SESSION_COOKIE_NAME: &str = "dealership_session";
pub const LOGIN_PATH: &str = "/account/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Client,
    Employee,
    Admin,
}

impl AccountRole {
    /// Map the `account_type` enum label stored in the database.
    #[must_use]
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "Client" => Some(Self::Client),
            "Employee" => Some(Self::Employee),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Account attached to the current request.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: i32,
    pub firstname: String,
    pub lastname: String,
    pub role: AccountRole,
}

impl Account {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let account_type: String = row.try_get("account_type")?;
        let role = AccountRole::from_db(&account_type).unwrap_or_else(|| {
            warn!("Unknown account_type '{account_type}', treating as Client");
            AccountRole::Client
        });
        Ok(Self {
            account_id: row.try_get("account_id")?,
            firstname: row.try_get("account_firstname")?,
            lastname: row.try_get("account_lastname")?,
            role,
        })
    }
}

/// Hash a session token so raw values never touch the database.
#[must_use]
pub fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

/// Resolve the session cookie into an account.
///
/// Returns `Ok(None)` when the cookie is missing, unknown or expired.
///
/// # Errors
/// Returns the database error if the lookup fails.
pub async fn current_account(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<Option<Account>, sqlx::Error> {
    let Some(token) = flash::read_cookie(headers, SESSION_COOKIE_NAME) else {
        return Ok(None);
    };
    let token_hash = hash_session_token(&token);

    let query = r"
        SELECT account.account_id,
               account.account_firstname,
               account.account_lastname,
               account.account_type::text AS account_type
        FROM account_session
        JOIN account ON account.account_id = account_session.account_id
        WHERE account_session.session_hash = $1
          AND account_session.expires_at > NOW()
        LIMIT 1
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Failed to lookup session: {err}");
            err
        })?;

    row.as_ref().map(Account::from_row).transpose()
}

/// Redirect used when a login-guarded route is hit without a session.
#[must_use]
pub fn login_redirect() -> Response {
    flash::redirect_with(LOGIN_PATH, &Notice::notice("Please log in."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::SET_COOKIE, StatusCode};

    #[test]
    fn hash_is_stable_sha256() {
        let hash = hash_session_token("token");
        assert_eq!(hash.len(), 32);
        assert_eq!(hash, hash_session_token("token"));
        assert_ne!(hash, hash_session_token("other"));
    }

    #[test]
    fn role_labels_map_to_roles() {
        assert_eq!(AccountRole::from_db("Admin"), Some(AccountRole::Admin));
        assert_eq!(AccountRole::from_db("Employee"), Some(AccountRole::Employee));
        assert_eq!(AccountRole::from_db("Client"), Some(AccountRole::Client));
        assert_eq!(AccountRole::from_db("admin"), None);
    }

    #[test]
    fn login_redirect_sets_notice() {
        let response = login_redirect();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some(LOGIN_PATH)
        );
        assert!(response.headers().get(SET_COOKIE).is_some());
    }
}
