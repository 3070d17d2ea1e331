//! Error pages: the 404 fallback, vehicle-not-found and the generic crash page.

use askama::Template;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode, Uri},
    response::Response,
};
use sqlx::PgPool;
use std::fmt::Display;
use tracing::{error, info};

use super::{
    page::{render, Chrome},
    session::{current_account, Account},
};

const MISSING_PAGE_MESSAGE: &str = "Unfortunately, we don't have that page in stock.";
const CRASH_MESSAGE: &str = "Oh no! There was a crash. Maybe try a different route?";

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    title: String,
    message: String,
    chrome: Chrome,
}

async fn error_page(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Option<Account>,
    status: StatusCode,
    title: String,
    message: &str,
) -> Response {
    let chrome = Chrome::load_lossy(pool, headers, account).await;
    let template = ErrorTemplate {
        title,
        message: message.to_string(),
        chrome,
    };
    render(status, &template, &template.chrome)
}

/// 404 page for a vehicle id with no inventory row.
pub async fn vehicle_not_found(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Option<Account>,
) -> Response {
    error_page(
        pool,
        headers,
        account,
        StatusCode::NOT_FOUND,
        "404 - Vehicle Not Found".to_string(),
        "The requested vehicle could not be found.",
    )
    .await
}

/// Log `err` and render the generic 500 page without exposing details.
pub async fn internal_error(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Option<Account>,
    err: impl Display,
) -> Response {
    error!("Request failed: {err}");
    error_page(
        pool,
        headers,
        account,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server Error".to_string(),
        CRASH_MESSAGE,
    )
    .await
}

/// Router fallback for unknown routes.
pub async fn not_found(uri: Uri, headers: HeaderMap, pool: Extension<PgPool>) -> Response {
    info!("No route for {uri}");
    let account = current_account(&headers, &pool).await.unwrap_or_default();
    error_page(
        &pool,
        &headers,
        account,
        StatusCode::NOT_FOUND,
        "404".to_string(),
        MISSING_PAGE_MESSAGE,
    )
    .await
}
