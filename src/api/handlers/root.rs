use askama::Template;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use sqlx::PgPool;

use super::{
    errors::internal_error,
    page::{render, Chrome},
    session::current_account,
};

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    title: String,
    chrome: Chrome,
}

// axum handler for the home page
pub async fn home(headers: HeaderMap, pool: Extension<PgPool>) -> Response {
    let account = match current_account(&headers, &pool).await {
        Ok(account) => account,
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match Chrome::load(&pool, &headers, account.clone()).await {
        Ok(chrome) => {
            let template = HomeTemplate {
                title: "Home".to_string(),
                chrome,
            };
            render(StatusCode::OK, &template, &template.chrome)
        }
        Err(err) => internal_error(&pool, &headers, account, &err).await,
    }
}
