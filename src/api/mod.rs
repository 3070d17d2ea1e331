use crate::api::handlers::{errors, health, reviews, root};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod database;
pub mod handlers;

use self::database::DatabaseConfig;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router on top of `pool`.
pub fn router(pool: PgPool) -> Router {
    Router::new()
        .route("/", get(root::home))
        .route("/health", get(health::health))
        .route("/inv/reviews/:inv_id", get(reviews::listing::view_reviews))
        .route(
            "/inv/add-review/:inv_id",
            get(reviews::create::add_review_form).post(reviews::create::add_review),
        )
        .route(
            "/inv/edit-review/:review_id",
            get(reviews::edit::edit_review_form).post(reviews::edit::update_review),
        )
        .route(
            "/inv/delete-review/:review_id",
            post(reviews::delete::delete_review),
        )
        .fallback(errors::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(pool)),
        )
}

/// Start the HTTP server and block until it shuts down.
///
/// # Errors
/// Returns an error if the pool cannot be configured, the port cannot be bound
/// or the server fails.
pub async fn new(port: u16, database: DatabaseConfig) -> Result<()> {
    let pool = database.connect()?;

    let app = router(pool.clone());

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    pool.close().await;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    #[tokio::test]
    async fn router_serves_requests_without_database() -> anyhow::Result<()> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://127.0.0.1:1/dealership")?;

        let response = router(pool)
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        Ok(())
    }
}
