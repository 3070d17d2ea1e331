use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use sqlx::PgPool;

use super::{
    storage,
    views::{ReviewRow, ReviewsTemplate},
};
use crate::api::handlers::{
    errors::{internal_error, vehicle_not_found},
    inventory::find_inventory,
    page::{parse_id, render, Chrome},
    session::{current_account, Account},
};

/// `GET /inv/reviews/:inv_id`
pub async fn view_reviews(
    Path(inv_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
) -> Response {
    let viewer = match current_account(&headers, &pool).await {
        Ok(viewer) => viewer,
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match build(&pool, &headers, viewer.clone(), &inv_id).await {
        Ok(response) => response,
        Err(err) => internal_error(&pool, &headers, viewer, &err).await,
    }
}

async fn build(
    pool: &PgPool,
    headers: &HeaderMap,
    viewer: Option<Account>,
    inv_id: &str,
) -> Result<Response, sqlx::Error> {
    let inventory = match parse_id(inv_id) {
        Some(inv_id) => find_inventory(pool, inv_id).await?,
        None => None,
    };
    let Some(inventory) = inventory else {
        return Ok(vehicle_not_found(pool, headers, viewer).await);
    };

    let reviews = storage::list_for_inventory(pool, inventory.inv_id).await?;
    let rating = storage::rating_summary(pool, inventory.inv_id).await?;
    let has_reviewed = match &viewer {
        Some(account) => storage::has_reviewed(pool, inventory.inv_id, account.account_id).await?,
        None => false,
    };

    let rows = reviews
        .into_iter()
        .map(|review| ReviewRow::new(review, viewer.as_ref()))
        .collect();
    let logged_in = viewer.is_some();
    let chrome = Chrome::load(pool, headers, viewer).await?;

    let template = ReviewsTemplate {
        title: format!("Reviews - {}", inventory.display_name()),
        chrome,
        inventory,
        reviews: rows,
        rating,
        logged_in,
        has_reviewed,
    };
    Ok(render(StatusCode::OK, &template, &template.chrome))
}
