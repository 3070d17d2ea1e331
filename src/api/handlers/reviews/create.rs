use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use sqlx::PgPool;
use tracing::{error, info};

use super::{
    reviews_path, storage,
    types::{InsertOutcome, NewReview, ReviewForm},
    validation::validate,
    views::{AddReviewTemplate, FormValues},
    ALREADY_REVIEWED,
};
use crate::api::handlers::{
    errors::{internal_error, vehicle_not_found},
    flash::{redirect_with, Notice},
    inventory::{find_inventory, InventoryItem},
    page::{parse_id, render, Chrome},
    session::{current_account, login_redirect, Account},
};

const POSTED: &str = "Your review has been posted successfully!";
const POST_FAILED: &str = "An error occurred while posting your review. Please try again.";

/// `GET /inv/add-review/:inv_id`
pub async fn add_review_form(
    Path(inv_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
) -> Response {
    let account = match current_account(&headers, &pool).await {
        Ok(Some(account)) => account,
        Ok(None) => return login_redirect(),
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match build_form(&pool, &headers, account.clone(), &inv_id).await {
        Ok(response) => response,
        Err(err) => internal_error(&pool, &headers, Some(account), &err).await,
    }
}

async fn build_form(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Account,
    inv_id: &str,
) -> Result<Response, sqlx::Error> {
    let Some(inventory) = lookup_inventory(pool, inv_id).await? else {
        return Ok(vehicle_not_found(pool, headers, Some(account)).await);
    };

    if storage::has_reviewed(pool, inventory.inv_id, account.account_id).await? {
        return Ok(redirect_with(
            &reviews_path(inventory.inv_id),
            &Notice::notice(ALREADY_REVIEWED),
        ));
    }

    let chrome = Chrome::load(pool, headers, Some(account)).await?;
    let template = AddReviewTemplate {
        title: format!("Add Review - {}", inventory.display_name()),
        chrome,
        inventory,
        errors: Vec::new(),
        form: FormValues::default(),
    };
    Ok(render(StatusCode::OK, &template, &template.chrome))
}

/// `POST /inv/add-review/:inv_id`
pub async fn add_review(
    Path(inv_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let account = match current_account(&headers, &pool).await {
        Ok(Some(account)) => account,
        Ok(None) => return login_redirect(),
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match submit(&pool, &headers, account, &inv_id, &form).await {
        Ok(response) => response,
        Err(err) => {
            error!("Error adding review: {err}");
            let location = parse_id(&inv_id).map_or_else(|| "/".to_string(), reviews_path);
            redirect_with(&location, &Notice::notice(POST_FAILED))
        }
    }
}

async fn submit(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Account,
    inv_id: &str,
    form: &ReviewForm,
) -> Result<Response, sqlx::Error> {
    let Some(inventory) = lookup_inventory(pool, inv_id).await? else {
        return Ok(vehicle_not_found(pool, headers, Some(account)).await);
    };

    let valid = match validate(form) {
        Ok(valid) => valid,
        Err(errors) => {
            let chrome = Chrome::load(pool, headers, Some(account)).await?;
            let template = AddReviewTemplate {
                title: format!("Add Review - {}", inventory.display_name()),
                chrome,
                inventory,
                errors,
                form: FormValues::submitted(form),
            };
            return Ok(render(StatusCode::OK, &template, &template.chrome));
        }
    };

    let new_review = NewReview {
        inv_id: inventory.inv_id,
        account_id: account.account_id,
        rating: valid.rating,
        title: valid.title,
        body: valid.body,
        verified_purchase: false,
    };

    let location = reviews_path(inventory.inv_id);
    match storage::insert(pool, &new_review).await? {
        InsertOutcome::Created(review) => {
            info!(
                review_id = review.review_id,
                inv_id = review.inv_id,
                account_id = review.account_id,
                "Review posted"
            );
            Ok(redirect_with(&location, &Notice::success(POSTED)))
        }
        InsertOutcome::Duplicate => Ok(redirect_with(&location, &Notice::notice(ALREADY_REVIEWED))),
    }
}

async fn lookup_inventory(pool: &PgPool, inv_id: &str) -> Result<Option<InventoryItem>, sqlx::Error> {
    match parse_id(inv_id) {
        Some(inv_id) => find_inventory(pool, inv_id).await,
        None => Ok(None),
    }
}
