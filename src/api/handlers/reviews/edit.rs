use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use sqlx::PgPool;
use tracing::{error, info};

use super::{
    policy::can_edit,
    reviews_path, storage,
    types::{Review, ReviewForm},
    validation::{validate, FieldError},
    views::{EditReviewTemplate, FormValues},
    REVIEW_NOT_FOUND,
};
use crate::api::handlers::{
    errors::{internal_error, vehicle_not_found},
    flash::{redirect_with, Notice},
    inventory::find_inventory,
    page::{parse_id, render, Chrome},
    session::{current_account, login_redirect, Account},
};

const UPDATED: &str = "Your review has been updated successfully!";
const NOT_AUTHORIZED: &str = "You are not authorized to edit this review.";
const UPDATE_FAILED: &str = "An error occurred while updating your review. Please try again.";

/// Resolve the review and make sure `account` wrote it.
///
/// `Err` carries the redirect to send instead.
async fn editable_review(
    pool: &PgPool,
    account: &Account,
    review_id: &str,
) -> Result<Result<Review, Response>, sqlx::Error> {
    let review = match parse_id(review_id) {
        Some(review_id) => storage::find(pool, review_id).await?,
        None => None,
    };
    let Some(review) = review else {
        return Ok(Err(redirect_with("/", &Notice::notice(REVIEW_NOT_FOUND))));
    };

    if !can_edit(account, &review) {
        return Ok(Err(redirect_with(
            &reviews_path(review.inv_id),
            &Notice::notice(NOT_AUTHORIZED),
        )));
    }

    Ok(Ok(review))
}

async fn edit_page(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Account,
    review: &Review,
    errors: Vec<FieldError>,
    form: FormValues,
) -> Result<Response, sqlx::Error> {
    let Some(inventory) = find_inventory(pool, review.inv_id).await? else {
        return Ok(vehicle_not_found(pool, headers, Some(account)).await);
    };

    let chrome = Chrome::load(pool, headers, Some(account)).await?;
    let template = EditReviewTemplate {
        title: format!("Edit Review - {}", inventory.display_name()),
        chrome,
        inventory,
        review_id: review.review_id,
        errors,
        form,
    };
    Ok(render(StatusCode::OK, &template, &template.chrome))
}

/// `GET /inv/edit-review/:review_id`
pub async fn edit_review_form(
    Path(review_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
) -> Response {
    let account = match current_account(&headers, &pool).await {
        Ok(Some(account)) => account,
        Ok(None) => return login_redirect(),
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match show_form(&pool, &headers, account.clone(), &review_id).await {
        Ok(response) => response,
        Err(err) => internal_error(&pool, &headers, Some(account), &err).await,
    }
}

async fn show_form(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Account,
    review_id: &str,
) -> Result<Response, sqlx::Error> {
    let review = match editable_review(pool, &account, review_id).await? {
        Ok(review) => review,
        Err(redirect) => return Ok(redirect),
    };
    let form = FormValues::stored(&review);
    edit_page(pool, headers, account, &review, Vec::new(), form).await
}

/// `POST /inv/edit-review/:review_id`
pub async fn update_review(
    Path(review_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let account = match current_account(&headers, &pool).await {
        Ok(Some(account)) => account,
        Ok(None) => return login_redirect(),
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match submit(&pool, &headers, account, &review_id, &form).await {
        Ok(response) => response,
        Err(err) => {
            error!("Error updating review: {err}");
            redirect_with("/", &Notice::notice(UPDATE_FAILED))
        }
    }
}

async fn submit(
    pool: &PgPool,
    headers: &HeaderMap,
    account: Account,
    review_id: &str,
    form: &ReviewForm,
) -> Result<Response, sqlx::Error> {
    // Ownership first, then the form.
    let review = match editable_review(pool, &account, review_id).await? {
        Ok(review) => review,
        Err(redirect) => return Ok(redirect),
    };

    let valid = match validate(form) {
        Ok(valid) => valid,
        Err(errors) => {
            return edit_page(
                pool,
                headers,
                account,
                &review,
                errors,
                FormValues::submitted(form),
            )
            .await;
        }
    };

    let location = reviews_path(review.inv_id);
    match storage::update(pool, review.review_id, valid.rating, &valid.title, &valid.body).await? {
        Some(updated) => {
            info!(
                review_id = updated.review_id,
                account_id = account.account_id,
                "Review updated"
            );
            Ok(redirect_with(&location, &Notice::success(UPDATED)))
        }
        // Deleted between the lookup and the update.
        None => Ok(redirect_with("/", &Notice::notice(REVIEW_NOT_FOUND))),
    }
}
