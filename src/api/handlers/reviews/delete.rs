use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    response::Response,
};
use sqlx::PgPool;
use tracing::{error, info};

use super::{policy::can_delete, reviews_path, storage, REVIEW_NOT_FOUND};
use crate::api::handlers::{
    errors::internal_error,
    flash::{redirect_with, Notice},
    page::parse_id,
    session::{current_account, login_redirect, Account},
};

const DELETED: &str = "Your review has been deleted successfully!";
const NOT_AUTHORIZED: &str = "You are not authorized to delete this review.";
const DELETE_FAILED: &str = "An error occurred while deleting your review. Please try again.";

/// `POST /inv/delete-review/:review_id`
pub async fn delete_review(
    Path(review_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
) -> Response {
    let account = match current_account(&headers, &pool).await {
        Ok(Some(account)) => account,
        Ok(None) => return login_redirect(),
        Err(err) => return internal_error(&pool, &headers, None, &err).await,
    };

    match remove(&pool, &account, &review_id).await {
        Ok(response) => response,
        Err(err) => {
            error!("Error deleting review: {err}");
            redirect_with("/", &Notice::notice(DELETE_FAILED))
        }
    }
}

async fn remove(pool: &PgPool, account: &Account, review_id: &str) -> Result<Response, sqlx::Error> {
    let review = match parse_id(review_id) {
        Some(review_id) => storage::find(pool, review_id).await?,
        None => None,
    };
    let Some(review) = review else {
        return Ok(redirect_with("/", &Notice::notice(REVIEW_NOT_FOUND)));
    };

    let location = reviews_path(review.inv_id);
    if !can_delete(account, &review) {
        return Ok(redirect_with(&location, &Notice::notice(NOT_AUTHORIZED)));
    }

    if storage::delete(pool, review.review_id).await? {
        info!(
            review_id = review.review_id,
            account_id = account.account_id,
            "Review deleted"
        );
        Ok(redirect_with(&location, &Notice::success(DELETED)))
    } else {
        Ok(redirect_with("/", &Notice::notice(REVIEW_NOT_FOUND)))
    }
}
