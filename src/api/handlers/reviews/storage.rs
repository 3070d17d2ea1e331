//! SQL access for reviews.
//!
//! One parameterized statement per operation. Errors are logged here and
//! returned to the handler, which decides how the visitor sees them.

use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{error, info_span, Instrument};

use super::types::{InsertOutcome, NewReview, RatingSummary, Review};

const UNIQUE_VIOLATION: &str = "23505";

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        review_id: row.try_get("review_id")?,
        inv_id: row.try_get("review_inv_id")?,
        account_id: row.try_get("review_account_id")?,
        rating: row.try_get("review_rating")?,
        title: row.try_get("review_title")?,
        body: row.try_get("review_body")?,
        created: row.try_get("review_created")?,
        verified_purchase: row.try_get("review_verified_purchase")?,
        author_firstname: row.try_get("account_firstname")?,
        author_lastname: row.try_get("account_lastname")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Reviews for a vehicle, newest first.
pub async fn list_for_inventory(pool: &PgPool, inv_id: i32) -> Result<Vec<Review>, sqlx::Error> {
    let query = r#"
        SELECT review.review_id,
               review.review_inv_id,
               review.review_account_id,
               review.review_rating,
               review.review_title,
               review.review_body,
               to_char(review.review_created AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS review_created,
               review.review_verified_purchase,
               account.account_firstname,
               account.account_lastname
        FROM review
        JOIN account ON review.review_account_id = account.account_id
        WHERE review.review_inv_id = $1
        ORDER BY review.review_created DESC, review.review_id DESC
    "#;
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(inv_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error getting reviews: {err}");
            err
        })?;

    rows.iter().map(review_from_row).collect()
}

/// A single review by id.
pub async fn find(pool: &PgPool, review_id: i32) -> Result<Option<Review>, sqlx::Error> {
    let query = r#"
        SELECT review.review_id,
               review.review_inv_id,
               review.review_account_id,
               review.review_rating,
               review.review_title,
               review.review_body,
               to_char(review.review_created AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS review_created,
               review.review_verified_purchase,
               account.account_firstname,
               account.account_lastname
        FROM review
        JOIN account ON review.review_account_id = account.account_id
        WHERE review.review_id = $1
    "#;
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(review_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error getting review: {err}");
            err
        })?;

    row.as_ref().map(review_from_row).transpose()
}

/// Average rating (one decimal) and review count for a vehicle.
pub async fn rating_summary(pool: &PgPool, inv_id: i32) -> Result<RatingSummary, sqlx::Error> {
    let query = r"
        SELECT COALESCE(ROUND(AVG(review_rating)::numeric, 1), 0)::float8 AS average_rating,
               COUNT(review_id) AS review_count
        FROM review
        WHERE review_inv_id = $1
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(inv_id)
        .fetch_one(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error getting average rating: {err}");
            err
        })?;

    Ok(RatingSummary {
        average: row.try_get("average_rating")?,
        count: row.try_get("review_count")?,
    })
}

/// Insert a review. A second review by the same account for the same vehicle
/// trips the `(review_inv_id, review_account_id)` unique constraint and comes
/// back as [`InsertOutcome::Duplicate`].
pub async fn insert(pool: &PgPool, review: &NewReview) -> Result<InsertOutcome, sqlx::Error> {
    let query = r#"
        WITH inserted AS (
            INSERT INTO review
                (review_inv_id, review_account_id, review_rating, review_title, review_body, review_verified_purchase)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        )
        SELECT inserted.review_id,
               inserted.review_inv_id,
               inserted.review_account_id,
               inserted.review_rating,
               inserted.review_title,
               inserted.review_body,
               to_char(inserted.review_created AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS review_created,
               inserted.review_verified_purchase,
               account.account_firstname,
               account.account_lastname
        FROM inserted
        JOIN account ON inserted.review_account_id = account.account_id
    "#;
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(review.inv_id)
        .bind(review.account_id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.body)
        .bind(review.verified_purchase)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match result {
        Ok(row) => Ok(InsertOutcome::Created(review_from_row(&row)?)),
        Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
        Err(err) => {
            error!("Error inserting review: {err}");
            Err(err)
        }
    }
}

/// Update rating, title and body. Returns `None` when the review no longer exists.
pub async fn update(
    pool: &PgPool,
    review_id: i32,
    rating: i32,
    title: &str,
    body: &str,
) -> Result<Option<Review>, sqlx::Error> {
    let query = r#"
        WITH updated AS (
            UPDATE review
            SET review_rating = $2, review_title = $3, review_body = $4
            WHERE review_id = $1
            RETURNING *
        )
        SELECT updated.review_id,
               updated.review_inv_id,
               updated.review_account_id,
               updated.review_rating,
               updated.review_title,
               updated.review_body,
               to_char(updated.review_created AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS review_created,
               updated.review_verified_purchase,
               account.account_firstname,
               account.account_lastname
        FROM updated
        JOIN account ON updated.review_account_id = account.account_id
    "#;
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(review_id)
        .bind(rating)
        .bind(title)
        .bind(body)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error updating review: {err}");
            err
        })?;

    row.as_ref().map(review_from_row).transpose()
}

/// Delete a review. Returns `false` when no row matched.
pub async fn delete(pool: &PgPool, review_id: i32) -> Result<bool, sqlx::Error> {
    let query = r"
        DELETE FROM review
        WHERE review_id = $1
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(review_id)
        .execute(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error deleting review: {err}");
            err
        })?;

    Ok(result.rows_affected() > 0)
}

/// Whether the account already reviewed the vehicle.
pub async fn has_reviewed(pool: &PgPool, inv_id: i32, account_id: i32) -> Result<bool, sqlx::Error> {
    let query = r"
        SELECT EXISTS (
            SELECT 1
            FROM review
            WHERE review_inv_id = $1 AND review_account_id = $2
        ) AS reviewed
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(inv_id)
        .bind(account_id)
        .fetch_one(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error checking review: {err}");
            err
        })?;

    row.try_get("reviewed")
}
