//! Vehicle review pages.
//!
//! Any visitor can read the reviews for a vehicle. Writing requires a session:
//! an account may post one review per vehicle, edit only its own reviews and
//! delete its own reviews, while `Admin` accounts may delete any review.
//! Failed authorization never returns `403`; the visitor is redirected with a
//! notice instead.
//!
//! Flow Overview:
//! 1) Resolve the current account from the session cookie.
//! 2) Resolve the vehicle or review from the path, 404/redirect when missing.
//! 3) Check ownership through `policy`.
//! 4) Validate the submitted form, re-rendering it with errors on failure.
//! 5) Run the single SQL statement in `storage` and redirect with a notice.

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod edit;
pub(crate) mod listing;
pub mod policy;
pub mod storage;
pub mod types;
pub mod validation;
mod views;

const ALREADY_REVIEWED: &str =
    "You have already reviewed this vehicle. You can only leave one review per vehicle.";
const REVIEW_NOT_FOUND: &str = "Review not found.";

/// Path of the review list for a vehicle.
fn reviews_path(inv_id: i32) -> String {
    format!("/inv/reviews/{inv_id}")
}
