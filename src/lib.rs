//! # Dealership
//!
//! Server-rendered review pages for the dealership inventory.
//!
//! ## Reviews
//!
//! Every vehicle in the inventory can collect reviews from signed-in accounts.
//!
//! - **One review per vehicle:** an account may review a vehicle once. The
//!   `review` table enforces this with a unique `(review_inv_id, review_account_id)`
//!   constraint and the insert path maps the violation to a "duplicate" outcome.
//! - **Ownership:** only the author may edit a review; the author or an `Admin`
//!   account may delete it.
//! - **Ratings:** the average rating is derived on read, rounded to one decimal.
//!
//! ## Collaborators
//!
//! Accounts, sessions, classifications and inventory rows are owned by other
//! subsystems. This crate only reads them: the session cookie resolves the
//! current account, the inventory table supplies vehicle details and the
//! classification table feeds the navigation menu.

pub mod api;
pub mod cli;

#[cfg(test)]
pub(crate) mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
