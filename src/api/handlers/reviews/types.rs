//! Review rows, aggregates and form payloads.

use serde::Deserialize;

/// A stored review joined with its author's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: i32,
    pub inv_id: i32,
    pub account_id: i32,
    pub rating: i32,
    pub title: String,
    pub body: String,
    /// UTC creation time, `YYYY-MM-DDTHH:MM:SSZ`.
    pub created: String,
    pub verified_purchase: bool,
    pub author_firstname: String,
    pub author_lastname: String,
}

impl Review {
    /// "Sally J." style attribution.
    #[must_use]
    pub fn author(&self) -> String {
        match self.author_lastname.chars().next() {
            Some(initial) => format!("{} {initial}.", self.author_firstname),
            None => self.author_firstname.clone(),
        }
    }

    #[must_use]
    pub fn created_date(&self) -> &str {
        self.created.get(0..10).unwrap_or(&self.created)
    }
}

/// Average rating and review count for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// Rounded to one decimal, `0.0` when there are no reviews.
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub inv_id: i32,
    pub account_id: i32,
    pub rating: i32,
    pub title: String,
    pub body: String,
    pub verified_purchase: bool,
}

#[derive(Debug)]
pub enum InsertOutcome {
    Created(Review),
    /// The account already has a review for this vehicle.
    Duplicate,
}

/// Raw review form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub review_rating: String,
    #[serde(default)]
    pub review_title: String,
    #[serde(default)]
    pub review_body: String,
}
