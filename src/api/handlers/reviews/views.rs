use askama::Template;

use super::{
    policy::{can_delete, can_edit},
    types::{RatingSummary, Review, ReviewForm},
    validation::{escape_html, FieldError, RATING_MAX, RATING_MIN},
};
use crate::api::handlers::{inventory::InventoryItem, page::Chrome, session::Account};

/// A review as listed on the vehicle page, with the viewer's permissions.
pub(super) struct ReviewRow {
    pub review: Review,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl ReviewRow {
    pub(super) fn new(review: Review, viewer: Option<&Account>) -> Self {
        let (can_edit, can_delete) = viewer.map_or((false, false), |account| {
            (can_edit(account, &review), can_delete(account, &review))
        });
        Self {
            review,
            can_edit,
            can_delete,
        }
    }
}

pub(super) struct RatingOption {
    pub value: i32,
    pub selected: bool,
}

/// Form values ready to embed in markup. Stored reviews are escaped at
/// validation time; raw submissions are escaped here.
#[derive(Debug, Default)]
pub(super) struct FormValues {
    pub rating: String,
    pub title: String,
    pub body: String,
}

impl FormValues {
    pub(super) fn submitted(form: &ReviewForm) -> Self {
        Self {
            rating: escape_html(form.review_rating.trim()),
            title: escape_html(form.review_title.trim()),
            body: escape_html(form.review_body.trim()),
        }
    }

    pub(super) fn stored(review: &Review) -> Self {
        Self {
            rating: review.rating.to_string(),
            title: review.title.clone(),
            body: review.body.clone(),
        }
    }

    /// Rating choices, best first.
    pub(super) fn rating_options(&self) -> Vec<RatingOption> {
        (RATING_MIN..=RATING_MAX)
            .rev()
            .map(|value| RatingOption {
                value,
                selected: self.rating == value.to_string(),
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "reviews.html")]
pub(super) struct ReviewsTemplate {
    pub title: String,
    pub chrome: Chrome,
    pub inventory: InventoryItem,
    pub reviews: Vec<ReviewRow>,
    pub rating: RatingSummary,
    pub logged_in: bool,
    pub has_reviewed: bool,
}

#[derive(Template)]
#[template(path = "add-review.html")]
pub(super) struct AddReviewTemplate {
    pub title: String,
    pub chrome: Chrome,
    pub inventory: InventoryItem,
    pub errors: Vec<FieldError>,
    pub form: FormValues,
}

#[derive(Template)]
#[template(path = "edit-review.html")]
pub(super) struct EditReviewTemplate {
    pub title: String,
    pub chrome: Chrome,
    pub inventory: InventoryItem,
    pub review_id: i32,
    pub errors: Vec<FieldError>,
    pub form: FormValues,
}
