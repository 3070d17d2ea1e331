//! Review form rules.
//!
//! Title and body are trimmed and HTML-escaped before their lengths are
//! checked, so the stored text is already safe to embed in markup. Each field
//! reports its first failing rule only.

use regex::Regex;

use super::types::ReviewForm;

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;
pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const BODY_MIN: usize = 10;
pub const BODY_MAX: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// A review form that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub rating: i32,
    /// Trimmed and escaped.
    pub title: String,
    /// Trimmed and escaped.
    pub body: String,
}

/// Escape the characters that are unsafe in HTML text and attributes.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn valid_integer(value: &str) -> bool {
    Regex::new(r"^[-+]?[0-9]+$").is_ok_and(|re| re.is_match(value))
}

fn check_rating(raw: &str) -> Result<i32, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError {
            field: "review_rating",
            message: "Please select a rating.",
        });
    }

    let out_of_range = FieldError {
        field: "review_rating",
        message: "Rating must be between 1 and 5.",
    };
    if !valid_integer(value) {
        return Err(out_of_range);
    }
    match value.parse::<i32>() {
        Ok(rating) if (RATING_MIN..=RATING_MAX).contains(&rating) => Ok(rating),
        _ => Err(out_of_range),
    }
}

fn check_text(
    raw: &str,
    field: &'static str,
    (min, max): (usize, usize),
    missing: &'static str,
    bad_length: &'static str,
) -> Result<String, FieldError> {
    let value = escape_html(raw.trim());
    if value.is_empty() {
        return Err(FieldError {
            field,
            message: missing,
        });
    }

    let length = value.chars().count();
    if length < min || length > max {
        return Err(FieldError {
            field,
            message: bad_length,
        });
    }

    Ok(value)
}

/// Apply the review rules to a submitted form.
///
/// # Errors
/// Returns every field error, in form order, when any rule fails.
pub fn validate(form: &ReviewForm) -> Result<ValidReview, Vec<FieldError>> {
    let rating = check_rating(&form.review_rating);
    let title = check_text(
        &form.review_title,
        "review_title",
        (TITLE_MIN, TITLE_MAX),
        "Please provide a review title.",
        "Review title must be between 3 and 100 characters.",
    );
    let body = check_text(
        &form.review_body,
        "review_body",
        (BODY_MIN, BODY_MAX),
        "Please provide a review.",
        "Review must be between 10 and 5000 characters.",
    );

    match (rating, title, body) {
        (Ok(rating), Ok(title), Ok(body)) => Ok(ValidReview {
            rating,
            title,
            body,
        }),
        (rating, title, body) => Err([rating.err(), title.err(), body.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}
