//! Shared page chrome and template rendering.

use askama::Template;
use axum::{
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::error;

use super::{
    flash::{self, Notice},
    inventory::{fetch_nav, NavItem},
    session::Account,
};

/// Data every page layout needs: navigation, pending notice and the viewer.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub nav: Vec<NavItem>,
    pub notice: Option<Notice>,
    pub account: Option<Account>,
}

impl Chrome {
    /// Build the chrome for a page, consuming any pending flash notice.
    pub async fn load(
        pool: &PgPool,
        headers: &HeaderMap,
        account: Option<Account>,
    ) -> Result<Self, sqlx::Error> {
        Ok(Self {
            nav: fetch_nav(pool).await?,
            notice: flash::take(headers),
            account,
        })
    }

    /// Same as [`Chrome::load`] but falls back to an empty menu when the
    /// classification query fails. Used by error pages.
    pub async fn load_lossy(pool: &PgPool, headers: &HeaderMap, account: Option<Account>) -> Self {
        Self {
            nav: fetch_nav(pool).await.unwrap_or_default(),
            notice: flash::take(headers),
            account,
        }
    }
}

/// Render `template` with `status`, clearing the flash cookie once its notice
/// has been shown.
pub fn render<T: Template>(status: StatusCode, template: &T, chrome: &Chrome) -> Response {
    match template.render() {
        Ok(body) => {
            let mut response = (status, Html(body)).into_response();
            if chrome.notice.is_some() {
                response
                    .headers_mut()
                    .append(SET_COOKIE, flash::clear_cookie());
            }
            response
        }
        Err(err) => {
            error!("Failed to render template: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Parse a positive integer path identifier.
#[must_use]
pub fn parse_id(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|id| *id > 0)
}
