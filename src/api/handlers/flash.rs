//! One-shot user notices carried across redirects.
//!
//! A notice is stored in a short-lived cookie, read by the next rendered page
//! and cleared in that page's response.

use axum::{
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Redirect, Response},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use tracing::warn;

pub const FLASH_COOKIE_NAME: &str = "dealership_flash";
const FLASH_MAX_AGE_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Notice,
    Success,
}

impl NoticeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Success => "success",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "notice" => Some(Self::Notice),
            "success" => Some(Self::Success),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Notice,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        let raw = format!("{}\n{}", self.kind.as_str(), self.message);
        Base64UrlUnpadded::encode_string(raw.as_bytes())
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = Base64UrlUnpadded::decode_vec(value).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        let (kind, message) = raw.split_once('\n')?;
        Some(Self {
            kind: NoticeKind::parse(kind)?,
            message: message.to_string(),
        })
    }
}

/// Read a cookie value by name from the request headers.
pub(crate) fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Return the pending notice, if the request carries one.
pub fn take(headers: &HeaderMap) -> Option<Notice> {
    let value = read_cookie(headers, FLASH_COOKIE_NAME)?;
    let notice = Notice::decode(&value);
    if notice.is_none() {
        warn!("Ignoring malformed flash cookie");
    }
    notice
}

/// `Set-Cookie` value that removes the flash cookie.
pub(crate) fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("dealership_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

fn notice_cookie(notice: &Notice) -> Option<HeaderValue> {
    let cookie = format!(
        "{FLASH_COOKIE_NAME}={}; Path=/; Max-Age={FLASH_MAX_AGE_SECONDS}; HttpOnly; SameSite=Lax",
        notice.encode()
    );
    HeaderValue::from_str(&cookie).ok()
}

/// Redirect to `location`, carrying `notice` to the next rendered page.
pub fn redirect_with(location: &str, notice: &Notice) -> Response {
    let mut response = Redirect::to(location).into_response();
    if let Some(cookie) = notice_cookie(notice) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}
