//! Who may change a review.

use super::types::Review;
use crate::api::handlers::session::{Account, AccountRole};

/// Only the author may edit.
#[must_use]
pub fn can_edit(account: &Account, review: &Review) -> bool {
    account.account_id == review.account_id
}

/// The author or any `Admin` account may delete.
#[must_use]
pub fn can_delete(account: &Account, review: &Review) -> bool {
    can_edit(account, review) || account.role == AccountRole::Admin
}
