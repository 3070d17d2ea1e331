pub mod errors;
pub mod flash;
pub mod health;
pub mod inventory;
pub mod page;
pub mod reviews;
pub mod root;
pub mod session;
