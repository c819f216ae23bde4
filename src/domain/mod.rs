pub mod auth;
pub mod category;
pub mod page;
pub mod types;
pub mod user;
