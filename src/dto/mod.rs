//! Projections of domain records for the Tera templates.

pub mod categories;
pub mod table;
pub mod users;
