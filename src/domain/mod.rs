//! Domain values shared by the search and subscription services.

pub mod asset;
pub mod notice;
pub mod search;
pub mod types;
