//! DTO modules describing the platform's REST payloads.

pub mod search;
pub mod tracker;
