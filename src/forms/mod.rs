//! Form definitions backing the search page.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{SearchMode, SearchType, TypeConstraintError};

pub mod search;

#[derive(Debug, Error)]
/// Errors that can occur when turning form input into a query.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("{search_type} search is not supported for {mode} assets")]
    UnsupportedSearchType {
        mode: SearchMode,
        search_type: SearchType,
    },

    #[error("from date must not be after to date")]
    InvalidDateRange,
}
