pub mod search;
pub mod subscriptions;

use thiserror::Error;

use crate::api::errors::ApiError;
use crate::forms::FormError;
use crate::storage::errors::StorageError;

pub use search::{DetailView, PendingSearch, SearchAction, SearchController, SearchState};
pub use subscriptions::SubscriptionTracker;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("asset has no external id")]
    MissingExternalId,

    #[error("not found: {0}")]
    NotFound(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
