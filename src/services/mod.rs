//! Service layer: orchestration between forms, the store and the backend.

use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FormError;
use crate::storage::StorageError;

pub mod listing;
pub mod media;
pub mod payment;

#[cfg(test)]
pub(crate) mod fakes;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Form(String),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Session(#[from] StorageError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl ServiceError {
    /// Message suitable for a flash alert.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api(err) => err.user_message(),
            ServiceError::Form(message) => message.clone(),
            ServiceError::NotFound => "The requested record was not found.".to_string(),
            ServiceError::Session(_) | ServiceError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
