//! Form and query-string definitions backing the console routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod admin;
pub mod media;
pub mod payment;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid action")]
    InvalidAction,

    #[error("invalid page size")]
    InvalidPageSize,

    #[error("invalid record id")]
    InvalidRecordId,

    #[error("invalid payment id")]
    InvalidPaymentId,

    #[error("invalid order payload")]
    InvalidOrder,
}
