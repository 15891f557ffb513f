//! REST backend contracts consumed by the console.
//!
//! Services are written against the [`AdminApi`] and [`PaymentApi`] traits;
//! [`rest::RestClient`] is the `reqwest` implementation used at runtime.

use thiserror::Error;

use crate::domain::payment::{CreatedOrder, OrderRequest, PaymentConfirmation};
use crate::domain::types::{IdempotencyKey, RecordId};
use crate::store::ListPage;
use crate::table::Row;

pub mod rest;

pub use rest::RestClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("record not found")]
    NotFound,
}

impl ApiError {
    /// Message shown to the user in alerts and error banners.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(err) if err.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ApiError::Transport(_) => {
                "The server could not be reached. Please try again.".to_string()
            }
            ApiError::Status { status: 401, .. } | ApiError::Status { status: 403, .. } => {
                "You are not allowed to perform this action.".to_string()
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
            ApiError::NotFound => "The requested record was not found.".to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// List and delete operations of the admin collections.
#[allow(async_fn_in_trait)]
pub trait AdminApi {
    /// Fetches one page of `endpoint` with already mapped query pairs.
    async fn list(&self, endpoint: &str, query: &[(&'static str, String)]) -> ApiResult<ListPage>;

    /// Fetches every record of `endpoint`.
    async fn list_all(&self, endpoint: &str) -> ApiResult<Vec<Row>>;

    async fn delete(&self, endpoint: &str, id: &RecordId) -> ApiResult<()>;
}

/// Payment verification and order creation. Every call carries the pending
/// order's idempotency key.
#[allow(async_fn_in_trait)]
pub trait PaymentApi {
    async fn confirm_payment(
        &self,
        key: &IdempotencyKey,
        confirmation: &PaymentConfirmation,
    ) -> ApiResult<()>;

    async fn create_order(
        &self,
        key: &IdempotencyKey,
        request: &OrderRequest<'_>,
    ) -> ApiResult<CreatedOrder>;
}
