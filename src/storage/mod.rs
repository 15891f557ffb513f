//! Browser-side payment state kept in the cookie session.

use actix_session::{Session, SessionGetError, SessionInsertError};
use thiserror::Error;

use crate::domain::payment::PendingOrder;
use crate::domain::types::PaymentId;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub const PENDING_ORDER_KEY: &str = "pending_order";
pub const PROCESSED_PAYMENTS_KEY: &str = "processed_payments";
/// Processed payment ids remembered per session, oldest dropped first.
pub const PROCESSED_PAYMENTS_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read session: {0}")]
    Read(String),
    #[error("failed to write session: {0}")]
    Write(String),
}

impl From<SessionGetError> for StorageError {
    fn from(err: SessionGetError) -> Self {
        StorageError::Read(err.to_string())
    }
}

impl From<SessionInsertError> for StorageError {
    fn from(err: SessionInsertError) -> Self {
        StorageError::Write(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Pending order and processed-payment guard of one visitor.
pub trait PaymentStorage {
    fn pending_order(&self) -> StorageResult<Option<PendingOrder>>;
    fn save_pending_order(&self, order: &PendingOrder) -> StorageResult<()>;
    fn clear_pending_order(&self);
    fn is_processed(&self, payment_id: &PaymentId) -> StorageResult<bool>;
    fn mark_processed(&self, payment_id: &PaymentId) -> StorageResult<()>;
}

/// [`PaymentStorage`] over the actix cookie session.
pub struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn processed(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .session
            .get::<Vec<String>>(PROCESSED_PAYMENTS_KEY)?
            .unwrap_or_default())
    }
}

impl PaymentStorage for SessionStorage {
    fn pending_order(&self) -> StorageResult<Option<PendingOrder>> {
        Ok(self.session.get(PENDING_ORDER_KEY)?)
    }

    fn save_pending_order(&self, order: &PendingOrder) -> StorageResult<()> {
        Ok(self.session.insert(PENDING_ORDER_KEY, order)?)
    }

    fn clear_pending_order(&self) {
        self.session.remove(PENDING_ORDER_KEY);
    }

    fn is_processed(&self, payment_id: &PaymentId) -> StorageResult<bool> {
        Ok(self
            .processed()?
            .iter()
            .any(|id| id == payment_id.as_str()))
    }

    fn mark_processed(&self, payment_id: &PaymentId) -> StorageResult<()> {
        let mut processed = self.processed()?;
        if processed.iter().any(|id| id == payment_id.as_str()) {
            return Ok(());
        }
        processed.push(payment_id.to_string());
        let excess = processed.len().saturating_sub(PROCESSED_PAYMENTS_LIMIT);
        processed.drain(..excess);
        Ok(self.session.insert(PROCESSED_PAYMENTS_KEY, processed)?)
    }
}
