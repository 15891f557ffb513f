//! Mock storage implementation for isolating services in tests.

use mockall::mock;

use crate::domain::payment::PendingOrder;
use crate::domain::types::PaymentId;
use crate::storage::{PaymentStorage, StorageResult};

mock! {
    pub Storage {}

    impl PaymentStorage for Storage {
        fn pending_order(&self) -> StorageResult<Option<PendingOrder>>;
        fn save_pending_order(&self, order: &PendingOrder) -> StorageResult<()>;
        fn clear_pending_order(&self);
        fn is_processed(&self, payment_id: &PaymentId) -> StorageResult<bool>;
        fn mark_processed(&self, payment_id: &PaymentId) -> StorageResult<()>;
    }
}
