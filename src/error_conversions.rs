//! Error conversion glue between the domain and the service layer.
//!
//! The domain layer must not depend on service error types, so the
//! conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::InvalidValue(_) | TypeConstraintError::EmptyString => {
                ServiceError::NotFound
            }
            TypeConstraintError::InvalidUuid => ServiceError::Internal(val.to_string()),
        }
    }
}
