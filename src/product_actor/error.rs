use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors surfaced by catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Maximum {capacity} products allowed")]
    CapacityExceeded { capacity: usize },
    #[error("Catalog is read-only while the session is connected")]
    ReadOnly,
    #[error("Product validation error: {0}")]
    Validation(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CatalogError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::CapacityExceeded { capacity } => Self::CapacityExceeded { capacity },
            FrameworkError::ReadOnly => Self::ReadOnly,
            FrameworkError::DuplicateId(id) => Self::Validation(format!("duplicate product id {id}")),
            FrameworkError::Rejected(reason) => Self::Validation(reason),
            e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                Self::ActorCommunicationError(e.to_string())
            }
        }
    }
}
