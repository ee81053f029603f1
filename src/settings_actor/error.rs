use thiserror::Error;

use crate::product_actor::CatalogError;

/// Errors that can occur while editing session settings.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    #[error("Settings are locked while the session is connected")]
    Locked,
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
