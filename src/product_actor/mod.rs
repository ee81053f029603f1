//! Catalog-specific domain logic: product lifecycle hooks and catalog errors.

pub mod entity;
pub mod error;

pub use error::*;
