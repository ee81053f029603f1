//! Thin handles over the actor mailboxes.

#[macro_use]
mod macros;

pub mod catalog_client;
pub mod settings_client;

pub use catalog_client::*;
pub use settings_client::*;
