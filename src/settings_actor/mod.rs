//! Session settings: persona, system instruction and function descriptions.

pub mod service;
pub mod error;

pub use service::*;
pub use error::*;
