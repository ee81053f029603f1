pub mod product;
pub mod persona;
pub mod live_config;

pub use product::*;
pub use persona::*;
pub use live_config::*;
