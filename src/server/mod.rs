//! The accept loop and its shutdown signal.

pub mod listener;
pub mod shutdown;

pub use listener::{ServeStats, Server, ServerError};
pub use shutdown::{Shutdown, ShutdownTrigger};
