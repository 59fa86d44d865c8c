//! Shared utilities: structured logging initialisation.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
