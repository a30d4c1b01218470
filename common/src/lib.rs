//! Common utilities and abstractions for the mapflow project.
//!
//! This crate holds the pieces shared by the engine and its drivers: the error
//! taxonomy, engine configuration and tracing setup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{DEFAULT_BUFFER_CAPACITY, EngineConfig};
pub use error::{MapflowError, Result, Stage};
pub use logging::init_tracing;
