//! Monitoring Module
//!
//! Observability for the engine:
//! - `tracing` subscriber installation

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggerConfig};
