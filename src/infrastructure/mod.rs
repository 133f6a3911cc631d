//! Infrastructure layer: I/O implementations, logging and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod logging;
pub mod traits;

pub use error::{InfraError, InfraResult};
