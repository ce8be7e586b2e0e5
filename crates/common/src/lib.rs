//! gpacap Common Utilities
//!
//! Shared infrastructure for all gpacap crates:
//! - Error types and result aliases
//! - Session clock for capture duration reporting
//! - Tracing/logging initialization
//! - Configuration loading and the persisted settings store

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
