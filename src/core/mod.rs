//! Core module - shared infrastructure
//!
//! Configuration, the error type, and typed CLI payloads used by every other
//! module.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{CloudSenseError, Result};
pub use types::*;
