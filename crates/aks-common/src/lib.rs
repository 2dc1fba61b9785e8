//! Common types for the managed cluster reconciler: errors and telemetry

#![deny(missing_docs)]

pub mod error;
pub mod telemetry;

pub use error::{ClientError, Error};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
