//! Core domain types
//!
//! Pure types with no I/O dependencies: configuration, errors, pixel and
//! level types shared by the spectrum and waterfall engines.

pub mod config;
pub mod error;
pub mod levels;
pub mod types;

pub use config::*;
pub use error::*;
pub use levels::*;
pub use types::*;
