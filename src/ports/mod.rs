//! Port traits (interfaces)
//!
//! These traits define the boundaries between the core engines and external I/O.
//! Adapters implement these traits to connect to real hardware or simulations.

pub mod source;

pub use source::*;
