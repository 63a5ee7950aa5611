//! Digital Signal Processing
//!
//! Pure functions and engines for spectral estimation. No I/O dependencies.

pub mod pcm;
pub mod spectrum;
pub mod stats;
pub mod window;

// Re-export commonly used items
pub use pcm::{decode_pcm16, reverse_iq};
pub use spectrum::{SpectrumEngine, SpectrumFrame};
