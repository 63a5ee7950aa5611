//! iqscope: live spectrum and waterfall from quadrature (I/Q) radio samples
//!
//! Turns chunks of complex samples into a calibrated log-power spectrum and a
//! scrolling, color-mapped waterfall raster for a display layer to blit.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types: options, errors, colors, dB ranges
//! - `dsp/` - Spectrum engine and sample decoding (pure, no I/O)
//! - `waterfall/` - Palette, raster and the waterfall engine (pure, no I/O)
//! - `ports/` - Trait definitions for external collaborators (sample sources)
//! - `adapters/` - Implementations of ports (simulated source) and profile files
//! - `pipeline` - Per-frame composition of the engines for a render loop
//!
//! ## Example
//!
//! ```
//! use iqscope_lib::domain::{DisplayGeometry, Options};
//! use iqscope_lib::pipeline::SpectrumPipeline;
//! use iqscope_lib::adapters::SimulatedSource;
//!
//! let options = Options { size: 256, buffers: 4, ..Options::default() };
//! let mut pipeline = SpectrumPipeline::new(&options, DisplayGeometry::default())?;
//! let mut source = SimulatedSource::new(options.sample_rate, 1)
//!     .with_tone(1500.0, 2000.0)
//!     .with_noise(20.0)?;
//!
//! let frame = pipeline.run_frame(&mut source)?;
//! assert_eq!(frame.log_power.len(), 256);
//! # Ok::<(), iqscope_lib::domain::IqError>(())
//! ```

// Core (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod waterfall;

// Boundaries
pub mod adapters;
pub mod ports;

pub mod pipeline;

pub use domain::{IqError, IqResult, IqSample, Options};
pub use dsp::{SpectrumEngine, SpectrumFrame};
pub use pipeline::SpectrumPipeline;
pub use waterfall::{WaterfallConfig, WaterfallEngine};
