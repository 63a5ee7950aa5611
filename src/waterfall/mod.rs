//! Waterfall display
//!
//! Turns successive log-power spectra into a scrolling, palette-mapped raster.

pub mod engine;
pub mod palette;
pub mod raster;

pub use engine::{RowMode, WaterfallConfig, WaterfallEngine};
pub use palette::{palette_color, Palette};
pub use raster::Raster;
