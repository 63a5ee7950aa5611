//! Core domain types

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::error::{IqError, IqResult};

/// One quadrature sample: real part is I (in-phase), imaginary part is Q
pub type IqSample = Complex<f32>;

/// Channel mapping fixes applied to incoming samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IqFormat {
    /// Produce `Q + jI` instead of `I + jQ` (mirrors the spectrum)
    pub rev_iq: bool,
    /// Delay Q by one sample to undo the PCM290x codec's channel lag.
    /// Only meaningful for stereo PCM input.
    pub lagfix: bool,
}

/// Default number of rows in the waterfall raster
pub const WF_LINES: usize = 50;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color scheme used to map dB values to colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteKind {
    /// Plain black, used to fill under the 2-D spectrum curve
    Black,
    /// Black → red → yellow → white in three linear ramps
    Stepped,
    /// Phase-shifted cosines in R, G and B with a brightness ramp
    Rainbow,
}

impl PaletteKind {
    pub fn id(&self) -> u8 {
        match self {
            PaletteKind::Black => 0,
            PaletteKind::Stepped => 1,
            PaletteKind::Rainbow => 2,
        }
    }
}

impl TryFrom<u8> for PaletteKind {
    type Error = IqError;

    fn try_from(id: u8) -> IqResult<Self> {
        match id {
            0 => Ok(PaletteKind::Black),
            1 => Ok(PaletteKind::Stepped),
            2 => Ok(PaletteKind::Rainbow),
            other => Err(IqError::InvalidPalette(other)),
        }
    }
}

/// Pixel size of one frequency-bin-by-time-row cell in the waterfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: usize,
    pub height: usize,
}

impl CellSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Cell size that spreads `size` bins over `width` pixels and `lines` rows
    /// over `height` pixels, never smaller than one pixel.
    pub fn fit(width: usize, height: usize, size: usize, lines: usize) -> Self {
        Self {
            width: (width / size.max(1)).max(1),
            height: (height / lines.max(1)).max(1),
        }
    }
}

/// Pixel budget the display layer gives to the spectrum and waterfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    /// Horizontal pixels available to one spectrum
    pub width: usize,
    /// Vertical pixels of the waterfall area
    pub waterfall_height: usize,
    /// Number of waterfall rows
    pub lines: usize,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        // 640x512 window: waterfall takes the bottom third
        Self {
            width: 640,
            waterfall_height: 170,
            lines: WF_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_ids_round_trip_and_reject_unknown() {
        for id in 0..=2u8 {
            assert_eq!(PaletteKind::try_from(id).unwrap().id(), id);
        }
        assert!(matches!(PaletteKind::try_from(3), Err(IqError::InvalidPalette(3))));
    }

    #[test]
    fn cell_fit_divides_display_budget() {
        let cell = CellSize::fit(640, 170, 512, 50);
        assert_eq!(cell, CellSize::new(1, 3));

        let cell = CellSize::fit(1024, 100, 256, 50);
        assert_eq!(cell, CellSize::new(4, 2));
    }

    #[test]
    fn cell_fit_never_collapses_to_zero() {
        let cell = CellSize::fit(100, 10, 512, 50);
        assert_eq!(cell, CellSize::new(1, 1));
    }
}
