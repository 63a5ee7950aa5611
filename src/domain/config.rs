//! Receiver display options
//!
//! `Options` is the saved profile for one receiver setup: transform geometry,
//! pulse rejection, waterfall behavior and the dB ranges of both displays.

use serde::{Deserialize, Serialize};

use super::error::{IqError, IqResult};
use super::levels::DbRange;
use super::types::{IqFormat, PaletteKind};

/// Transform sizes tried, largest first, when the configured size is wider than the display
const FALLBACK_SIZES: [usize; 4] = [1024, 512, 256, 128];

/// Where the I/Q samples come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Stereo sound card, 16-bit I and Q channels
    Audio,
    /// RTL-SDR dongle, samples normalized to ±1
    Rtl,
}

impl SourceKind {
    /// dB added to every spectrum before display.
    /// RTL samples are normalized to ±1 and read ~60 dB low against 16-bit full scale.
    pub fn display_offset_db(&self) -> f32 {
        match self {
            SourceKind::Audio => 0.0,
            SourceKind::Rtl => 60.0,
        }
    }
}

/// A saved receiver display profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Profile name (e.g., "Default", "SoftRock 40m")
    pub name: String,
    /// Sample source
    pub source: SourceKind,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Transform length per sub-buffer
    pub size: usize,
    /// Sub-buffers averaged per displayed spectrum
    pub buffers: usize,
    /// Pulse rejection multiplier applied to the median sample magnitude
    pub pulse: f32,
    /// Swap I and Q
    pub rev_iq: bool,
    /// Delay Q by one sample (PCM290x codec channel lag)
    pub lagfix: bool,
    /// Show the waterfall
    pub waterfall: bool,
    /// Spectra per waterfall row
    pub waterfall_accumulation: usize,
    /// Waterfall palette id (1 = stepped, 2 = rainbow)
    pub waterfall_palette: u8,
    /// Waterfall palette range in dB
    pub v_min: f32,
    pub v_max: f32,
    /// 2-D spectrum vertical scale in dB
    pub sp_min: f32,
    pub sp_max: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            source: SourceKind::Audio,
            sample_rate: 48000,
            size: 512,
            buffers: 12,
            pulse: 6.0,
            rev_iq: false,
            lagfix: false,
            waterfall: true,
            waterfall_accumulation: 4,
            waterfall_palette: 2,
            v_min: -120.0,
            v_max: -20.0,
            sp_min: -120.0,
            sp_max: -20.0,
        }
    }
}

impl Options {
    /// Check every parameter the engines depend on
    pub fn validate(&self) -> IqResult<()> {
        if self.size == 0 {
            return Err(IqError::Config("size must be positive".into()));
        }
        if self.buffers == 0 {
            return Err(IqError::Config("buffers must be at least 1".into()));
        }
        if !(self.pulse.is_finite() && self.pulse > 0.0) {
            return Err(IqError::Config(format!(
                "pulse must be a positive number, got {}",
                self.pulse
            )));
        }
        if self.sample_rate == 0 {
            return Err(IqError::Config("sample_rate must be positive".into()));
        }
        if self.waterfall_accumulation == 0 {
            return Err(IqError::Config(
                "waterfall_accumulation must be at least 1".into(),
            ));
        }
        if self.waterfall {
            match self.palette_kind()? {
                PaletteKind::Black => {
                    return Err(IqError::Config(
                        "waterfall_palette must be 1 (stepped) or 2 (rainbow)".into(),
                    ))
                }
                PaletteKind::Stepped | PaletteKind::Rainbow => {}
            }
            self.waterfall_range()?;
        }
        self.spectrum_scale()?;
        Ok(())
    }

    pub fn palette_kind(&self) -> IqResult<PaletteKind> {
        PaletteKind::try_from(self.waterfall_palette)
    }

    /// Initial waterfall palette range
    pub fn waterfall_range(&self) -> IqResult<DbRange> {
        DbRange::new(self.v_min, self.v_max)
    }

    /// Initial 2-D spectrum scale
    pub fn spectrum_scale(&self) -> IqResult<DbRange> {
        DbRange::new(self.sp_min, self.sp_max)
    }

    /// Channel fixes for incoming samples
    pub fn iq_format(&self) -> IqFormat {
        IqFormat {
            rev_iq: self.rev_iq,
            lagfix: self.lagfix,
        }
    }

    /// Samples per chunk (one displayed spectrum)
    pub fn chunk_len(&self) -> usize {
        self.size * self.buffers
    }

    /// Seconds of signal in one chunk
    pub fn chunk_time(&self) -> f64 {
        self.chunk_len() as f64 / self.sample_rate as f64
    }

    /// Frequency spacing between spectrum bins in Hz
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate as f64 / self.size as f64
    }

    /// Shrink `size` so every bin gets at least one display pixel.
    ///
    /// Returns the effective size. Fails if the display is narrower than the
    /// smallest supported transform.
    pub fn fit_to_display(&mut self, width: usize) -> IqResult<usize> {
        if self.size <= width {
            return Ok(self.size);
        }
        let fitted = FALLBACK_SIZES
            .iter()
            .copied()
            .find(|&n| n <= width)
            .ok_or_else(|| {
                IqError::Config(format!(
                    "display width {width} px is too narrow for a {}-point transform",
                    FALLBACK_SIZES[FALLBACK_SIZES.len() - 1]
                ))
            })?;
        log::warn!("size was reset from {} to {fitted} to fit {width} px", self.size);
        self.size = fitted;
        Ok(fitted)
    }
}
