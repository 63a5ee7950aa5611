//! Spectrum engine: one chunk of I/Q samples in, one calibrated log-power spectrum out
//!
//! Pipeline per chunk:
//!   median |x| of first sub-buffer → pulse threshold
//!   per sub-buffer: remove DC → reject if peak ≥ threshold
//!                   → Hann window → FFT → center 0 Hz → |X|² → accumulate
//!   mean power over accepted sub-buffers → 10·log10 → subtract calibration
//!
//! Calibration puts a full-scale 16-bit input (amplitude 2^15) at 0 dB before
//! the window's coherent gain, so a bin-centered full-scale tone reads about
//! -6 dB through the Hann window.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use super::stats::{max_magnitude, median_magnitude, remove_dc};
use super::window::hann;
use crate::domain::{IqError, IqResult, IqSample};

/// Full-scale amplitude of a signed 16-bit sample
const FULL_SCALE: f64 = 32768.0;

/// Reorder FFT output so that 0 Hz sits at index `len / 2`.
///
/// Bin `k` of the transform lands at index `(k + len/2) % len`: negative
/// frequencies on the left, positive on the right.
pub fn center_zero_frequency<T>(bins: &mut [T]) {
    let half = bins.len() / 2;
    bins.rotate_right(half);
}

/// Result of one `SpectrumEngine::compute` call
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    /// Calibrated log power in dB, zero-frequency centered, `size` bins.
    /// Empty bins read `-inf`.
    pub log_power: Vec<f32>,
    /// Sub-buffers that went into the average
    pub accepted: usize,
    /// At least one sub-buffer of this chunk was rejected as a pulse
    pub rejected: bool,
    /// Sub-buffers rejected since the engine was created
    pub total_rejected: u64,
}

impl SpectrumFrame {
    /// Index and value of the strongest bin
    pub fn peak(&self) -> Option<(usize, f32)> {
        self.log_power
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}

/// Windowed, pulse-rejecting, averaged power spectrum estimator
pub struct SpectrumEngine {
    size: usize,
    buffers: usize,
    pulse: f32,
    calibration_db: f32,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    // Reused per call
    segment: Vec<IqSample>,
    fft_scratch: Vec<IqSample>,
    power: Vec<f32>,
    rejected_count: u64,
    clip_indicator: bool,
}

impl SpectrumEngine {
    /// Create an engine for `size`-point transforms over `buffers` sub-buffers
    /// per chunk, rejecting sub-buffers whose peak reaches `pulse` times the
    /// median sample magnitude.
    pub fn new(size: usize, buffers: usize, pulse: f32) -> IqResult<Self> {
        if size == 0 {
            return Err(IqError::Config("transform size must be positive".into()));
        }
        if buffers == 0 {
            return Err(IqError::Config("buffers must be at least 1".into()));
        }
        if !(pulse.is_finite() && pulse > 0.0) {
            return Err(IqError::Config(format!(
                "pulse multiplier must be positive, got {pulse}"
            )));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let fft_scratch = vec![IqSample::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let calibration_db = (20.0 * (size as f64 * FULL_SCALE).log10()) as f32;

        log::debug!(
            "spectrum engine: size={size} buffers={buffers} pulse={pulse} calibration={calibration_db:.2} dB"
        );

        Ok(Self {
            size,
            buffers,
            pulse,
            calibration_db,
            window: hann(size),
            fft,
            segment: vec![IqSample::new(0.0, 0.0); size],
            fft_scratch,
            power: vec![0.0; size],
            rejected_count: 0,
            clip_indicator: false,
        })
    }

    /// Compute the calibrated log-power spectrum of one chunk.
    ///
    /// # Panics
    ///
    /// If `chunk` holds fewer than `buffers * size` samples. The acquisition
    /// layer guarantees chunk length.
    pub fn compute(&mut self, chunk: &[IqSample]) -> SpectrumFrame {
        let size = self.size;
        let needed = size * self.buffers;
        assert!(
            chunk.len() >= needed,
            "sample chunk holds {} samples, need {} ({} buffers x {})",
            chunk.len(),
            needed,
            self.buffers,
            size
        );

        let threshold = self.pulse * median_magnitude(&chunk[..size]);
        self.power.fill(0.0);
        let mut accepted = 0usize;
        let mut rejected = false;

        for (index, sub_buffer) in chunk[..needed].chunks_exact(size).enumerate() {
            self.segment.copy_from_slice(sub_buffer);
            remove_dc(&mut self.segment);

            // Accept only a peak strictly below the threshold; NaN never is
            let peak = max_magnitude(&self.segment);
            let accept = peak < threshold;
            if !accept {
                self.rejected_count += 1;
                self.clip_indicator = true;
                rejected = true;
                log::trace!("pulse reject: sub-buffer {index} peak {peak:.1}, threshold {threshold:.1}");
                continue;
            }

            for (s, &w) in self.segment.iter_mut().zip(self.window.iter()) {
                *s *= w;
            }
            self.fft
                .process_with_scratch(&mut self.segment, &mut self.fft_scratch);
            center_zero_frequency(&mut self.segment);

            for (p, x) in self.power.iter_mut().zip(self.segment.iter()) {
                *p += x.norm_sqr();
            }
            accepted += 1;
        }

        if accepted > 0 {
            let n = accepted as f32;
            for p in self.power.iter_mut() {
                *p /= n;
            }
        } else {
            // Every sub-buffer was a pulse: flat unit power instead of log(0)
            self.power.fill(1.0);
        }

        let calibration = self.calibration_db;
        let log_power = self
            .power
            .iter()
            .map(|&p| 10.0 * p.log10() - calibration)
            .collect();

        SpectrumFrame {
            log_power,
            accepted,
            rejected,
            total_rejected: self.rejected_count,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn buffers(&self) -> usize {
        self.buffers
    }

    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    /// Samples consumed by one `compute` call
    pub fn chunk_len(&self) -> usize {
        self.size * self.buffers
    }

    /// `20·log10(size · 2^15)`, subtracted from every bin
    pub fn calibration_db(&self) -> f32 {
        self.calibration_db
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Sub-buffers rejected since construction
    pub fn rejected_count(&self) -> u64 {
        self.rejected_count
    }

    /// True if any sub-buffer was rejected since the indicator was last taken
    pub fn clip_indicator(&self) -> bool {
        self.clip_indicator
    }

    /// Read and clear the clip indicator
    pub fn take_clip_indicator(&mut self) -> bool {
        std::mem::take(&mut self.clip_indicator)
    }
}
