//! Simulated sample source for development and testing without hardware.
//!
//! Produces a complex tone plus Gaussian noise, an optional DC offset and
//! optional periodic impulses (ignition noise, lightning crashes). The noise
//! generator is seeded, so a given configuration always yields the same
//! samples.
//!
//! Construction is logged at INFO level:
//!
//!   RUST_LOG=iqscope_lib=info cargo test

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{IqError, IqResult, IqSample};
use crate::ports::SampleSource;

/// Deterministic synthetic I/Q source
pub struct SimulatedSource {
    sample_rate: u32,
    rng: StdRng,
    tone_freq_hz: f64,
    tone_amplitude: f32,
    phase: f64,
    noise: Option<Normal<f32>>,
    noise_std: f32,
    dc_offset: IqSample,
    impulse_every: usize,
    impulse_amplitude: f32,
    chunks: usize,
}

impl SimulatedSource {
    /// Silent source; add signal components with the `with_*` methods
    pub fn new(sample_rate: u32, seed: u64) -> Self {
        log::info!("[SIM SOURCE] Initialized at {sample_rate} Hz, seed={seed}");
        Self {
            sample_rate,
            rng: StdRng::seed_from_u64(seed),
            tone_freq_hz: 0.0,
            tone_amplitude: 0.0,
            phase: 0.0,
            noise: None,
            noise_std: 0.0,
            dc_offset: IqSample::new(0.0, 0.0),
            impulse_every: 0,
            impulse_amplitude: 0.0,
            chunks: 0,
        }
    }

    /// Complex tone at `freq_hz` (negative is below the center frequency)
    pub fn with_tone(mut self, freq_hz: f64, amplitude: f32) -> Self {
        log::info!("[SIM SOURCE] Tone {freq_hz:+.1} Hz, amplitude {amplitude}");
        self.tone_freq_hz = freq_hz;
        self.tone_amplitude = amplitude;
        self
    }

    /// Complex white Gaussian noise with RMS magnitude `std`
    pub fn with_noise(mut self, std: f32) -> IqResult<Self> {
        let per_component = std / std::f32::consts::SQRT_2;
        let normal = Normal::new(0.0, per_component)
            .map_err(|e| IqError::Config(format!("noise std {std}: {e}")))?;
        log::info!("[SIM SOURCE] Noise std {std}");
        self.noise = Some(normal);
        self.noise_std = std;
        Ok(self)
    }

    pub fn with_dc_offset(mut self, offset: IqSample) -> Self {
        self.dc_offset = offset;
        self
    }

    /// Put one real impulse of `amplitude` in the middle of every `every`-th chunk
    pub fn with_impulses(mut self, every: usize, amplitude: f32) -> Self {
        log::info!("[SIM SOURCE] Impulse {amplitude} every {every} chunks");
        self.impulse_every = every;
        self.impulse_amplitude = amplitude;
        self
    }

    /// Chunks delivered so far
    pub fn chunks_delivered(&self) -> usize {
        self.chunks
    }
}

impl SampleSource for SimulatedSource {
    fn fill(&mut self, chunk: &mut [IqSample]) -> IqResult<()> {
        let step = TAU * self.tone_freq_hz / self.sample_rate as f64;

        for sample in chunk.iter_mut() {
            let mut s = IqSample::from_polar(self.tone_amplitude, self.phase as f32);
            self.phase = (self.phase + step).rem_euclid(TAU);

            if let Some(noise) = &self.noise {
                s += IqSample::new(noise.sample(&mut self.rng), noise.sample(&mut self.rng));
            }
            *sample = s + self.dc_offset;
        }

        self.chunks += 1;
        if self.impulse_every > 0 && self.chunks % self.impulse_every == 0 && !chunk.is_empty() {
            let mid = chunk.len() / 2;
            chunk[mid] += IqSample::new(self.impulse_amplitude, 0.0);
        }
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn describe(&self) -> String {
        format!(
            "simulated {} Hz: tone {:+.1} Hz @ {}, noise {}",
            self.sample_rate, self.tone_freq_hz, self.tone_amplitude, self.noise_std
        )
    }
}
