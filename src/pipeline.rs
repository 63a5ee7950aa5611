//! Per-frame spectrum pipeline
//!
//! Owns the spectrum and waterfall engines plus the operator-adjustable display
//! levels, and drives them in the fixed order compute → push once per frame.
//! Everything here runs on the render thread; nothing is shared.

use crate::domain::{
    CellSize, DbRange, DisplayGeometry, IqFormat, IqResult, IqSample, Level, LevelLimits,
    Options,
};
use crate::dsp::{decode_pcm16, reverse_iq, SpectrumEngine, SpectrumFrame};
use crate::ports::SampleSource;
use crate::waterfall::{RowMode, WaterfallConfig, WaterfallEngine};

/// Number of distinct waterfall colors
const WATERFALL_STEPS: usize = 50;

/// Spectrum + waterfall, driven by the render loop
pub struct SpectrumPipeline {
    spectrum: SpectrumEngine,
    waterfall: Option<WaterfallEngine>,
    iq_format: IqFormat,
    display_offset_db: f32,
    spectrum_scale: DbRange,
    default_scale: DbRange,
    chunk: Vec<IqSample>,
    // I/Q-swapped copy of a borrowed chunk
    swapped: Vec<IqSample>,
}

impl SpectrumPipeline {
    /// Build both engines from validated options.
    ///
    /// The transform size is reduced if the display is too narrow to give
    /// every bin a pixel.
    pub fn new(options: &Options, display: DisplayGeometry) -> IqResult<Self> {
        Self::with_row_mode(options, display, RowMode::Latest)
    }

    pub fn with_row_mode(
        options: &Options,
        display: DisplayGeometry,
        row_mode: RowMode,
    ) -> IqResult<Self> {
        options.validate()?;
        let mut options = options.clone();
        let size = options.fit_to_display(display.width)?;

        let spectrum = SpectrumEngine::new(size, options.buffers, options.pulse)?;

        let waterfall = if options.waterfall {
            let config = WaterfallConfig {
                palette: options.palette_kind()?,
                range: options.waterfall_range()?,
                nsteps: WATERFALL_STEPS,
                cell: CellSize::fit(display.width, display.waterfall_height, size, display.lines),
                width: display.width,
                lines: display.lines,
                accumulation: options.waterfall_accumulation,
                row_mode,
            };
            Some(WaterfallEngine::new(config)?)
        } else {
            None
        };

        let scale = options.spectrum_scale()?;
        log::info!(
            "pipeline '{}': {} Hz, {} x {} samples/frame ({:.1} ms), {:.1} Hz/bin",
            options.name,
            options.sample_rate,
            options.buffers,
            size,
            options.chunk_time() * 1000.0,
            options.bin_width_hz()
        );

        Ok(Self {
            chunk: vec![IqSample::new(0.0, 0.0); spectrum.chunk_len()],
            swapped: Vec::new(),
            spectrum,
            waterfall,
            iq_format: options.iq_format(),
            display_offset_db: options.source.display_offset_db(),
            spectrum_scale: scale,
            default_scale: scale,
        })
    }

    /// Compute one spectrum, lift it by the source's display offset and feed
    /// it to the waterfall. I and Q are swapped first when `rev_iq` is set.
    pub fn process(&mut self, chunk: &[IqSample]) -> SpectrumFrame {
        let frame = if self.iq_format.rev_iq {
            let mut swapped = std::mem::take(&mut self.swapped);
            swapped.clear();
            swapped.extend_from_slice(chunk);
            reverse_iq(&mut swapped);
            let frame = self.spectrum.compute(&swapped);
            self.swapped = swapped;
            frame
        } else {
            self.spectrum.compute(chunk)
        };
        self.publish(frame)
    }

    /// Decode interleaved stereo PCM with the configured `rev_iq` and
    /// `lagfix` fixes, then process it like any other chunk.
    pub fn process_pcm(&mut self, frames: &[i16]) -> SpectrumFrame {
        let chunk = decode_pcm16(frames, self.iq_format);
        let frame = self.spectrum.compute(&chunk);
        self.publish(frame)
    }

    fn publish(&mut self, mut frame: SpectrumFrame) -> SpectrumFrame {
        if self.display_offset_db != 0.0 {
            for v in frame.log_power.iter_mut() {
                *v += self.display_offset_db;
            }
        }
        if let Some(waterfall) = self.waterfall.as_mut() {
            waterfall.push(&frame.log_power);
        }
        frame
    }

    /// Pull one chunk from `source` and process it
    pub fn run_frame(&mut self, source: &mut dyn SampleSource) -> IqResult<SpectrumFrame> {
        let mut chunk = std::mem::take(&mut self.chunk);
        let filled = source.fill(&mut chunk);
        let frame = filled.map(|()| self.process(&chunk));
        self.chunk = chunk;
        frame
    }

    /// Step the 2-D spectrum scale. Returns true if it changed.
    pub fn adjust_spectrum_scale(&mut self, level: Level) -> bool {
        self.spectrum_scale.step(level, &LevelLimits::SPECTRUM)
    }

    /// Step the waterfall palette range and rebuild the palette if it moved.
    /// Without a waterfall this is a no-op returning false.
    pub fn adjust_waterfall(&mut self, level: Level) -> IqResult<bool> {
        let Some(waterfall) = self.waterfall.as_mut() else {
            return Ok(false);
        };
        let mut range = waterfall.range();
        if !range.step(level, &LevelLimits::WATERFALL) {
            return Ok(false);
        }
        waterfall.set_range(range.min, range.max)?;
        Ok(true)
    }

    /// Restore the configured spectrum scale and waterfall range
    pub fn reset_levels(&mut self) -> (DbRange, Option<DbRange>) {
        self.spectrum_scale = self.default_scale;
        let waterfall_range = self.waterfall.as_mut().map(|wf| {
            wf.reset_range();
            wf.range()
        });
        (self.spectrum_scale, waterfall_range)
    }

    pub fn iq_format(&self) -> IqFormat {
        self.iq_format
    }

    pub fn spectrum(&self) -> &SpectrumEngine {
        &self.spectrum
    }

    pub fn waterfall(&self) -> Option<&WaterfallEngine> {
        self.waterfall.as_ref()
    }

    /// Current vertical scale for the 2-D spectrum display
    pub fn spectrum_scale(&self) -> DbRange {
        self.spectrum_scale
    }

    /// Samples the pipeline consumes per frame
    pub fn chunk_len(&self) -> usize {
        self.spectrum.chunk_len()
    }

    /// Read and clear the pulse-clip indicator
    pub fn take_clip_indicator(&mut self) -> bool {
        self.spectrum.take_clip_indicator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedSource;
    use crate::domain::{IqError, SourceKind};

    fn small_options() -> Options {
        Options {
            size: 256,
            buffers: 2,
            waterfall_accumulation: 2,
            ..Options::default()
        }
    }

    #[test]
    fn new_validates_options() {
        let bad = Options { waterfall_palette: 7, ..Options::default() };
        assert!(matches!(
            SpectrumPipeline::new(&bad, DisplayGeometry::default()),
            Err(IqError::InvalidPalette(7))
        ));
    }

    #[test]
    fn size_is_fitted_to_display() {
        let options = Options { size: 2048, ..Options::default() };
        let pipeline = SpectrumPipeline::new(&options, DisplayGeometry::default()).unwrap();
        assert_eq!(pipeline.spectrum().size(), 512);
        assert_eq!(pipeline.chunk_len(), 512 * options.buffers);
    }

    #[test]
    fn waterfall_is_optional() {
        let options = Options { waterfall: false, ..small_options() };
        let mut pipeline = SpectrumPipeline::new(&options, DisplayGeometry::default()).unwrap();
        assert!(pipeline.waterfall().is_none());
        assert!(!pipeline.adjust_waterfall(Level::RaiseMin).unwrap());
        assert_eq!(pipeline.reset_levels().1, None);
    }

    #[test]
    fn rtl_source_lifts_spectrum_sixty_db() {
        let audio = small_options();
        let rtl = Options { source: SourceKind::Rtl, ..small_options() };
        let mut a = SpectrumPipeline::new(&audio, DisplayGeometry::default()).unwrap();
        let mut r = SpectrumPipeline::new(&rtl, DisplayGeometry::default()).unwrap();

        let chunk = vec![IqSample::new(0.0, 0.0); a.chunk_len()];
        let fa = a.process(&chunk);
        let fr = r.process(&chunk);
        assert!((fr.log_power[0] - fa.log_power[0] - 60.0).abs() < 1e-3);
    }

    #[test]
    fn run_frame_feeds_waterfall_from_source() {
        let mut pipeline = SpectrumPipeline::new(&small_options(), DisplayGeometry::default()).unwrap();
        let mut source = SimulatedSource::new(48000, 3)
            .with_tone(3000.0, 1000.0)
            .with_noise(5.0)
            .unwrap();

        for _ in 0..4 {
            let frame = pipeline.run_frame(&mut source).unwrap();
            assert_eq!(frame.log_power.len(), 256);
        }
        assert_eq!(pipeline.waterfall().unwrap().rows_drawn(), 2);
    }

    #[test]
    fn waterfall_adjust_and_reset() {
        let mut pipeline = SpectrumPipeline::new(&small_options(), DisplayGeometry::default()).unwrap();
        assert!(pipeline.adjust_waterfall(Level::RaiseMin).unwrap());
        assert_eq!(pipeline.waterfall().unwrap().range().min, -110.0);

        assert!(pipeline.adjust_spectrum_scale(Level::LowerMax));
        assert_eq!(pipeline.spectrum_scale().max, -30.0);

        let (scale, wf) = pipeline.reset_levels();
        assert_eq!(scale, DbRange::new(-120.0, -20.0).unwrap());
        assert_eq!(wf, Some(DbRange::new(-120.0, -20.0).unwrap()));
    }

    fn tone_peak(options: &Options) -> usize {
        let mut pipeline = SpectrumPipeline::new(options, DisplayGeometry::default()).unwrap();
        // 10 bins above center at 187.5 Hz/bin
        let mut source = SimulatedSource::new(48000, 11)
            .with_tone(10.0 * 187.5, 2000.0)
            .with_noise(2.0)
            .unwrap();
        pipeline.run_frame(&mut source).unwrap().peak().unwrap().0
    }

    #[test]
    fn rev_iq_mirrors_source_spectrum() {
        assert_eq!(tone_peak(&small_options()), 128 + 10);
        let reversed = Options { rev_iq: true, ..small_options() };
        assert_eq!(tone_peak(&reversed), 128 - 10);
    }

    /// Stereo frames `[Q, I]` of a tone `k` bins above center
    fn pcm_tone(size: usize, frames: usize, k: usize) -> Vec<i16> {
        (0..frames)
            .flat_map(|n| {
                let phase = 2.0 * std::f32::consts::PI * (k * n % size) as f32 / size as f32;
                [(4000.0 * phase.sin()) as i16, (4000.0 * phase.cos()) as i16]
            })
            .collect()
    }

    #[test]
    fn pcm_input_honors_rev_iq_once() {
        let plain = small_options();
        let mut pipeline = SpectrumPipeline::new(&plain, DisplayGeometry::default()).unwrap();
        let frames = pcm_tone(256, pipeline.chunk_len(), 20);
        assert_eq!(pipeline.process_pcm(&frames).peak().unwrap().0, 128 + 20);

        let reversed = Options { rev_iq: true, ..small_options() };
        let mut pipeline = SpectrumPipeline::new(&reversed, DisplayGeometry::default()).unwrap();
        assert!(pipeline.iq_format().rev_iq);
        assert_eq!(pipeline.process_pcm(&frames).peak().unwrap().0, 128 - 20);
    }

    #[test]
    fn lagfix_reaches_pcm_decoding() {
        let options = Options { lagfix: true, ..small_options() };
        let mut pipeline = SpectrumPipeline::new(&options, DisplayGeometry::default()).unwrap();
        assert!(pipeline.iq_format().lagfix);

        let frames = pcm_tone(256, pipeline.chunk_len(), 20);
        let fixed = pipeline.process_pcm(&frames);
        let mut plain = SpectrumPipeline::new(&small_options(), DisplayGeometry::default()).unwrap();
        let unfixed = plain.process_pcm(&frames);
        assert_ne!(fixed.log_power, unfixed.log_power);
    }

    #[test]
    fn clip_indicator_is_consumed_once() {
        let mut pipeline = SpectrumPipeline::new(&small_options(), DisplayGeometry::default()).unwrap();
        let chunk = vec![IqSample::new(0.0, 0.0); pipeline.chunk_len()];
        pipeline.process(&chunk);
        assert!(pipeline.take_clip_indicator());
        assert!(!pipeline.take_clip_indicator());
    }
}
