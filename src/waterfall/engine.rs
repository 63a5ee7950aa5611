//! Waterfall engine: successive spectra in, scrolling palette-mapped raster out
//!
//! Every `accumulation` pushes the raster scrolls down one cell height and a
//! new row of cells is drawn across the top. The row is colored from the most
//! recent spectrum; the accumulator only paces the rows. `RowMode::Average`
//! colors the row from the accumulated mean instead.

use serde::{Deserialize, Serialize};

use super::palette::Palette;
use super::raster::Raster;
use crate::domain::{CellSize, DbRange, IqError, IqResult, PaletteKind, WF_LINES};

/// Which spectrum a new waterfall row is colored from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowMode {
    /// The last spectrum pushed before the row was emitted
    #[default]
    Latest,
    /// The mean of the `accumulation` spectra pushed since the previous row
    Average,
}

/// Waterfall construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallConfig {
    pub palette: PaletteKind,
    /// Initial (and reset) palette range
    pub range: DbRange,
    /// Number of distinct colors
    pub nsteps: usize,
    /// Pixel size of one bin-by-row cell
    pub cell: CellSize,
    /// Raster width in pixels
    pub width: usize,
    /// Rows of history; raster height is `lines * cell.height`
    pub lines: usize,
    /// Spectra per emitted row
    pub accumulation: usize,
    pub row_mode: RowMode,
}

impl WaterfallConfig {
    /// Rainbow palette, 50 colors, 50 lines, one row per spectrum
    pub fn new(range: DbRange, cell: CellSize, width: usize) -> Self {
        Self {
            palette: PaletteKind::Rainbow,
            range,
            nsteps: 50,
            cell,
            width,
            lines: WF_LINES,
            accumulation: 1,
            row_mode: RowMode::Latest,
        }
    }

    fn validate(&self) -> IqResult<()> {
        if self.palette == PaletteKind::Black {
            return Err(IqError::Config(
                "waterfall palette must be stepped or rainbow".into(),
            ));
        }
        if self.nsteps == 0 {
            return Err(IqError::Config("nsteps must be at least 1".into()));
        }
        if self.cell.width == 0 || self.cell.height == 0 {
            return Err(IqError::Config(format!(
                "cell size must be at least 1x1, got {}x{}",
                self.cell.width, self.cell.height
            )));
        }
        if self.width == 0 || self.lines == 0 {
            return Err(IqError::Config("waterfall raster must not be empty".into()));
        }
        if self.accumulation == 0 {
            return Err(IqError::Config("accumulation must be at least 1".into()));
        }
        Ok(())
    }
}

/// Shape captured from the first spectrum
#[derive(Debug, Clone)]
struct Geometry {
    datasize: usize,
    dx: f32,
    accumulator: Vec<f32>,
    count: usize,
}

#[derive(Debug, Clone)]
enum State {
    Uninitialized,
    Active(Geometry),
}

/// Scrolling spectral history
pub struct WaterfallEngine {
    config: WaterfallConfig,
    range: DbRange,
    palette: Palette,
    raster: Raster,
    state: State,
    rows_drawn: u64,
}

impl WaterfallEngine {
    pub fn new(config: WaterfallConfig) -> IqResult<Self> {
        config.validate()?;
        let range = config.range;
        let palette = Palette::build(config.palette, range, config.nsteps);
        let raster = Raster::new(config.width, config.lines * config.cell.height);

        log::debug!(
            "waterfall: {}x{} px, cell {}x{}, {:?} palette {} steps over [{}, {}] dB, {} spectra/row",
            raster.width(),
            raster.height(),
            config.cell.width,
            config.cell.height,
            config.palette,
            config.nsteps,
            range.min,
            range.max,
            config.accumulation
        );

        Ok(Self {
            config,
            range,
            palette,
            raster,
            state: State::Uninitialized,
            rows_drawn: 0,
        })
    }

    /// Add one spectrum. Returns true if a new row was drawn.
    ///
    /// # Panics
    ///
    /// If `spectrum` is empty, or its length differs from the first spectrum
    /// pushed. The spectrum length is fixed for the life of the engine.
    pub fn push(&mut self, spectrum: &[f32]) -> bool {
        if let State::Uninitialized = self.state {
            assert!(!spectrum.is_empty(), "waterfall spectrum must not be empty");
            let datasize = spectrum.len();
            self.state = State::Active(Geometry {
                datasize,
                dx: self.raster.width() as f32 / datasize as f32,
                accumulator: vec![0.0; datasize],
                count: 0,
            });
            log::debug!("waterfall locked to {datasize} bins");
        }
        let State::Active(geometry) = &mut self.state else {
            unreachable!("waterfall state is active after first push");
        };

        assert_eq!(
            spectrum.len(),
            geometry.datasize,
            "waterfall spectrum length changed"
        );

        for (acc, &v) in geometry.accumulator.iter_mut().zip(spectrum) {
            *acc += v;
        }
        geometry.count += 1;
        if geometry.count % self.config.accumulation != 0 {
            return false;
        }

        let cell = self.config.cell;
        self.raster.scroll_down(cell.height);

        let mean_scale = 1.0 / geometry.count as f32;
        for ix in 0..geometry.datasize {
            let value = match self.config.row_mode {
                RowMode::Latest => spectrum[ix],
                RowMode::Average => geometry.accumulator[ix] * mean_scale,
            };
            let color = self.palette.color(value);
            let x = (ix as f32 * geometry.dx) as usize;
            self.raster.fill_rect(x, 0, cell.width, cell.height, color);
        }

        geometry.accumulator.fill(0.0);
        geometry.count = 0;
        self.rows_drawn += 1;
        true
    }

    /// Replace the palette range and rebuild the palette from scratch
    pub fn set_range(&mut self, vmin: f32, vmax: f32) -> IqResult<()> {
        let range = DbRange::new(vmin, vmax)?;
        self.apply_range(range);
        Ok(())
    }

    /// Restore the construction-time range. Returns `(vmin, vmax)`.
    pub fn reset_range(&mut self) -> (f32, f32) {
        let range = self.config.range;
        self.apply_range(range);
        (range.min, range.max)
    }

    fn apply_range(&mut self, range: DbRange) {
        self.range = range;
        self.palette = Palette::build(self.config.palette, range, self.config.nsteps);
        log::debug!("waterfall palette rebuilt for [{}, {}] dB", range.min, range.max);
    }

    /// Palette step a dB value maps to under the active range
    pub fn palette_index(&self, value: f32) -> usize {
        self.palette.index(value)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn range(&self) -> DbRange {
        self.range
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn config(&self) -> &WaterfallConfig {
        &self.config
    }

    /// Rows drawn since construction
    pub fn rows_drawn(&self) -> u64 {
        self.rows_drawn
    }

    /// Spectrum length, once the first spectrum has been pushed
    pub fn datasize(&self) -> Option<usize> {
        match &self.state {
            State::Uninitialized => None,
            State::Active(geometry) => Some(geometry.datasize),
        }
    }

    /// Spectra pushed toward the next row
    pub fn pending(&self) -> usize {
        match &self.state {
            State::Uninitialized => 0,
            State::Active(geometry) => geometry.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rgb;

    fn config(accumulation: usize) -> WaterfallConfig {
        WaterfallConfig {
            palette: PaletteKind::Stepped,
            range: DbRange::new(-100.0, 0.0).unwrap(),
            nsteps: 10,
            cell: CellSize::new(2, 1),
            width: 8,
            lines: 4,
            accumulation,
            row_mode: RowMode::Latest,
        }
    }

    #[test]
    fn new_rejects_bad_config() {
        let mut bad = config(1);
        bad.palette = PaletteKind::Black;
        assert!(WaterfallEngine::new(bad).is_err());

        let mut bad = config(1);
        bad.nsteps = 0;
        assert!(WaterfallEngine::new(bad).is_err());

        let mut bad = config(1);
        bad.cell = CellSize::new(0, 1);
        assert!(WaterfallEngine::new(bad).is_err());

        assert!(WaterfallEngine::new(config(0)).is_err());
    }

    #[test]
    fn starts_uninitialized_and_locks_shape_on_first_push() {
        let mut wf = WaterfallEngine::new(config(3)).unwrap();
        assert_eq!(wf.datasize(), None);
        assert_eq!(wf.raster().height(), 4);

        assert!(!wf.push(&[-50.0; 4]));
        assert_eq!(wf.datasize(), Some(4));
        assert_eq!(wf.pending(), 1);
    }

    #[test]
    fn row_is_drawn_every_accumulation_pushes() {
        let mut wf = WaterfallEngine::new(config(3)).unwrap();
        let drawn: Vec<bool> = (0..7).map(|_| wf.push(&[-50.0; 4])).collect();
        assert_eq!(drawn, vec![false, false, true, false, false, true, false]);
        assert_eq!(wf.rows_drawn(), 2);
        assert_eq!(wf.pending(), 1);
    }

    #[test]
    fn row_uses_latest_spectrum_not_accumulated_sum() {
        let mut wf = WaterfallEngine::new(config(2)).unwrap();
        wf.push(&[-100.0, -100.0, -100.0, -100.0]);
        wf.push(&[0.0, 0.0, 0.0, 0.0]);

        // sum is -100 (step 0) but the row shows the last spectrum (step 9)
        let top = wf.palette().colors()[9];
        assert_ne!(top, wf.palette().colors()[0]);
        assert!(wf.raster().row(0).iter().all(|&p| p == top));
    }

    #[test]
    fn average_mode_colors_row_from_mean() {
        let mut cfg = config(2);
        cfg.row_mode = RowMode::Average;
        let mut wf = WaterfallEngine::new(cfg).unwrap();
        wf.push(&[0.0; 4]);
        wf.push(&[-100.0; 4]);

        // mean is -50 dB → step 5
        let expected = wf.palette().colors()[5];
        assert!(wf.raster().row(0).iter().all(|&p| p == expected));
    }

    #[test]
    fn cells_are_placed_at_bin_x_positions() {
        let mut wf = WaterfallEngine::new(config(1)).unwrap();
        wf.push(&[-100.0, 0.0, -100.0, 0.0]);

        let lo = wf.palette().colors()[0];
        let hi = wf.palette().colors()[9];
        assert_eq!(wf.raster().row(0), &[lo, lo, hi, hi, lo, lo, hi, hi]);
        // older rows untouched
        assert_eq!(wf.raster().row(1), &[Rgb::BLACK; 8]);
    }

    #[test]
    fn older_rows_scroll_down() {
        let mut wf = WaterfallEngine::new(config(1)).unwrap();
        wf.push(&[0.0; 4]);
        wf.push(&[-100.0; 4]);

        let lo = wf.palette().colors()[0];
        let hi = wf.palette().colors()[9];
        assert!(wf.raster().row(0).iter().all(|&p| p == lo));
        assert!(wf.raster().row(1).iter().all(|&p| p == hi));
    }

    #[test]
    #[should_panic(expected = "waterfall spectrum length changed")]
    fn spectrum_length_cannot_change() {
        let mut wf = WaterfallEngine::new(config(1)).unwrap();
        wf.push(&[0.0; 4]);
        wf.push(&[0.0; 5]);
    }

    #[test]
    fn set_range_rejects_inverted_bounds() {
        let mut wf = WaterfallEngine::new(config(1)).unwrap();
        assert!(wf.set_range(-20.0, -80.0).is_err());
        assert_eq!(wf.range(), DbRange::new(-100.0, 0.0).unwrap());
    }

    #[test]
    fn set_range_twice_matches_once() {
        let mut once = WaterfallEngine::new(config(1)).unwrap();
        once.set_range(-90.0, -30.0).unwrap();

        let mut twice = WaterfallEngine::new(config(1)).unwrap();
        twice.set_range(-90.0, -30.0).unwrap();
        twice.set_range(-90.0, -30.0).unwrap();

        assert_eq!(once.palette(), twice.palette());
    }

    #[test]
    fn reset_range_restores_construction_palette() {
        let mut wf = WaterfallEngine::new(config(1)).unwrap();
        let original = wf.palette().clone();

        wf.set_range(-70.0, -40.0).unwrap();
        assert_ne!(wf.palette(), &original);

        assert_eq!(wf.reset_range(), (-100.0, 0.0));
        assert_eq!(wf.palette(), &original);
        assert_eq!(wf.range(), original.range());
    }
}
