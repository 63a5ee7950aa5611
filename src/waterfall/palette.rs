//! dB → color mapping and the precomputed waterfall palette

use std::f32::consts::PI;

use crate::domain::{DbRange, PaletteKind, Rgb};

/// Map a dB value to a color.
///
/// The value is normalized over `[vmin, vmax]` and then doubled, so the full
/// color sweep covers the lower half of the range and everything above the
/// midpoint saturates. Weak signals get the contrast.
pub fn palette_color(kind: PaletteKind, value: f32, vmin: f32, vmax: f32) -> Rgb {
    let f = ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0);
    let f = (2.0 * f).clamp(0.0, 1.0);

    let (r, g, b) = match kind {
        PaletteKind::Black => return Rgb::BLACK,
        PaletteKind::Stepped => {
            if f < 0.333 {
                (f * 255.0 * 3.0, 0.0, 0.0)
            } else if f < 0.666 {
                (200.0, (f - 0.333) * 255.0 * 3.0, 0.0)
            } else {
                (200.0, 200.0, (f - 0.666) * 255.0 * 3.0)
            }
        }
        PaletteKind::Rainbow => {
            let bright = (f + 0.15).min(1.0);
            let tpi = 2.0 * PI;
            (
                bright * 128.0 * (1.0 + (tpi * f).cos()),
                bright * 128.0 * (1.0 + (tpi * f + tpi / 3.0).cos()),
                bright * 128.0 * (1.0 + (tpi * f + 2.0 * tpi / 3.0).cos()),
            )
        }
    };

    Rgb::new(channel(r), channel(g), channel(b))
}

/// Clamp to [0, 255] and truncate
fn channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// `nsteps` colors evenly spanning a dB range.
///
/// Built once per range; a new range means a new palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    kind: PaletteKind,
    range: DbRange,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Step `i` takes the color of `vmin + i·(vmax − vmin)/nsteps`
    pub fn build(kind: PaletteKind, range: DbRange, nsteps: usize) -> Self {
        let step = range.span() / nsteps as f32;
        let colors = (0..nsteps)
            .map(|i| {
                let val = i as f32 * step + range.min;
                palette_color(kind, val, range.min, range.max)
            })
            .collect();
        Self { kind, range, colors }
    }

    /// Palette step for a dB value: `floor(nsteps·(v − vmin)/(vmax − vmin))`
    /// clamped to `[0, nsteps − 1]`. NaN maps to step 0.
    pub fn index(&self, value: f32) -> usize {
        let nsteps = self.colors.len();
        let scaled = (nsteps as f32 * (value - self.range.min) / self.range.span()).floor();
        if scaled.is_nan() || scaled < 0.0 {
            0
        } else {
            (scaled as usize).min(nsteps - 1)
        }
    }

    pub fn color(&self, value: f32) -> Rgb {
        self.colors[self.index(value)]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    pub fn range(&self) -> DbRange {
        self.range
    }

    pub fn nsteps(&self) -> usize {
        self.colors.len()
    }
}
