//! dB display ranges and the 10 dB stepping rules the operator uses to adjust them

use serde::{Deserialize, Serialize};

use super::error::{IqError, IqResult};

/// A displayed dB interval, `min < max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbRange {
    pub min: f32,
    pub max: f32,
}

impl DbRange {
    /// Create a range, rejecting empty, inverted or non-finite bounds
    pub fn new(min: f32, max: f32) -> IqResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(IqError::Config(format!(
                "dB range bounds must be finite (min={min}, max={max})"
            )));
        }
        if max <= min {
            return Err(IqError::Config(format!(
                "dB range max ({max}) must be greater than min ({min})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Apply one step of `level` under `limits`. Returns true if the range moved.
    pub fn step(&mut self, level: Level, limits: &LevelLimits) -> bool {
        let step = limits.step;
        match level {
            Level::RaiseMax if self.max < limits.max_ceiling => {
                self.max += step;
                true
            }
            Level::LowerMax if self.max > limits.max_floor && self.max > self.min + limits.min_gap => {
                self.max -= step;
                true
            }
            Level::RaiseMin if self.min < self.max - limits.min_gap => {
                self.min += step;
                true
            }
            Level::LowerMin if self.min > limits.min_floor => {
                self.min -= step;
                true
            }
            _ => false,
        }
    }
}

/// One operator adjustment of a dB range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    RaiseMax,
    LowerMax,
    RaiseMin,
    LowerMin,
}

/// Bounds that keep stepped ranges usable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelLimits {
    /// dB moved per step
    pub step: f32,
    /// Smallest gap `max - min` a lowering step may leave before it is refused
    pub min_gap: f32,
    /// `max` is only raised while below this
    pub max_ceiling: f32,
    /// `max` is only lowered while above this
    pub max_floor: f32,
    /// `min` is only lowered while above this
    pub min_floor: f32,
}

impl LevelLimits {
    /// Vertical scale of the 2-D spectrum display
    pub const SPECTRUM: LevelLimits = LevelLimits {
        step: 10.0,
        min_gap: 10.0,
        max_ceiling: 0.0,
        max_floor: -130.0,
        min_floor: -140.0,
    };

    /// Palette range of the waterfall
    pub const WATERFALL: LevelLimits = LevelLimits {
        step: 10.0,
        min_gap: 20.0,
        max_ceiling: -10.0,
        max_floor: f32::NEG_INFINITY,
        min_floor: -130.0,
    };
}
