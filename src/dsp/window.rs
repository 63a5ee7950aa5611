//! Hann window

use std::f32::consts::PI;

/// Symmetric Hann window: `w[i] = 0.5 * (1 - cos(2πi / (n - 1)))`
///
/// Both endpoints are zero and the peak of 1.0 sits at the center.
/// A one-point window is `[1.0]`.
pub fn hann(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![1.0];
    }
    let denom = (n - 1) as f32;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
        .collect()
}
