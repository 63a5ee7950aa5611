//! Time-domain sample statistics used by pulse rejection

use crate::domain::IqSample;

/// Median of `|x|` over `samples`.
///
/// For an even count this is the mean of the two middle magnitudes.
/// An empty slice has median 0.
pub fn median_magnitude(samples: &[IqSample]) -> f32 {
    let mut mags: Vec<f32> = samples.iter().map(|s| s.norm()).collect();
    let n = mags.len();
    if n == 0 {
        return 0.0;
    }
    mags.sort_unstable_by(f32::total_cmp);
    if n % 2 == 1 {
        mags[n / 2]
    } else {
        0.5 * (mags[n / 2 - 1] + mags[n / 2])
    }
}

/// Subtract the complex mean from every sample in place
pub fn remove_dc(samples: &mut [IqSample]) {
    if samples.is_empty() {
        return;
    }
    let sum: IqSample = samples.iter().sum();
    let mean = sum / samples.len() as f32;
    for s in samples.iter_mut() {
        *s -= mean;
    }
}

/// Largest `|x|` in `samples` (0 for an empty slice).
///
/// NaN if any sample is NaN, so a corrupt sub-buffer never passes a
/// threshold comparison.
pub fn max_magnitude(samples: &[IqSample]) -> f32 {
    samples.iter().map(|s| s.norm()).fold(0.0, |peak, m| {
        if peak.is_nan() || m.is_nan() {
            f32::NAN
        } else {
            peak.max(m)
        }
    })
}
