//! Sample decoding: interleaved 16-bit stereo PCM to complex I/Q
//!
//! Sound-card I/Q arrives as stereo frames `[L0, R0, L1, R1, ...]` with I on
//! the right channel and Q on the left.

use crate::domain::{IqFormat, IqSample};

/// Decode interleaved stereo frames into complex samples.
///
/// A trailing unpaired sample is ignored.
pub fn decode_pcm16(frames: &[i16], format: IqFormat) -> Vec<IqSample> {
    let pairs = frames.chunks_exact(2);
    let i_channel: Vec<f32> = pairs.clone().map(|p| p[1] as f32).collect();
    let mut q_channel: Vec<f32> = pairs.map(|p| p[0] as f32).collect();

    if format.lagfix {
        q_channel.rotate_right(1);
    }

    i_channel
        .into_iter()
        .zip(q_channel)
        .map(|(i, q)| {
            if format.rev_iq {
                IqSample::new(q, i)
            } else {
                IqSample::new(i, q)
            }
        })
        .collect()
}

/// Swap I and Q in place
pub fn reverse_iq(samples: &mut [IqSample]) {
    for s in samples.iter_mut() {
        *s = IqSample::new(s.im, s.re);
    }
}

/// Largest raw value seen on the I and Q channels, in that order.
/// Useful as an input level readout.
pub fn channel_peaks(frames: &[i16]) -> (i16, i16) {
    frames
        .chunks_exact(2)
        .fold((i16::MIN, i16::MIN), |(i_max, q_max), p| {
            (i_max.max(p[1]), q_max.max(p[0]))
        })
}
