//! Sample source port trait

use crate::domain::{IqResult, IqSample};

/// Trait for anything that delivers I/Q sample chunks (sound card, RTL dongle, simulator)
///
/// Note: No `Send` bound — hardware streams are often tied to the thread that
/// opened them, so sources live on the acquisition thread.
pub trait SampleSource {
    /// Fill `chunk` completely with the next samples
    fn fill(&mut self, chunk: &mut [IqSample]) -> IqResult<()>;

    /// Sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Human-readable description for status displays and logs
    fn describe(&self) -> String;
}
