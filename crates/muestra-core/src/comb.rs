//! Damped feedback comb filter.
//!
//! The parallel-comb stage of a Freeverb-style reverb. The feedback path
//! runs through a one-pole lowpass so high frequencies decay faster than
//! lows, like air absorption in a room.

use crate::DelayLine;
use crate::flush_denormal;

/// Comb filter with lowpass-damped feedback.
///
/// The delay line is sized to exactly the comb's tuning; the tap always
/// reads at full capacity.
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: DelayLine,
    feedback: f32,
    damp1: f32,
    damp2: f32,
    filter_store: f32,
}

impl CombFilter {
    /// Create a comb with the given tuning in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples),
            feedback: 0.5,
            damp1: 0.5,
            damp2: 0.5,
            filter_store: 0.0,
        }
    }

    /// Set feedback (0.0 to 0.99). Higher values give longer decay; values
    /// at 1.0 and above never decay, so the setter clamps below that.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Set damping (0.0 = bright, 1.0 = dark).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp.clamp(0.0, 1.0);
        self.damp2 = 1.0 - self.damp1;
    }

    /// Process one sample. Output is the delayed signal; the input plus the
    /// damped, scaled feedback goes back into the line.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.delay.read_max();
        self.filter_store = flush_denormal(output * self.damp2 + self.filter_store * self.damp1);
        self.delay.write(input + self.filter_store * self.feedback);
        output
    }

    /// Clear delay contents and the damping filter memory.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.filter_store = 0.0;
    }
}
