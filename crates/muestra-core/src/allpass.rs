//! Schroeder allpass filter.
//!
//! Passes all frequencies at equal magnitude while smearing phase, which
//! turns the sparse output of the comb bank into a dense reverb tail.

use crate::DelayLine;
use crate::flush_denormal;

/// Allpass diffusion filter with a fixed-capacity delay tap.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: DelayLine,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with the given tuning in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples),
            feedback: 0.5,
        }
    }

    /// Set the feedback coefficient. Stable for |feedback| < 1.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample through the Schroeder structure:
    /// `output = delayed - input`, `line <- input + delayed * feedback`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read_max();
        self.delay
            .write(flush_denormal(input + delayed * self.feedback));
        delayed - input
    }

    /// Clear delay contents.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
