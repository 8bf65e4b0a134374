//! One-pole parameter smoothing.
//!
//! Host automation and UI writes land between blocks as step changes;
//! applying them directly produces audible zipper noise. [`SmoothedParam`]
//! moves the effective value toward its target with a one-pole lowpass,
//! advanced once per sample on the render path.

use libm::expf;

/// A parameter value with exponential smoothing toward a target.
///
/// # Example
///
/// ```rust
/// use muestra_core::SmoothedParam;
///
/// let mut mix = SmoothedParam::with_config(0.0, 48_000.0, 10.0);
/// mix.set_target(1.0);
/// for _ in 0..4_800 {
///     mix.advance();
/// }
/// assert!(mix.get() > 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// One-pole coefficient; 1.0 means instant.
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create an unsmoothed parameter (instant changes) at the given value.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48_000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a parameter with sample rate and smoothing time configured.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Set the value the parameter smooths toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and current value at once, skipping the smoothing ramp.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate and recompute the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set the smoothing time constant in milliseconds. Zero disables
    /// smoothing entirely.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump the current value to the target. Used by `reset` paths so a
    /// stream restart does not replay an old ramp.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    // coeff = 1 - exp(-1 / (tau * sample_rate)), tau in seconds. After one
    // time constant the value has covered ~63.2% of the distance to the
    // target; after five it is settled for audio purposes.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples_per_tau = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples_per_tau);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
