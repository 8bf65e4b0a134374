//! Tempo-synced feedback delay.
//!
//! The delay length follows the host tempo at a fixed eighth-note
//! division and is recomputed once per block by the engine. Feedback is
//! fixed at 50%; the wet/dry mix is the only parameter.

use libm::ceilf;
use muestra_core::{DEFAULT_BPM, DelayLine, Effect, SmoothedParam};
use muestra_core::{eighth_note_samples, flush_denormal, wet_dry_mix};

/// Feedback applied to the recirculated signal.
const FEEDBACK: f32 = 0.5;
/// Ring buffer headroom; an eighth note at the floored minimum tempo of
/// 30 BPM is one second.
const MAX_DELAY_SECONDS: f32 = 2.0;

/// Per-channel circular-buffer delay with tempo-derived length.
///
/// Each sample: pop the delayed sample, push `input + feedback * delayed`,
/// and output `dry * (1 - mix) + delayed * mix`.
///
/// # Example
///
/// ```rust
/// use muestra_core::Effect;
/// use muestra_effects::TempoDelay;
///
/// let mut delay = TempoDelay::new(48_000.0);
/// delay.set_tempo(Some(120.0));
/// assert!((delay.delay_samples() - 12_000.0).abs() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct TempoDelay {
    line_l: DelayLine,
    line_r: DelayLine,
    delay_samples: f32,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl TempoDelay {
    /// Create a delay at the given sample rate, synced to the default
    /// 120 BPM until a tempo arrives.
    pub fn new(sample_rate: f32) -> Self {
        let capacity = ceilf(MAX_DELAY_SECONDS * sample_rate) as usize;
        Self {
            line_l: DelayLine::new(capacity),
            line_r: DelayLine::new(capacity),
            delay_samples: eighth_note_samples(DEFAULT_BPM, sample_rate),
            mix: SmoothedParam::with_config(0.0, sample_rate, 10.0),
            sample_rate,
        }
    }

    /// Recompute the delay length from the host tempo. `None` means the
    /// host supplied no tempo and falls back to 120 BPM.
    pub fn set_tempo(&mut self, bpm: Option<f64>) {
        let bpm = bpm.unwrap_or(DEFAULT_BPM);
        let samples = eighth_note_samples(bpm, self.sample_rate);
        self.delay_samples = samples.min((self.line_l.capacity() - 1) as f32);
    }

    /// Current delay length in samples.
    pub fn delay_samples(&self) -> f32 {
        self.delay_samples
    }

    /// Set wet/dry mix (0 = dry, 1 = fully wet).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Current mix target.
    pub fn mix(&self) -> f32 {
        self.mix.target()
    }
}

impl Effect for TempoDelay {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mix = self.mix.advance();

        let delayed_l = self.line_l.read(self.delay_samples);
        let delayed_r = self.line_r.read(self.delay_samples);

        self.line_l
            .write(flush_denormal(left + FEEDBACK * delayed_l));
        self.line_r
            .write(flush_denormal(right + FEEDBACK * delayed_r));

        (
            wet_dry_mix(left, delayed_l, mix),
            wet_dry_mix(right, delayed_r, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let capacity = ceilf(MAX_DELAY_SECONDS * sample_rate) as usize;
        self.sample_rate = sample_rate;
        self.line_l = DelayLine::new(capacity);
        self.line_r = DelayLine::new(capacity);
        self.delay_samples = self
            .delay_samples
            .min((capacity - 1) as f32);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.mix.snap_to_target();
    }
}
