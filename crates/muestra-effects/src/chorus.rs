//! Stereo chorus with quadrature LFO taps.
//!
//! One modulated delay tap per channel, with the two LFOs 90 degrees
//! apart for stereo movement. Rate, depth and centre delay are fixed at
//! the classic settings; only the wet/dry mix is a parameter. LFO phase
//! persists across blocks and is cleared only on stream restart.

use libm::ceilf;
use muestra_core::{DelayLine, Effect, Lfo, SmoothedParam, wet_dry_mix};

/// LFO rate in Hz.
const RATE_HZ: f32 = 1.0;
/// Modulation depth, 0 to 1 of the full swing.
const DEPTH: f32 = 0.5;
/// Centre tap delay in milliseconds.
const CENTRE_DELAY_MS: f32 = 7.0;
/// Maximum modulation swing around the centre, in milliseconds.
const MAX_SWING_MS: f32 = 5.0;

/// Dual-tap chorus with fixed modulation settings and a mix control.
///
/// # Example
///
/// ```rust
/// use muestra_core::Effect;
/// use muestra_effects::Chorus;
///
/// let mut chorus = Chorus::new(48_000.0);
/// chorus.set_mix(0.5);
/// let (l, r) = chorus.process_stereo(0.2, 0.2);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Chorus {
    tap_l: DelayLine,
    tap_r: DelayLine,
    lfo_l: Lfo,
    lfo_r: Lfo,
    centre_samples: f32,
    swing_samples: f32,
    mix: SmoothedParam,
}

impl Chorus {
    /// Create a chorus at the given sample rate with the mix at zero.
    pub fn new(sample_rate: f32) -> Self {
        let centre_samples = CENTRE_DELAY_MS / 1000.0 * sample_rate;
        let swing_samples = MAX_SWING_MS / 1000.0 * sample_rate;
        let capacity = ceilf((CENTRE_DELAY_MS + MAX_SWING_MS) / 1000.0 * sample_rate) as usize + 1;

        let lfo_l = Lfo::new(sample_rate, RATE_HZ);
        let mut lfo_r = Lfo::new(sample_rate, RATE_HZ);
        lfo_r.set_phase(0.25);

        Self {
            tap_l: DelayLine::new(capacity),
            tap_r: DelayLine::new(capacity),
            lfo_l,
            lfo_r,
            centre_samples,
            swing_samples,
            mix: SmoothedParam::with_config(0.0, sample_rate, 10.0),
        }
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

impl Effect for Chorus {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mix = self.mix.advance();

        let delay_l = self.centre_samples + self.lfo_l.advance() * DEPTH * self.swing_samples;
        let delay_r = self.centre_samples + self.lfo_r.advance() * DEPTH * self.swing_samples;

        let wet_l = self.tap_l.read(delay_l);
        let wet_r = self.tap_r.read(delay_r);

        self.tap_l.write(left);
        self.tap_r.write(right);

        (
            wet_dry_mix(left, wet_l, mix),
            wet_dry_mix(right, wet_r, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let capacity = ceilf((CENTRE_DELAY_MS + MAX_SWING_MS) / 1000.0 * sample_rate) as usize + 1;
        self.centre_samples = CENTRE_DELAY_MS / 1000.0 * sample_rate;
        self.swing_samples = MAX_SWING_MS / 1000.0 * sample_rate;
        self.tap_l = DelayLine::new(capacity);
        self.tap_r = DelayLine::new(capacity);
        self.lfo_l.set_sample_rate(sample_rate);
        self.lfo_r.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.tap_l.clear();
        self.tap_r.clear();
        self.lfo_l.reset();
        self.lfo_r.set_phase(0.25);
        self.mix.snap_to_target();
    }
}
