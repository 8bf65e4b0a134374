//! Freeverb-style algorithmic reverb at fixed room settings.
//!
//! Eight parallel damped combs into four series allpasses per channel,
//! with the right-channel filters detuned by the classic 23-sample stereo
//! spread. Room size, damping, width and freeze are held at their
//! defaults; the only parameter is the wet/dry mix, applied as
//! `wet = mix`, `dry = 1 - mix`.

use muestra_core::{AllpassFilter, CombFilter, Effect, SmoothedParam};

/// Comb tunings at the 44.1 kHz reference rate. Mutually prime lengths
/// keep the modes from stacking into metallic resonances.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass tunings at the 44.1 kHz reference rate.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Right-channel offset in samples (at the reference rate).
const STEREO_SPREAD: usize = 23;

/// Reference sample rate for the tuning tables.
const REFERENCE_RATE: f32 = 44_100.0;

/// Fixed room parameters: the Freeverb defaults the engine holds.
const ROOM_SIZE: f32 = 0.5;
const DAMPING: f32 = 0.5;
const WIDTH: f32 = 1.0;

/// Input attenuation before the comb bank.
const FIXED_GAIN: f32 = 0.015;

/// Comb feedback and damping under the Freeverb control mappings, at the
/// fixed room settings above.
const COMB_FEEDBACK: f32 = ROOM_SIZE * 0.28 + 0.7;
const COMB_DAMP: f32 = DAMPING * 0.4;

/// Scale a reference-rate tuning to the target sample rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// Stereo Freeverb network with a mix control.
///
/// # Example
///
/// ```rust
/// use muestra_core::Effect;
/// use muestra_effects::StereoReverb;
///
/// let mut reverb = StereoReverb::new(48_000.0);
/// reverb.set_mix(0.4);
/// let (l, r) = reverb.process_stereo(0.5, 0.5);
/// assert!(l.is_finite() && r.is_finite());
/// ```
pub struct StereoReverb {
    combs_l: [CombFilter; 8],
    combs_r: [CombFilter; 8],
    allpasses_l: [AllpassFilter; 4],
    allpasses_r: [AllpassFilter; 4],
    mix: SmoothedParam,
}

impl StereoReverb {
    /// Create a reverb at the given sample rate with the mix at zero.
    pub fn new(sample_rate: f32) -> Self {
        let make_combs = |offset: usize| -> [CombFilter; 8] {
            core::array::from_fn(|i| {
                let mut comb = CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i] + offset, sample_rate));
                comb.set_feedback(COMB_FEEDBACK);
                comb.set_damp(COMB_DAMP);
                comb
            })
        };
        let make_allpasses = |offset: usize| -> [AllpassFilter; 4] {
            core::array::from_fn(|i| {
                let mut ap = AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i] + offset, sample_rate));
                ap.set_feedback(0.5);
                ap
            })
        };

        Self {
            combs_l: make_combs(0),
            combs_r: make_combs(STEREO_SPREAD),
            allpasses_l: make_allpasses(0),
            allpasses_r: make_allpasses(STEREO_SPREAD),
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

impl Effect for StereoReverb {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mix = self.mix.advance();

        // Both banks are fed the attenuated mono sum; stereo comes from the
        // detuned right-bank tunings and the width mix below.
        let input = (left + right) * FIXED_GAIN;

        let mut wet_l = 0.0f32;
        for comb in &mut self.combs_l {
            wet_l += comb.process(input);
        }
        for allpass in &mut self.allpasses_l {
            wet_l = allpass.process(wet_l);
        }

        let mut wet_r = 0.0f32;
        for comb in &mut self.combs_r {
            wet_r += comb.process(input);
        }
        for allpass in &mut self.allpasses_r {
            wet_r = allpass.process(wet_r);
        }

        // Width crossfeed: wet1 scales the own channel, wet2 the opposite.
        // At the fixed width of 1.0 this is full separation.
        let wet1 = WIDTH / 2.0 + 0.5;
        let wet2 = (1.0 - WIDTH) / 2.0;
        let dry = 1.0 - mix;

        (
            left * dry + (wet_l * wet1 + wet_r * wet2) * mix,
            right * dry + (wet_r * wet1 + wet_l * wet2) * mix,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = {
            let mut fresh = Self::new(sample_rate);
            fresh.mix.set_immediate(self.mix.target());
            fresh
        };
    }

    fn reset(&mut self) {
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.clear();
        }
        for ap in self
            .allpasses_l
            .iter_mut()
            .chain(self.allpasses_r.iter_mut())
        {
            ap.clear();
        }
        self.mix.snap_to_target();
    }
}
