//! Linear ADSR amplitude envelope.
//!
//! Linear segments keep the stage transitions exactly where the times say
//! they are: attack reaches peak after the attack time, decay lands on the
//! sustain level after the decay time, release hits zero after the release
//! time. Attack, decay and sustain latch per voice at note-on; release may
//! be retargeted while a voice is already releasing (live tail shaping).

/// Floor applied to the release time. A release of exactly zero would end
/// the voice with a full-scale step, which is audible as a click.
pub const MIN_RELEASE_SECS: f32 = 0.001;

/// Envelope settings captured from the parameter snapshot at note-on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrSettings {
    /// Attack time in seconds.
    pub attack_secs: f32,
    /// Decay time in seconds.
    pub decay_secs: f32,
    /// Sustain level, 0 to 1.
    pub sustain: f32,
    /// Release time in seconds.
    pub release_secs: f32,
}

impl Default for AdsrSettings {
    fn default() -> Self {
        Self {
            attack_secs: 0.0,
            decay_secs: 0.0,
            sustain: 1.0,
            release_secs: 0.0,
        }
    }
}

/// Envelope stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Inactive, output zero. The voice is free.
    #[default]
    Idle,
    /// Ramping up to peak after note-on.
    Attack,
    /// Falling from peak toward the sustain level.
    Decay,
    /// Holding at the sustain level while the note is held.
    Sustain,
    /// Falling to zero after note-off.
    Release,
}

/// Linear-segment ADSR envelope generator.
///
/// # Example
///
/// ```rust
/// use muestra_sampler::{AdsrEnvelope, AdsrSettings, EnvelopeStage};
///
/// let mut env = AdsrEnvelope::new(48_000.0);
/// env.configure(&AdsrSettings {
///     attack_secs: 0.01,
///     decay_secs: 0.1,
///     sustain: 0.7,
///     release_secs: 0.2,
/// });
/// env.gate_on();
/// assert_eq!(env.stage(), EnvelopeStage::Attack);
/// let level = env.advance();
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    stage: EnvelopeStage,
    level: f32,
    sample_rate: f32,

    sustain: f32,
    release_secs: f32,

    attack_increment: f32,
    decay_increment: f32,
    release_increment: f32,
}

impl AdsrEnvelope {
    /// Create an idle envelope.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            stage: EnvelopeStage::Idle,
            level: 0.0,
            sample_rate,
            sustain: 1.0,
            release_secs: MIN_RELEASE_SECS,
            attack_increment: 1.0,
            decay_increment: 0.0,
            release_increment: 0.0,
        };
        env.configure(&AdsrSettings::default());
        env
    }

    /// Apply a full set of envelope times. Called at note-on.
    pub fn configure(&mut self, settings: &AdsrSettings) {
        self.attack_increment = 1.0 / self.samples_for(settings.attack_secs);
        self.sustain = settings.sustain.clamp(0.0, 1.0);
        self.decay_increment = (1.0 - self.sustain) / self.samples_for(settings.decay_secs);
        self.set_release_secs(settings.release_secs);
    }

    /// Retarget the release time.
    ///
    /// Times at or below zero are clamped to [`MIN_RELEASE_SECS`]. If the
    /// envelope is already releasing, the remaining tail is re-spread over
    /// the new time from the current level.
    pub fn set_release_secs(&mut self, secs: f32) {
        self.release_secs = secs.max(MIN_RELEASE_SECS);
        if self.stage == EnvelopeStage::Release {
            self.release_increment = self.level / self.samples_for(self.release_secs);
        }
    }

    /// Update the sample rate. Only meaningful between notes.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Open the gate: enter ATTACK from any stage, preserving the current
    /// level so retriggers do not step.
    pub fn gate_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Close the gate: enter RELEASE from any active stage.
    pub fn gate_off(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
            self.release_increment = self.level / self.samples_for(self.release_secs);
        }
    }

    /// Force the envelope to idle immediately.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current output level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True unless the envelope is idle.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
            EnvelopeStage::Attack => {
                self.level += self.attack_increment;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level -= self.decay_increment;
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                self.level = self.sustain;
            }
            EnvelopeStage::Release => {
                self.level -= self.release_increment;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.level
    }

    fn samples_for(&self, secs: f32) -> f32 {
        (secs * self.sample_rate).max(1.0)
    }
}
