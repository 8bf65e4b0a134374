//! Canonical parameter storage.
//!
//! Nine parameters, each a lock-free slot written by the host-automation
//! or UI thread and read by the render thread. Float values are stored
//! normalized in [0, 1] as bit-cast `AtomicU32`; the render thread takes
//! one [`ParamSnapshot`] at block start and works only from that for the
//! rest of the block, so a mid-block write can never tear.

use std::sync::atomic::{AtomicU32, Ordering};

use muestra_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit};
use muestra_sampler::{AdsrSettings, MIN_RELEASE_SECS};

/// Native drive range the normalized saturation value maps into.
pub const DRIVE_RANGE: (f32, f32) = (1.0, 10.0);

/// The engine's parameters, in descriptor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineParam {
    /// Envelope attack time (seconds, identity-mapped from normalized).
    Attack,
    /// Envelope decay time.
    Decay,
    /// Envelope sustain level.
    Sustain,
    /// Envelope release time (floored to 1 ms in the snapshot).
    Release,
    /// Reverb wet/dry mix.
    ReverbMix,
    /// Delay wet/dry mix.
    DelayMix,
    /// Chorus wet/dry mix.
    ChorusMix,
    /// Saturation drive, mapped into [1, 10].
    SaturationDrive,
    /// Enumerated index into the preset catalog.
    PresetIndex,
}

impl EngineParam {
    /// All parameters in stable index order.
    pub const ALL: [EngineParam; 9] = [
        EngineParam::Attack,
        EngineParam::Decay,
        EngineParam::Sustain,
        EngineParam::Release,
        EngineParam::ReverbMix,
        EngineParam::DelayMix,
        EngineParam::ChorusMix,
        EngineParam::SaturationDrive,
        EngineParam::PresetIndex,
    ];

    /// Number of float-valued parameters (everything but the preset index).
    pub(crate) const FLOAT_COUNT: usize = 8;

    /// Stable zero-based index.
    pub const fn index(self) -> usize {
        match self {
            EngineParam::Attack => 0,
            EngineParam::Decay => 1,
            EngineParam::Sustain => 2,
            EngineParam::Release => 3,
            EngineParam::ReverbMix => 4,
            EngineParam::DelayMix => 5,
            EngineParam::ChorusMix => 6,
            EngineParam::SaturationDrive => 7,
            EngineParam::PresetIndex => 8,
        }
    }

    /// Stable host-facing id.
    pub const fn id(self) -> ParamId {
        ParamId(100 + self.index() as u32)
    }

    /// Default normalized value.
    pub const fn default_normalized(self) -> f32 {
        match self {
            EngineParam::Sustain => 1.0,
            _ => 0.0,
        }
    }

    /// Descriptor in native units.
    ///
    /// The preset descriptor carries a zero-width range here; the engine
    /// patches its `max` from the catalog length, which is only known at
    /// construction.
    pub fn descriptor(self) -> ParamDescriptor {
        let (name, short_name, string_id, unit) = match self {
            EngineParam::Attack => ("Attack", "Attack", "attack", ParamUnit::Seconds),
            EngineParam::Decay => ("Decay", "Decay", "decay", ParamUnit::Seconds),
            EngineParam::Sustain => ("Sustain", "Sustain", "sustain", ParamUnit::None),
            EngineParam::Release => ("Release", "Release", "release", ParamUnit::Seconds),
            EngineParam::ReverbMix => ("Reverb Mix", "Reverb", "reverb_mix", ParamUnit::Percent),
            EngineParam::DelayMix => ("Delay Mix", "Delay", "delay_mix", ParamUnit::Percent),
            EngineParam::ChorusMix => ("Chorus Mix", "Chorus", "chorus_mix", ParamUnit::Percent),
            EngineParam::SaturationDrive => {
                ("Drive", "Drive", "saturation_drive", ParamUnit::None)
            }
            EngineParam::PresetIndex => ("Preset", "Preset", "preset_index", ParamUnit::None),
        };

        let (min, max, default, step, flags) = match self {
            EngineParam::SaturationDrive => {
                (DRIVE_RANGE.0, DRIVE_RANGE.1, DRIVE_RANGE.0, 0.1, ParamFlags::AUTOMATABLE)
            }
            EngineParam::PresetIndex => (
                0.0,
                0.0,
                0.0,
                1.0,
                ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            ),
            EngineParam::Sustain => (0.0, 1.0, 1.0, 0.01, ParamFlags::AUTOMATABLE),
            _ => (0.0, 1.0, 0.0, 0.01, ParamFlags::AUTOMATABLE),
        };

        ParamDescriptor {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: self.id(),
            string_id,
            flags,
        }
    }
}

/// Torn-read-free view of all parameter values, in native units, taken at
/// block start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Attack time in seconds.
    pub attack_secs: f32,
    /// Decay time in seconds.
    pub decay_secs: f32,
    /// Sustain level.
    pub sustain: f32,
    /// Release time in seconds, already floored to the click-free minimum.
    pub release_secs: f32,
    /// Reverb wet/dry mix.
    pub reverb_mix: f32,
    /// Delay wet/dry mix.
    pub delay_mix: f32,
    /// Chorus wet/dry mix.
    pub chorus_mix: f32,
    /// Saturation drive in [1, 10].
    pub drive: f32,
    /// Selected preset index.
    pub preset_index: usize,
}

impl ParamSnapshot {
    /// The envelope settings a note-on latches from this snapshot.
    pub fn adsr(&self) -> AdsrSettings {
        AdsrSettings {
            attack_secs: self.attack_secs,
            decay_secs: self.decay_secs,
            sustain: self.sustain,
            release_secs: self.release_secs,
        }
    }
}

/// Lock-free parameter value storage.
///
/// Writers clamp; readers get fully-written values only, since each slot
/// is a single atomic word.
#[derive(Debug)]
pub struct ParamStore {
    values: [AtomicU32; EngineParam::FLOAT_COUNT],
    preset: AtomicU32,
}

impl ParamStore {
    /// Create a store with every parameter at its default.
    pub fn new() -> Self {
        let values = core::array::from_fn(|i| {
            AtomicU32::new(EngineParam::ALL[i].default_normalized().to_bits())
        });
        Self {
            values,
            preset: AtomicU32::new(0),
        }
    }

    /// Write a normalized value from any non-real-time producer. Values
    /// are clamped to [0, 1]. The preset index has its own setter and is
    /// ignored here.
    pub fn set_normalized(&self, param: EngineParam, value: f32) {
        if param == EngineParam::PresetIndex {
            return;
        }
        let clamped = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            EngineParam::default_normalized(param)
        };
        self.values[param.index()].store(clamped.to_bits(), Ordering::Release);
    }

    /// Read one normalized value.
    pub fn normalized(&self, param: EngineParam) -> f32 {
        if param == EngineParam::PresetIndex {
            return self.preset_index() as f32;
        }
        f32::from_bits(self.values[param.index()].load(Ordering::Acquire))
    }

    /// Record the currently-loaded preset index.
    pub fn set_preset_index(&self, index: usize) {
        self.preset.store(index as u32, Ordering::Release);
    }

    /// Currently-loaded preset index.
    pub fn preset_index(&self) -> usize {
        self.preset.load(Ordering::Acquire) as usize
    }

    /// Take the block-start snapshot, mapping normalized values to native
    /// ones: ADSR seconds are identity, the release is floored, drive maps
    /// linearly into [1, 10].
    pub fn snapshot(&self) -> ParamSnapshot {
        let get = |p: EngineParam| f32::from_bits(self.values[p.index()].load(Ordering::Acquire));
        let drive_norm = get(EngineParam::SaturationDrive);
        ParamSnapshot {
            attack_secs: get(EngineParam::Attack),
            decay_secs: get(EngineParam::Decay),
            sustain: get(EngineParam::Sustain),
            release_secs: get(EngineParam::Release).max(MIN_RELEASE_SECS),
            reverb_mix: get(EngineParam::ReverbMix),
            delay_mix: get(EngineParam::DelayMix),
            chorus_mix: get(EngineParam::ChorusMix),
            drive: DRIVE_RANGE.0 + drive_norm * (DRIVE_RANGE.1 - DRIVE_RANGE.0),
            preset_index: self.preset_index(),
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}
