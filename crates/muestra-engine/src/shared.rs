//! State shared between the render thread and the control (UI/automation)
//! thread.
//!
//! [`EngineShared`] is a cheap-to-clone handle over one `Arc`'d block of
//! state: the parameter store, the preset catalog, the current sound slot
//! and the meter cell. The control side writes parameters and loads
//! presets; the render side snapshots parameters, observes the sound slot
//! and publishes the meter. Nothing here locks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use arc_swap::ArcSwapOption;
use muestra_sampler::{PresetCatalog, SoundDefinition};

use crate::params::{EngineParam, ParamStore};

/// One named message per parameter, as posted by the UI.
///
/// Float payloads are normalized [0, 1]; the store clamps. Preset
/// selection carries the catalog index and triggers the load on the
/// calling thread, which must therefore not be the render thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    /// Set envelope attack.
    SetAttack(f32),
    /// Set envelope decay.
    SetDecay(f32),
    /// Set envelope sustain.
    SetSustain(f32),
    /// Set envelope release.
    SetRelease(f32),
    /// Set reverb wet/dry mix.
    SetReverbMix(f32),
    /// Set delay wet/dry mix.
    SetDelayMix(f32),
    /// Set chorus wet/dry mix.
    SetChorusMix(f32),
    /// Set saturation drive.
    SetSaturationDrive(f32),
    /// Load the preset at the given catalog index.
    SelectPreset(usize),
}

struct SharedState {
    params: ParamStore,
    catalog: PresetCatalog,
    /// The currently published sound. Voices and the engine hold their own
    /// `Arc` clones; replacing the slot never invalidates an in-flight
    /// reader, and the superseded definition is freed once the last clone
    /// drops.
    sound: ArcSwapOption<SoundDefinition>,
    /// Peak of channel 0 over the last rendered block, as f32 bits.
    level: AtomicU32,
}

/// Cloneable handle to the state shared across threads.
#[derive(Clone)]
pub struct EngineShared {
    inner: Arc<SharedState>,
}

impl EngineShared {
    /// Build shared state over an injected catalog and eagerly load preset
    /// 0. An empty or undecodable catalog leaves no sound published, which
    /// renders as silence.
    pub fn new(catalog: PresetCatalog) -> Self {
        let shared = Self {
            inner: Arc::new(SharedState {
                params: ParamStore::new(),
                catalog,
                sound: ArcSwapOption::const_empty(),
                level: AtomicU32::new(0.0f32.to_bits()),
            }),
        };
        shared.load_preset(0);
        shared
    }

    /// The parameter store.
    pub fn params(&self) -> &ParamStore {
        &self.inner.params
    }

    /// The injected preset catalog.
    pub fn catalog(&self) -> &PresetCatalog {
        &self.inner.catalog
    }

    /// Display names for the host's enumerated preset parameter.
    pub fn preset_names(&self) -> Vec<String> {
        self.inner.catalog.display_names()
    }

    /// Decode and publish the preset at `index`.
    ///
    /// Control-thread only: decoding allocates. An out-of-range index is a
    /// no-op and a decode failure keeps the previous sound; neither is an
    /// error toward the caller.
    pub fn load_preset(&self, index: usize) {
        let Some(resource) = self.inner.catalog.get(index) else {
            tracing::debug!(index, "preset index out of range, keeping current sound");
            return;
        };
        match SoundDefinition::from_wav_bytes(resource.data()) {
            Ok(sound) => {
                self.inner.sound.store(Some(Arc::new(sound)));
                self.inner.params.set_preset_index(index);
                tracing::debug!(index, name = %resource.display_name(), "preset loaded");
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "preset decode failed, keeping previous sound");
            }
        }
    }

    /// The currently published sound definition, if any.
    pub fn current_sound(&self) -> Option<Arc<SoundDefinition>> {
        self.inner.sound.load_full()
    }

    /// Consume one UI message.
    pub fn handle_message(&self, message: ControlMessage) {
        let params = self.params();
        match message {
            ControlMessage::SetAttack(v) => params.set_normalized(EngineParam::Attack, v),
            ControlMessage::SetDecay(v) => params.set_normalized(EngineParam::Decay, v),
            ControlMessage::SetSustain(v) => params.set_normalized(EngineParam::Sustain, v),
            ControlMessage::SetRelease(v) => params.set_normalized(EngineParam::Release, v),
            ControlMessage::SetReverbMix(v) => params.set_normalized(EngineParam::ReverbMix, v),
            ControlMessage::SetDelayMix(v) => params.set_normalized(EngineParam::DelayMix, v),
            ControlMessage::SetChorusMix(v) => params.set_normalized(EngineParam::ChorusMix, v),
            ControlMessage::SetSaturationDrive(v) => {
                params.set_normalized(EngineParam::SaturationDrive, v);
            }
            ControlMessage::SelectPreset(index) => self.load_preset(index),
        }
    }

    /// Latest display level: peak of channel 0 over the last block. The
    /// UI polls this on its own timer; staleness of a block is fine.
    pub fn level(&self) -> f32 {
        f32::from_bits(self.inner.level.load(Ordering::Acquire))
    }

    /// Publish the display level. Render thread only.
    pub(crate) fn publish_level(&self, level: f32) {
        self.inner.level.store(level.to_bits(), Ordering::Release);
    }
}
