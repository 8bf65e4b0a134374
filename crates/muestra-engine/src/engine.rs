//! The plugin-instance core: voice rendering plus the fixed effects chain.
//!
//! One [`SamplerEngine`] lives on the render thread. Per block it takes a
//! parameter snapshot, observes a possibly-swapped sound definition,
//! renders voices with sample-accurate event offsets, then runs the chain
//! in its fixed order: saturation, auto-gain, chorus, tempo delay, reverb.
//! A block, once started, always completes; every failure mode upstream
//! degrades to silence or passthrough instead of reaching this loop.

use std::sync::Arc;

use muestra_core::{Effect, ParamDescriptor, ParameterInfo, peak, stereo_rms};
use muestra_effects::{Chorus, Saturator, StereoReverb, TempoDelay, auto_gain};
use muestra_sampler::{AdsrSettings, PresetCatalog, SoundDefinition, VoiceBank};

use crate::events::{BlockContext, NoteEvent, NoteEventKind};
use crate::params::EngineParam;
use crate::shared::EngineShared;

/// Size of the voice pool.
pub const VOICE_COUNT: usize = 8;

/// Real-time rendering capability.
pub trait Processor {
    /// Fix the stream configuration before rendering starts. May allocate;
    /// never called concurrently with [`process`](Self::process).
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize);

    /// Render one block in place. Real-time safe: no allocation, no locks.
    fn process(&mut self, left: &mut [f32], right: &mut [f32], ctx: &BlockContext<'_>);

    /// Drop all voices and effect tails, keeping parameters.
    fn reset(&mut self);
}

/// State save/restore capability.
///
/// Present as a named pair; persistence itself is an external
/// collaborator's responsibility, so both operations are no-ops here.
pub trait PluginState {
    /// Serialize instance state. Returns an empty blob.
    fn save_state(&self) -> Vec<u8>;

    /// Restore instance state. Ignores the blob.
    fn load_state(&mut self, bytes: &[u8]);
}

/// The sample-playback synthesizer with its post-processing chain.
pub struct SamplerEngine {
    shared: EngineShared,
    voices: VoiceBank<VOICE_COUNT>,
    saturator: Saturator,
    chorus: Chorus,
    delay: TempoDelay,
    reverb: StereoReverb,
    /// The definition the voice bank is currently playing from. Compared
    /// against the shared slot each block to observe preset switches.
    current_sound: Option<Arc<SoundDefinition>>,
    sample_rate: f32,
}

impl SamplerEngine {
    /// Build an engine over an injected preset catalog. Preset 0 is loaded
    /// eagerly; call [`Processor::prepare`] before rendering.
    pub fn new(catalog: PresetCatalog) -> Self {
        Self::with_shared(EngineShared::new(catalog))
    }

    /// Build an engine over existing shared state (the UI side keeps its
    /// own clone of the handle).
    pub fn with_shared(shared: EngineShared) -> Self {
        let sample_rate = 48_000.0;
        Self {
            shared,
            voices: VoiceBank::new(sample_rate),
            saturator: Saturator::new(sample_rate),
            chorus: Chorus::new(sample_rate),
            delay: TempoDelay::new(sample_rate),
            reverb: StereoReverb::new(sample_rate),
            current_sound: None,
            sample_rate,
        }
    }

    /// A handle to the shared state for the control thread.
    pub fn shared(&self) -> EngineShared {
        self.shared.clone()
    }

    /// The sample rate fixed by the last [`Processor::prepare`] call.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Adopt the latest published sound definition. Voices still on the
    /// outgoing definition are stopped before the reference changes hands,
    /// so nothing reads a retired definition after this returns.
    fn observe_sound_slot(&mut self) {
        let latest = self.shared.current_sound();
        let changed = match (&latest, &self.current_sound) {
            (None, None) => false,
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            _ => true,
        };
        if changed {
            if let Some(old) = self.current_sound.take() {
                self.voices.detach_sound(&old);
            }
            self.current_sound = latest;
        }
    }

    fn apply_event(&mut self, event: &NoteEvent, adsr: &AdsrSettings) {
        match event.kind {
            NoteEventKind::NoteOn { note, velocity } => {
                // No sound loaded: the note is dropped and the block
                // renders silence.
                if let Some(sound) = &self.current_sound {
                    self.voices.note_on(note, velocity, sound, adsr);
                }
            }
            NoteEventKind::NoteOff { note } => self.voices.note_off(note),
        }
    }

    fn render_voices(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (voice_l, voice_r) = self.voices.process_stereo();
            *l = voice_l;
            *r = voice_r;
        }
    }
}

impl Processor for SamplerEngine {
    fn prepare(&mut self, sample_rate: f32, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.voices.all_notes_off();
        self.voices.set_sample_rate(sample_rate);
        self.saturator.set_sample_rate(sample_rate);
        self.chorus.set_sample_rate(sample_rate);
        self.delay.set_sample_rate(sample_rate);
        self.reverb.set_sample_rate(sample_rate);
        self.saturator.reset();
        self.chorus.reset();
        self.delay.reset();
        self.reverb.reset();
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32], ctx: &BlockContext<'_>) {
        debug_assert_eq!(left.len(), right.len(), "channel length mismatch");

        let snapshot = self.shared.params().snapshot();
        self.observe_sound_slot();

        // Release applies to in-progress voices; the rest of the ADSR
        // latches per voice at note-on.
        self.voices.set_release_secs(snapshot.release_secs);
        self.saturator.set_drive(snapshot.drive);
        self.chorus.set_mix(snapshot.chorus_mix);
        self.delay.set_mix(snapshot.delay_mix);
        self.delay.set_tempo(ctx.tempo_bpm);
        self.reverb.set_mix(snapshot.reverb_mix);

        // Voice pass, split at each event's frame offset.
        let adsr = snapshot.adsr();
        let block_len = left.len();
        let mut cursor = 0usize;
        for event in ctx.events {
            let frame = (event.frame as usize).min(block_len);
            if frame > cursor {
                self.render_voices(&mut left[cursor..frame], &mut right[cursor..frame]);
                cursor = frame;
            }
            self.apply_event(event, &adsr);
        }
        self.render_voices(&mut left[cursor..], &mut right[cursor..]);

        // The fixed chain. Auto-gain matches the block's RMS after the
        // saturator to the RMS before it.
        let input_rms = stereo_rms(left, right);
        self.saturator.process_block_inplace(left, right);
        auto_gain::compensate(left, right, input_rms);
        self.chorus.process_block_inplace(left, right);
        self.delay.process_block_inplace(left, right);
        self.reverb.process_block_inplace(left, right);

        self.shared.publish_level(peak(left));
    }

    fn reset(&mut self) {
        self.voices.all_notes_off();
        self.saturator.reset();
        self.chorus.reset();
        self.delay.reset();
        self.reverb.reset();
    }
}

impl ParameterInfo for SamplerEngine {
    fn param_count(&self) -> usize {
        EngineParam::ALL.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let param = *EngineParam::ALL.get(index)?;
        let mut desc = param.descriptor();
        if param == EngineParam::PresetIndex {
            desc.max = self.shared.catalog().len().saturating_sub(1) as f32;
        }
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        let Some(&param) = EngineParam::ALL.get(index) else {
            return 0.0;
        };
        match param {
            EngineParam::PresetIndex => self.shared.params().preset_index() as f32,
            EngineParam::SaturationDrive => self.shared.params().snapshot().drive,
            _ => self.shared.params().normalized(param),
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(&param) = EngineParam::ALL.get(index) else {
            return;
        };
        match param {
            EngineParam::PresetIndex => {
                if value >= 0.0 {
                    self.shared.load_preset(value as usize);
                }
            }
            _ => {
                let desc = param.descriptor();
                self.shared
                    .params()
                    .set_normalized(param, desc.normalize(value));
            }
        }
    }
}

impl PluginState for SamplerEngine {
    fn save_state(&self) -> Vec<u8> {
        Vec::new()
    }

    fn load_state(&mut self, _bytes: &[u8]) {}
}
