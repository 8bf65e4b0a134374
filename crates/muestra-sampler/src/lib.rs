//! Muestra Sampler - sample playback for the muestra engine
//!
//! Everything between an embedded WAV resource and summed voice output:
//!
//! - [`PresetCatalog`] - injected read-only list of named WAV resources
//! - [`SoundDefinition`] - immutable decoded PCM plus playback metadata,
//!   shared across voices behind an `Arc`
//! - [`AdsrEnvelope`] - linear attack-decay-sustain-release envelope
//! - [`SamplerVoice`] / [`VoiceBank`] - fixed pool of recycled voices with
//!   oldest-steal allocation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use muestra_sampler::{AdsrSettings, SoundDefinition, VoiceBank};
//!
//! let sound = Arc::new(SoundDefinition::from_wav_bytes(&wav_bytes)?);
//! let mut bank: VoiceBank<8> = VoiceBank::new(48_000.0);
//! bank.note_on(60, 100, &sound, &AdsrSettings::default());
//! let (left, right) = bank.process_stereo();
//! ```

pub mod catalog;
pub mod envelope;
pub mod sound;
pub mod voice;

// Re-export main types at crate root
pub use catalog::{PresetCatalog, PresetResource};
pub use envelope::{AdsrEnvelope, AdsrSettings, EnvelopeStage, MIN_RELEASE_SECS};
pub use sound::{MAX_SAMPLE_SECONDS, ROOT_NOTE, SoundDefinition, SoundError};
pub use voice::{SamplerVoice, VoiceBank};
