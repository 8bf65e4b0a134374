//! Muestra Engine - the plugin-instance core
//!
//! Ties the sampler and the effects chain into one DAW-hostable engine:
//!
//! - [`SamplerEngine`] - the render-thread processor: voices, fixed
//!   effects chain, metering
//! - [`EngineShared`] - cloneable handle for the control thread: parameter
//!   store, preset loading, level readout
//! - [`ControlMessage`] - named UI messages, one per parameter
//! - [`BlockContext`] / [`NoteEvent`] - per-block host input
//! - [`Processor`] / [`PluginState`] and
//!   [`muestra_core::ParameterInfo`] - the capability surface a plugin
//!   shell adapts to its format
//!
//! # Threading
//!
//! Exactly one thread calls [`Processor::process`]; any other thread may
//! hold an [`EngineShared`] clone and write parameters or load presets
//! concurrently. The render path takes one parameter snapshot per block,
//! never allocates, and never blocks.
//!
//! # Example
//!
//! ```rust
//! use muestra_engine::{BlockContext, NoteEvent, Processor, SamplerEngine};
//! use muestra_sampler::PresetCatalog;
//!
//! let mut engine = SamplerEngine::new(PresetCatalog::default());
//! engine.prepare(48_000.0, 256);
//!
//! let shared = engine.shared(); // hand this to the UI thread
//!
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! let events = [NoteEvent::note_on(0, 60, 100)];
//! let ctx = BlockContext {
//!     events: &events,
//!     tempo_bpm: Some(120.0),
//! };
//! engine.process(&mut left, &mut right, &ctx);
//! let _ = shared.level();
//! ```

pub mod engine;
pub mod events;
pub mod params;
pub mod shared;

// Re-export main types at crate root
pub use engine::{PluginState, Processor, SamplerEngine, VOICE_COUNT};
pub use events::{BlockContext, NoteEvent, NoteEventKind};
pub use params::{EngineParam, ParamSnapshot, ParamStore};
pub use shared::{ControlMessage, EngineShared};

// Re-export the host-facing parameter metadata from core
pub use muestra_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
