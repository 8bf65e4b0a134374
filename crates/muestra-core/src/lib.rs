//! Muestra Core - DSP primitives for the muestra sampler engine
//!
//! Foundational building blocks for real-time audio processing with zero
//! allocation on the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for stereo block processors
//!
//! ## Parameter Smoothing
//!
//! - [`SmoothedParam`] - Exponential (one-pole) smoothing for zipper-free
//!   parameter changes
//!
//! ## Delay Lines and Filters
//!
//! - [`DelayLine`] - Circular buffer with linear-interpolated fractional reads
//! - [`CombFilter`] - Damped feedback comb for reverb networks
//! - [`AllpassFilter`] - Schroeder allpass for reverb diffusion
//!
//! ## Modulation and Timing
//!
//! - [`Lfo`] - Sine low-frequency oscillator with settable phase
//! - [`tempo`] - Musical tempo to delay-length conversions
//!
//! ## Parameter Metadata
//!
//! - [`ParamDescriptor`] / [`ParameterInfo`] - Host- and UI-facing parameter
//!   discovery
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! muestra-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod param;
pub mod param_info;
pub mod tempo;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use effect::Effect;
pub use lfo::Lfo;
pub use math::{flush_denormal, peak, stereo_rms, wet_dry_mix};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use tempo::{DEFAULT_BPM, eighth_note_ms, eighth_note_samples};
