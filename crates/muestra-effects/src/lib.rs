//! Muestra Effects - the fixed post-sampler processing chain
//!
//! Five stages, executed by the engine in this order every block. The
//! order is part of the sound and must not be rearranged:
//!
//! 1. [`Saturator`] - tanh drive saturation
//! 2. [`auto_gain`] - loudness compensation around the saturation stage
//! 3. [`Chorus`] - dual-tap modulation with persistent LFO phase
//! 4. [`TempoDelay`] - eighth-note feedback delay synced to host tempo
//! 5. [`StereoReverb`] - Freeverb network at fixed room settings
//!
//! Every stage implements [`muestra_core::Effect`] except auto-gain, which
//! operates on whole blocks (it needs the block RMS before and after the
//! saturator).
//!
//! ## Example
//!
//! ```rust
//! use muestra_core::Effect;
//! use muestra_effects::{Chorus, Saturator, StereoReverb, TempoDelay};
//!
//! let mut saturator = Saturator::new(48_000.0);
//! saturator.set_drive(4.0);
//!
//! let mut chorus = Chorus::new(48_000.0);
//! chorus.set_mix(0.3);
//!
//! let (l, r) = saturator.process_stereo(0.5, 0.5);
//! let (l, r) = chorus.process_stereo(l, r);
//! # let _ = (l, r, TempoDelay::new(48_000.0), StereoReverb::new(48_000.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod auto_gain;
pub mod chorus;
pub mod delay;
pub mod reverb;
pub mod saturation;

// Re-export main types at crate root
pub use chorus::Chorus;
pub use delay::TempoDelay;
pub use reverb::StereoReverb;
pub use saturation::Saturator;
