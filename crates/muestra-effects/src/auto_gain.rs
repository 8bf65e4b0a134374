//! Loudness compensation for the saturation stage.
//!
//! Saturation changes perceived loudness with drive, which makes the drive
//! knob double as a volume knob. The engine measures the block RMS before
//! the saturator, then calls [`compensate`] afterwards to scale the block
//! back to the pre-saturation level. Only the saturation stage is
//! compensated; the time-based effects downstream keep their natural
//! level behavior.

use muestra_core::stereo_rms;

/// Rescale a stereo block so its RMS matches `input_rms`.
///
/// When the block is silent (output RMS of zero) the gain is left at
/// unity rather than dividing by zero.
pub fn compensate(left: &mut [f32], right: &mut [f32], input_rms: f32) {
    let output_rms = stereo_rms(left, right);
    if output_rms <= 0.0 {
        return;
    }
    let gain = input_rms / output_rms;
    for sample in left.iter_mut().chain(right.iter_mut()) {
        *sample *= gain;
    }
}
