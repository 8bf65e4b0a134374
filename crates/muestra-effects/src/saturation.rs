//! Tanh drive saturation.

use libm::tanhf;
use muestra_core::{Effect, SmoothedParam};

/// Drive range accepted by [`Saturator::set_drive`].
pub const DRIVE_RANGE: (f32, f32) = (1.0, 10.0);

/// Stateless waveshaper: `y = tanh(drive * x)`.
///
/// At drive 1 the curve is close to linear for small signals; at 10 it is
/// a hard tube-style clip. Output magnitude never exceeds 1 for any drive
/// or input. The drive value is smoothed so automation does not zipper.
///
/// # Example
///
/// ```rust
/// use muestra_core::Effect;
/// use muestra_effects::Saturator;
///
/// let mut sat = Saturator::new(48_000.0);
/// sat.set_drive(10.0);
/// let (l, _) = sat.process_stereo(5.0, 0.0);
/// assert!(l <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Saturator {
    drive: SmoothedParam,
}

impl Saturator {
    /// Create a saturator at unity drive.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            drive: SmoothedParam::with_config(DRIVE_RANGE.0, sample_rate, 5.0),
        }
    }

    /// Set the drive amount, clamped to [1, 10].
    pub fn set_drive(&mut self, drive: f32) {
        self.drive.set_target(drive.clamp(DRIVE_RANGE.0, DRIVE_RANGE.1));
    }

    /// Current drive target.
    pub fn drive(&self) -> f32 {
        self.drive.target()
    }
}

impl Effect for Saturator {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let drive = self.drive.advance();
        (tanhf(drive * left), tanhf(drive * right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.drive.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.drive.snap_to_target();
    }
}
