//! Small math helpers used across the render path.

use libm::sqrtf;

/// Flush denormal float values to zero.
///
/// Feedback paths (delay, comb filters) otherwise decay into the denormal
/// range, where some CPUs take a large per-operation penalty.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Equal-sum wet/dry blend: `dry * (1 - mix) + wet * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// RMS level across both channels of a stereo block.
///
/// Returns 0.0 for empty buffers.
#[inline]
pub fn stereo_rms(left: &[f32], right: &[f32]) -> f32 {
    let count = left.len() + right.len();
    if count == 0 {
        return 0.0;
    }
    let sum: f32 = left.iter().chain(right.iter()).map(|s| s * s).sum();
    sqrtf(sum / count as f32)
}

/// Peak absolute magnitude of one channel.
#[inline]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denormals_flushed_signals_kept() {
        assert_eq!(flush_denormal(1e-20), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
        assert_eq!(flush_denormal(-0.5), -0.5);
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(wet_dry_mix(1.0, -1.0, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, -1.0, 1.0), -1.0);
        assert_eq!(wet_dry_mix(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn rms_of_dc() {
        let left = [0.5f32; 64];
        let right = [0.5f32; 64];
        assert!((stereo_rms(&left, &right) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rms_of_silence_and_empty() {
        assert_eq!(stereo_rms(&[0.0; 8], &[0.0; 8]), 0.0);
        assert_eq!(stereo_rms(&[], &[]), 0.0);
    }

    #[test]
    fn peak_tracks_largest_magnitude() {
        assert_eq!(peak(&[0.1, -0.9, 0.5]), 0.9);
        assert_eq!(peak(&[]), 0.0);
    }
}
