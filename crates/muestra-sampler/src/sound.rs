//! Immutable sound definitions decoded from embedded WAV resources.

use std::io::Cursor;
use std::ops::RangeInclusive;

use hound::SampleFormat;
use thiserror::Error;

/// MIDI root note all resources are pitched at.
pub const ROOT_NOTE: u8 = 60;

/// Resources longer than this are truncated at load.
pub const MAX_SAMPLE_SECONDS: f32 = 10.0;

/// Errors from decoding an embedded resource.
///
/// These never reach the host: the preset loader logs them and keeps the
/// previous sound.
#[derive(Debug, Error)]
pub enum SoundError {
    /// The WAV container or sample data could not be parsed.
    #[error("wav decode failed: {0}")]
    Decode(#[from] hound::Error),
    /// The file decoded but contained no audio frames.
    #[error("resource contains no audio frames")]
    Empty,
}

/// Immutable PCM sample plus playback metadata, shared by all voices.
///
/// Built once on the control thread, then published behind an `Arc` and
/// never mutated. Voices read frames through [`frame_at`](Self::frame_at)
/// with a fractional cursor; the definition itself carries no playback
/// state.
#[derive(Debug)]
pub struct SoundDefinition {
    /// Interleaved samples, `channels` per frame.
    samples: Vec<f32>,
    channels: usize,
    sample_rate: f32,
    root_note: u8,
    key_range: RangeInclusive<u8>,
}

impl SoundDefinition {
    /// Decode a WAV resource from memory.
    ///
    /// Integer formats are normalized to [-1, 1]; files with more than two
    /// channels keep only the first two; anything over
    /// [`MAX_SAMPLE_SECONDS`] is truncated.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, SoundError> {
        let reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let source_channels = spec.channels as usize;
        let channels = source_channels.min(2);

        let raw: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let max_frames = (MAX_SAMPLE_SECONDS * spec.sample_rate as f32) as usize;
        let frames = (raw.len() / source_channels).min(max_frames);
        if frames == 0 {
            return Err(SoundError::Empty);
        }

        let mut samples = Vec::with_capacity(frames * channels);
        for frame in raw.chunks_exact(source_channels).take(frames) {
            samples.extend_from_slice(&frame[..channels]);
        }

        tracing::debug!(
            frames,
            channels,
            sample_rate = spec.sample_rate,
            "decoded embedded resource"
        );

        Ok(Self {
            samples,
            channels,
            sample_rate: spec.sample_rate as f32,
            root_note: ROOT_NOTE,
            key_range: 0..=127,
        })
    }

    /// Number of frames (samples per channel).
    pub fn len_frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Channel count (1 or 2).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sample rate the resource was recorded at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// MIDI note the resource plays back unshifted at.
    pub fn root_note(&self) -> u8 {
        self.root_note
    }

    /// Whether this definition responds to the given MIDI note.
    pub fn accepts_note(&self, note: u8) -> bool {
        self.key_range.contains(&note)
    }

    /// Read a stereo frame at a fractional position with linear
    /// interpolation. Mono resources are duplicated onto both channels;
    /// positions past the end read as silence.
    #[inline]
    pub fn frame_at(&self, position: f32) -> (f32, f32) {
        if position < 0.0 {
            return (0.0, 0.0);
        }
        let frames = self.len_frames();
        let idx = position as usize;
        if idx >= frames {
            return (0.0, 0.0);
        }
        let frac = position - idx as f32;

        let (l0, r0) = self.frame(idx);
        let (l1, r1) = if idx + 1 < frames {
            self.frame(idx + 1)
        } else {
            (0.0, 0.0)
        };

        (l0 + (l1 - l0) * frac, r0 + (r1 - r0) * frac)
    }

    #[inline]
    fn frame(&self, idx: usize) -> (f32, f32) {
        let base = idx * self.channels;
        if self.channels == 1 {
            let s = self.samples[base];
            (s, s)
        } else {
            (self.samples[base], self.samples[base + 1])
        }
    }
}
