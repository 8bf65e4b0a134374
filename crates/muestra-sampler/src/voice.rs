//! Sampler voices and the fixed-size voice bank.
//!
//! Voices are created once and recycled between notes; nothing on the
//! render path allocates. Each playing voice holds its own `Arc` to the
//! sound definition it started on, so a preset switch can never pull PCM
//! data out from under a voice mid-read.

use std::sync::Arc;

use libm::powf;

use crate::envelope::{AdsrEnvelope, AdsrSettings};
use crate::sound::SoundDefinition;

/// Convert a note offset from the root into a playback-rate ratio.
#[inline]
fn semitones_to_ratio(semitones: f32) -> f32 {
    powf(2.0, semitones / 12.0)
}

/// One active instance of a sampled sound.
///
/// Playback is a fractional cursor over the sound's frames, stepped by a
/// ratio that keytracks the note against the root and compensates for the
/// resource's own sample rate.
#[derive(Debug, Clone)]
pub struct SamplerVoice {
    sound: Option<Arc<SoundDefinition>>,
    envelope: AdsrEnvelope,
    cursor: f32,
    step: f32,
    note: u8,
    velocity_gain: f32,
    age: u64,
    sample_rate: f32,
}

impl SamplerVoice {
    /// Create an idle voice.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sound: None,
            envelope: AdsrEnvelope::new(sample_rate),
            cursor: 0.0,
            step: 1.0,
            note: 0,
            velocity_gain: 0.0,
            age: 0,
            sample_rate,
        }
    }

    /// Update the sample rate. Only meaningful while idle.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
    }

    /// Start the voice on a note. The envelope settings latch here; later
    /// attack/decay/sustain changes only affect future note-ons.
    pub fn note_on(
        &mut self,
        note: u8,
        velocity: u8,
        sound: Arc<SoundDefinition>,
        adsr: &AdsrSettings,
    ) {
        let semitones = f32::from(note) - f32::from(sound.root_note());
        self.step = semitones_to_ratio(semitones) * sound.sample_rate() / self.sample_rate;
        self.cursor = 0.0;
        self.note = note;
        self.velocity_gain = f32::from(velocity) / 127.0;
        self.sound = Some(sound);
        self.envelope.configure(adsr);
        self.envelope.gate_on();
    }

    /// Release the voice (note-off).
    pub fn note_off(&mut self) {
        self.envelope.gate_off();
    }

    /// Stop immediately and drop the sound reference.
    pub fn kill(&mut self) {
        self.envelope.reset();
        self.sound = None;
    }

    /// Retarget the release time of the running envelope.
    pub fn set_release_secs(&mut self, secs: f32) {
        self.envelope.set_release_secs(secs);
    }

    /// True while the voice is producing sound.
    pub fn is_active(&self) -> bool {
        self.sound.is_some() && self.envelope.is_active()
    }

    /// The note this voice is (or was last) playing.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Allocation age; larger is more recent.
    pub fn age(&self) -> u64 {
        self.age
    }

    pub(crate) fn set_age(&mut self, age: u64) {
        self.age = age;
    }

    /// True if this voice is playing from the given definition.
    pub fn plays(&self, sound: &Arc<SoundDefinition>) -> bool {
        self.sound
            .as_ref()
            .is_some_and(|own| Arc::ptr_eq(own, sound))
    }

    /// Render one stereo sample and advance the cursor. Frees the voice
    /// when the envelope completes or the sample data runs out.
    #[inline]
    pub fn process_stereo(&mut self) -> (f32, f32) {
        let Some(sound) = &self.sound else {
            return (0.0, 0.0);
        };
        if !self.envelope.is_active() {
            self.sound = None;
            return (0.0, 0.0);
        }
        if self.cursor >= sound.len_frames() as f32 {
            self.envelope.reset();
            self.sound = None;
            return (0.0, 0.0);
        }

        let (l, r) = sound.frame_at(self.cursor);
        self.cursor += self.step;

        let gain = self.envelope.advance() * self.velocity_gain;
        if !self.envelope.is_active() {
            self.sound = None;
        }
        (l * gain, r * gain)
    }
}

/// Fixed pool of sampler voices with oldest-steal allocation.
///
/// Note-on takes a free voice when one exists; with the pool exhausted the
/// voice that has been sounding longest is reassigned. That is the whole
/// stealing policy: explicit, and verified by the pool tests.
///
/// # Example
///
/// ```rust,ignore
/// let mut bank: VoiceBank<8> = VoiceBank::new(48_000.0);
/// bank.note_on(60, 100, &sound, &AdsrSettings::default());
/// let (l, r) = bank.process_stereo();
/// ```
#[derive(Debug)]
pub struct VoiceBank<const N: usize> {
    voices: [SamplerVoice; N],
    age_counter: u64,
}

impl<const N: usize> VoiceBank<N> {
    /// Create a bank of `N` idle voices.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| SamplerVoice::new(sample_rate)),
            age_counter: 0,
        }
    }

    /// Update the sample rate on every voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Start a note on a free voice, stealing the oldest active voice if
    /// the pool is exhausted.
    pub fn note_on(
        &mut self,
        note: u8,
        velocity: u8,
        sound: &Arc<SoundDefinition>,
        adsr: &AdsrSettings,
    ) {
        if !sound.accepts_note(note) {
            return;
        }
        let idx = self.allocate();
        self.age_counter += 1;
        self.voices[idx].set_age(self.age_counter);
        self.voices[idx].note_on(note, velocity, Arc::clone(sound), adsr);
    }

    /// Release the active voice playing `note`, if any.
    pub fn note_off(&mut self, note: u8) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.note_off();
                return;
            }
        }
    }

    /// Stop every voice immediately.
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
    }

    /// Stop every voice still referencing `sound`. Called when a preset
    /// switch retires a definition, before the engine adopts the new one.
    pub fn detach_sound(&mut self, sound: &Arc<SoundDefinition>) {
        for voice in &mut self.voices {
            if voice.plays(sound) {
                voice.kill();
            }
        }
    }

    /// Apply a release-time change to every voice, including ones already
    /// releasing.
    pub fn set_release_secs(&mut self, secs: f32) {
        for voice in &mut self.voices {
            voice.set_release_secs(secs);
        }
    }

    /// Sum one stereo sample from all active voices.
    #[inline]
    pub fn process_stereo(&mut self) -> (f32, f32) {
        let mut left = 0.0;
        let mut right = 0.0;
        for voice in &mut self.voices {
            let (l, r) = voice.process_stereo();
            left += l;
            right += r;
        }
        (left, right)
    }

    /// Number of voices currently producing sound.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Read access to the voice pool.
    pub fn voices(&self) -> &[SamplerVoice; N] {
        &self.voices
    }

    fn allocate(&self) -> usize {
        for (i, voice) in self.voices.iter().enumerate() {
            if !voice.is_active() {
                return i;
            }
        }
        // Pool exhausted: steal the voice that has been sounding longest.
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age())
            .map_or(0, |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::SampleFormat;
    use std::io::Cursor;

    fn test_sound(frames: usize, sample_rate: u32) -> Arc<SoundDefinition> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames {
                writer.write_sample(16_384i16).unwrap(); // 0.5
            }
            writer.finalize().unwrap();
        }
        Arc::new(SoundDefinition::from_wav_bytes(&cursor.into_inner()).unwrap())
    }

    fn held() -> AdsrSettings {
        AdsrSettings {
            attack_secs: 0.0,
            decay_secs: 0.0,
            sustain: 1.0,
            release_secs: 0.1,
        }
    }

    #[test]
    fn voice_plays_sample_at_full_velocity() {
        let sound = test_sound(1_000, 48_000);
        let mut voice = SamplerVoice::new(48_000.0);
        voice.note_on(60, 127, Arc::clone(&sound), &held());

        let (l, r) = voice.process_stereo();
        assert!((l - 0.5).abs() < 0.01, "got {l}");
        assert_eq!(l, r);
    }

    #[test]
    fn velocity_scales_output() {
        let sound = test_sound(1_000, 48_000);
        let mut loud = SamplerVoice::new(48_000.0);
        let mut quiet = SamplerVoice::new(48_000.0);
        loud.note_on(60, 127, Arc::clone(&sound), &held());
        quiet.note_on(60, 64, Arc::clone(&sound), &held());

        let (l_loud, _) = loud.process_stereo();
        let (l_quiet, _) = quiet.process_stereo();
        assert!(l_quiet < l_loud);
        assert!((l_quiet / l_loud - 64.0 / 127.0).abs() < 0.01);
    }

    #[test]
    fn keytracking_steps_an_octave_as_double_speed() {
        let sound = test_sound(1_000, 48_000);
        let mut voice = SamplerVoice::new(48_000.0);

        voice.note_on(72, 127, Arc::clone(&sound), &held());
        assert!((voice.step - 2.0).abs() < 1e-5);

        voice.note_on(48, 127, Arc::clone(&sound), &held());
        assert!((voice.step - 0.5).abs() < 1e-5);

        voice.note_on(60, 127, Arc::clone(&sound), &held());
        assert!((voice.step - 1.0).abs() < 1e-6);
    }

    #[test]
    fn resource_rate_is_compensated() {
        // A 24kHz resource played on a 48kHz engine advances at half speed.
        let sound = test_sound(1_000, 24_000);
        let mut voice = SamplerVoice::new(48_000.0);
        voice.note_on(60, 127, Arc::clone(&sound), &held());
        assert!((voice.step - 0.5).abs() < 1e-5);
    }

    #[test]
    fn voice_frees_itself_at_end_of_sample() {
        let sound = test_sound(10, 48_000);
        let mut voice = SamplerVoice::new(48_000.0);
        voice.note_on(60, 127, Arc::clone(&sound), &held());

        for _ in 0..20 {
            voice.process_stereo();
        }
        assert!(!voice.is_active());
        // The Arc must have been released
        assert_eq!(Arc::strong_count(&sound), 1);
    }

    #[test]
    fn voice_frees_itself_after_release() {
        let sound = test_sound(48_000, 48_000);
        let mut voice = SamplerVoice::new(48_000.0);
        voice.note_on(60, 127, Arc::clone(&sound), &held());
        for _ in 0..100 {
            voice.process_stereo();
        }
        voice.note_off();
        // 0.1s release = 4800 samples
        for _ in 0..5_000 {
            voice.process_stereo();
        }
        assert!(!voice.is_active());
        assert_eq!(Arc::strong_count(&sound), 1);
    }

    #[test]
    fn bank_allocates_free_voices_first() {
        let sound = test_sound(48_000, 48_000);
        let mut bank: VoiceBank<8> = VoiceBank::new(48_000.0);

        for note in 60..68 {
            bank.note_on(note, 100, &sound, &held());
        }
        assert_eq!(bank.active_voice_count(), 8);
    }

    #[test]
    fn ninth_note_steals_the_oldest_voice() {
        let sound = test_sound(48_000, 48_000);
        let mut bank: VoiceBank<8> = VoiceBank::new(48_000.0);

        for note in 60..68 {
            bank.note_on(note, 100, &sound, &held());
        }
        bank.note_on(72, 100, &sound, &held());

        // Still exactly 8 voices; the first note (60) is gone, the newest
        // (72) is present.
        assert_eq!(bank.active_voice_count(), 8);
        assert!(!bank.voices().iter().any(|v| v.is_active() && v.note() == 60));
        assert!(bank.voices().iter().any(|v| v.is_active() && v.note() == 72));
    }

    #[test]
    fn note_off_releases_only_the_matching_voice() {
        let sound = test_sound(48_000, 48_000);
        let mut bank: VoiceBank<8> = VoiceBank::new(48_000.0);
        bank.note_on(60, 100, &sound, &held());
        bank.note_on(64, 100, &sound, &held());

        bank.note_off(60);
        // Released voice is still active (in its release tail)
        assert_eq!(bank.active_voice_count(), 2);

        // After the tail it frees; 64 keeps sounding
        for _ in 0..10_000 {
            bank.process_stereo();
        }
        assert_eq!(bank.active_voice_count(), 1);
        assert!(bank.voices().iter().any(|v| v.is_active() && v.note() == 64));
    }

    #[test]
    fn detach_sound_stops_only_that_definition() {
        let old = test_sound(48_000, 48_000);
        let new = test_sound(48_000, 48_000);
        let mut bank: VoiceBank<8> = VoiceBank::new(48_000.0);
        bank.note_on(60, 100, &old, &held());
        bank.note_on(64, 100, &new, &held());

        bank.detach_sound(&old);
        assert_eq!(bank.active_voice_count(), 1);
        assert!(bank.voices().iter().any(|v| v.is_active() && v.note() == 64));
        // No voice holds the old definition any more
        assert_eq!(Arc::strong_count(&old), 1);
    }

    #[test]
    fn bank_sums_voices() {
        let sound = test_sound(48_000, 48_000);
        let mut bank: VoiceBank<2> = VoiceBank::new(48_000.0);
        bank.note_on(60, 127, &sound, &held());
        bank.note_on(60, 127, &sound, &held());

        let (l, _) = bank.process_stereo();
        assert!((l - 1.0).abs() < 0.02, "two 0.5 voices should sum, got {l}");
    }
}
