//! End-to-end rendering behavior through the public engine surface.

use std::io::Cursor;

use hound::SampleFormat;
use muestra_engine::{
    BlockContext, ControlMessage, NoteEvent, Processor, SamplerEngine,
};
use muestra_sampler::{MIN_RELEASE_SECS, PresetCatalog, PresetResource};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 512;

/// A one-second constant-level mono WAV.
fn held_tone_wav(level: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..SAMPLE_RATE as usize {
            writer.write_sample((level * 32_767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn engine() -> SamplerEngine {
    let catalog = PresetCatalog::new(vec![PresetResource::new("tone.wav", held_tone_wav(0.5))]);
    let mut engine = SamplerEngine::new(catalog);
    engine.prepare(SAMPLE_RATE, BLOCK);
    engine
}

#[test]
fn one_second_of_silence_renders_exact_zeros() {
    // No MIDI input and every mix at zero: the output buffer must be
    // all-zero, bit for bit.
    let mut engine = engine();
    let mut left = [0.1f32; BLOCK]; // pre-soiled to prove the engine overwrites
    let mut right = [0.1f32; BLOCK];

    let blocks = (SAMPLE_RATE as usize).div_ceil(BLOCK);
    for _ in 0..blocks {
        engine.process(&mut left, &mut right, &BlockContext::default());
        assert!(
            left.iter().chain(right.iter()).all(|&s| s == 0.0),
            "silent input must render exact zeros"
        );
    }
}

#[test]
fn parameter_messages_round_trip_into_the_snapshot() {
    let engine = engine();
    let shared = engine.shared();

    shared.handle_message(ControlMessage::SetAttack(0.25));
    shared.handle_message(ControlMessage::SetDecay(0.5));
    shared.handle_message(ControlMessage::SetSustain(0.6));
    shared.handle_message(ControlMessage::SetRelease(0.75));
    shared.handle_message(ControlMessage::SetReverbMix(0.1));
    shared.handle_message(ControlMessage::SetDelayMix(0.2));
    shared.handle_message(ControlMessage::SetChorusMix(0.3));
    shared.handle_message(ControlMessage::SetSaturationDrive(1.0));

    let snap = shared.params().snapshot();
    assert!((snap.attack_secs - 0.25).abs() < 1e-6);
    assert!((snap.decay_secs - 0.5).abs() < 1e-6);
    assert!((snap.sustain - 0.6).abs() < 1e-6);
    assert!((snap.release_secs - 0.75).abs() < 1e-6);
    assert!((snap.reverb_mix - 0.1).abs() < 1e-6);
    assert!((snap.delay_mix - 0.2).abs() < 1e-6);
    assert!((snap.chorus_mix - 0.3).abs() < 1e-6);
    assert!((snap.drive - 10.0).abs() < 1e-5);
}

#[test]
fn note_renders_and_decays_after_note_off() {
    let mut engine = engine();
    let shared = engine.shared();
    // A long release so the tail spans several blocks
    shared.handle_message(ControlMessage::SetRelease(0.05));

    let mut left = [0.0f32; BLOCK];
    let mut right = [0.0f32; BLOCK];

    let on = [NoteEvent::note_on(0, 60, 127)];
    engine.process(&mut left, &mut right, &BlockContext::with_events(&on));
    let held_peak = left.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(held_peak > 0.1);

    let off = [NoteEvent::note_off(0, 60)];
    engine.process(&mut left, &mut right, &BlockContext::with_events(&off));

    // After the 50ms release has fully elapsed the engine is silent again.
    for _ in 0..20 {
        engine.process(&mut left, &mut right, &BlockContext::default());
    }
    assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
}

#[test]
fn immediate_note_off_with_minimum_release_has_no_click() {
    // Worst case for clicks: attack 0, decay 0, sustain 1, release at the
    // 1ms floor, note-off right after note-on. The release must ramp
    // rather than step.
    let mut engine = engine();
    let shared = engine.shared();
    shared.handle_message(ControlMessage::SetRelease(0.0)); // floored to 1ms

    let events = [NoteEvent::note_on(0, 60, 127), NoteEvent::note_off(8, 60)];
    let mut left = [0.0f32; BLOCK];
    let mut right = [0.0f32; BLOCK];
    engine.process(&mut left, &mut right, &BlockContext::with_events(&events));

    // Largest per-sample step after the note-off. The linear release over
    // 1ms at 48kHz moves at most level/48 per sample; everything else in
    // the chain is smooth. Allow headroom for the auto-gain scaling.
    let release_span = 8..(8 + (MIN_RELEASE_SECS * SAMPLE_RATE) as usize + 2);
    let mut max_step = 0.0f32;
    for i in release_span {
        max_step = max_step.max((left[i + 1] - left[i]).abs());
    }
    assert!(max_step < 0.05, "release clicked with step {max_step}");

    // And the tail really ends at zero
    assert_eq!(left[BLOCK - 1], 0.0);
}

#[test]
fn tempo_changes_only_affect_the_delay_length() {
    let mut engine = engine();
    let shared = engine.shared();
    shared.handle_message(ControlMessage::SetDelayMix(1.0));

    let silent = BlockContext {
        events: &[],
        tempo_bpm: Some(60.0),
    };
    let mut left = [0.0f32; BLOCK];
    let mut right = [0.0f32; BLOCK];

    // Let the delay mix smoothing settle at fully wet before the note, so
    // no dry onset leaks into the measurement.
    for _ in 0..20 {
        engine.process(&mut left, &mut right, &silent);
    }

    // Render a short note burst at 60 BPM; with the mix fully wet the
    // first audible energy is the echo, one eighth note (0.5s at 60 BPM)
    // after the onset.
    let on = [NoteEvent::note_on(0, 60, 127), NoteEvent::note_off(4, 60)];
    let ctx = BlockContext {
        events: &on,
        tempo_bpm: Some(60.0),
    };

    let mut rendered = Vec::new();
    engine.process(&mut left, &mut right, &ctx);
    rendered.extend_from_slice(&left);
    let blocks = (SAMPLE_RATE as usize).div_ceil(BLOCK);
    for _ in 0..blocks {
        engine.process(&mut left, &mut right, &silent);
        rendered.extend_from_slice(&left);
    }

    // Mix 1.0 means the dry onset is absent and the first audible energy
    // arrives at the echo. 0.5s at 48kHz = 24000 samples.
    let first_audible = rendered
        .iter()
        .position(|s| s.abs() > 0.05)
        .expect("echo never arrived");
    assert!(
        (23_500..=24_700).contains(&first_audible),
        "echo landed at {first_audible}"
    );
}
