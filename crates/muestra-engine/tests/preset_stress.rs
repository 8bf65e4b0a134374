//! Preset switching under concurrent rendering.
//!
//! A control thread hammers preset loads and parameter writes while the
//! render thread keeps triggering notes and rendering blocks. The `Arc`
//! ownership of sound definitions makes use-after-free structurally
//! impossible; this test exercises the swap observation path hard enough
//! that a violation would show up as garbage, non-finite samples or a
//! crash under the sanitizer-friendly test profile.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use hound::SampleFormat;
use muestra_engine::{BlockContext, ControlMessage, NoteEvent, Processor, SamplerEngine};
use muestra_sampler::{PresetCatalog, PresetResource};

const BLOCK: usize = 256;

fn tone_wav(frames: usize, level: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample((level * 32_767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn preset_switching_while_voices_play_is_safe() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let catalog = PresetCatalog::new(vec![
        PresetResource::new("short.wav", tone_wav(2_000, 0.5)),
        PresetResource::new("long.wav", tone_wav(40_000, 0.3)),
        PresetResource::new("corrupt.wav", b"definitely not a wav".to_vec()),
    ]);
    let mut engine = SamplerEngine::new(catalog);
    engine.prepare(48_000.0, BLOCK);
    let shared = engine.shared();

    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        // Control thread: preset churn, including the out-of-range and
        // corrupt cases, plus parameter writes.
        let control_shared = shared.clone();
        let control_done = &done;
        scope.spawn(move || {
            let mut i = 0usize;
            while !control_done.load(Ordering::Acquire) {
                control_shared.handle_message(ControlMessage::SelectPreset(i % 5));
                control_shared.handle_message(ControlMessage::SetRelease((i % 10) as f32 / 10.0));
                control_shared
                    .handle_message(ControlMessage::SetSaturationDrive((i % 7) as f32 / 7.0));
                i += 1;
                std::thread::yield_now();
            }
        });

        // Render thread: constant note traffic.
        let mut left = [0.0f32; BLOCK];
        let mut right = [0.0f32; BLOCK];
        for block in 0..2_000u32 {
            let note = 48 + (block % 24) as u8;
            let events = [
                NoteEvent::note_on(0, note, 100),
                NoteEvent::note_off(BLOCK as u32 / 2, note.wrapping_sub(1)),
            ];
            let ctx = BlockContext {
                events: &events,
                tempo_bpm: if block % 2 == 0 { Some(140.0) } else { None },
            };
            engine.process(&mut left, &mut right, &ctx);

            for &s in left.iter().chain(right.iter()) {
                assert!(s.is_finite(), "non-finite sample after block {block}");
            }
        }
        done.store(true, Ordering::Release);
    });
}
