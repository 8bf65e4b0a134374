//! Render-loop benchmark: full chain with a saturated voice pool.

use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hound::SampleFormat;
use muestra_engine::{BlockContext, ControlMessage, NoteEvent, Processor, SamplerEngine};
use muestra_sampler::{PresetCatalog, PresetResource};

const BLOCK: usize = 512;

fn tone_wav(frames: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..frames {
            let s = (i as f32 * 0.05).sin() * 0.5;
            writer.write_sample((s * 32_767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn bench_process_block(c: &mut Criterion) {
    let catalog = PresetCatalog::new(vec![PresetResource::new("tone.wav", tone_wav(480_000))]);
    let mut engine = SamplerEngine::new(catalog);
    engine.prepare(48_000.0, BLOCK);

    let shared = engine.shared();
    shared.handle_message(ControlMessage::SetChorusMix(0.5));
    shared.handle_message(ControlMessage::SetDelayMix(0.5));
    shared.handle_message(ControlMessage::SetReverbMix(0.5));
    shared.handle_message(ControlMessage::SetSaturationDrive(0.5));
    shared.handle_message(ControlMessage::SetSustain(1.0));

    // Keep the whole pool busy: the retrigger each block means every
    // iteration renders eight active voices regardless of sample length.
    let events: Vec<NoteEvent> = (0..8).map(|i| NoteEvent::note_on(0, 55 + i, 100)).collect();
    let mut left = [0.0f32; BLOCK];
    let mut right = [0.0f32; BLOCK];

    c.bench_function("process_block_512_8_voices_full_chain", |b| {
        let ctx = BlockContext {
            events: &events,
            tempo_bpm: Some(120.0),
        };
        b.iter(|| {
            engine.process(black_box(&mut left), black_box(&mut right), &ctx);
        });
    });
}

criterion_group!(benches, bench_process_block);
criterion_main!(benches);
