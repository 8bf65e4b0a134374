//! Per-block input from the host bridge.

/// What happened at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEventKind {
    /// Key pressed.
    NoteOn {
        /// MIDI note number.
        note: u8,
        /// MIDI velocity, 1-127 (0 is conventionally a note-off but hosts
        /// deliver it as such already).
        velocity: u8,
    },
    /// Key released.
    NoteOff {
        /// MIDI note number.
        note: u8,
    },
}

/// A note event with its sample offset into the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Sample offset from the start of the block. Offsets past the end of
    /// the block are clamped to it.
    pub frame: u32,
    /// The event itself.
    pub kind: NoteEventKind,
}

impl NoteEvent {
    /// A note-on at the given frame offset.
    pub fn note_on(frame: u32, note: u8, velocity: u8) -> Self {
        Self {
            frame,
            kind: NoteEventKind::NoteOn { note, velocity },
        }
    }

    /// A note-off at the given frame offset.
    pub fn note_off(frame: u32, note: u8) -> Self {
        Self {
            frame,
            kind: NoteEventKind::NoteOff { note },
        }
    }
}

/// Everything the host hands the engine for one block, besides the audio
/// buffers themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockContext<'a> {
    /// Note events for this block, ordered by frame offset.
    pub events: &'a [NoteEvent],
    /// Current host tempo. `None` when the host reports nothing, in which
    /// case tempo-synced processing falls back to 120 BPM.
    pub tempo_bpm: Option<f64>,
}

impl<'a> BlockContext<'a> {
    /// Context with events but no tempo.
    pub fn with_events(events: &'a [NoteEvent]) -> Self {
        Self {
            events,
            tempo_bpm: None,
        }
    }
}
