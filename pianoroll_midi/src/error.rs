// Errors from MIDI encoding and decoding.

use std::io;

/// Errors from converting between multitracks and Standard MIDI Files.
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("failed to parse MIDI data: {0}")]
    Parse(#[from] midly::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("only metrical (ticks per quarter note) timing is supported")]
    UnsupportedTiming,

    #[error("MIDI data spans more than {max} time steps")]
    TooLong { max: usize },

    #[error("MIDI event gap of {ticks} ticks exceeds the 28-bit delta limit")]
    GapTooLong { ticks: u64 },

    #[error("invalid MIDI option `{field}`: {detail}")]
    Option { field: &'static str, detail: String },

    #[error("malformed MIDI options: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Pianoroll(#[from] pianoroll::Error),
}

pub type Result<T> = std::result::Result<T, MidiError>;
