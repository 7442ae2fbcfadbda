// Standard MIDI File codec for multitrack piano rolls.
//
// Architecture:
// - encode.rs: Multitrack -> SMF format 1 (conductor track + one track per roll)
// - decode.rs: SMF -> Multitrack, quantizing ticks to the configured resolution
// - config.rs: `MidiOptions`, the codec's tunable constants, loadable from JSON
// - error.rs: `MidiError`
//
// Encoding then decoding preserves note activity, programs, drum flags, track
// names, tempo and downbeats for rolls whose notes fall on whole ticks. Exact
// velocities survive only for numeric rolls; boolean rolls come back holding
// the default velocity.
//
// See also: the `pianoroll` crate for the data model and JSON archives.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;

pub use config::{DEFAULT_MAX_STEPS, GM_DRUM_CHANNEL, MidiOptions};
pub use decode::{from_bytes, from_smf, read_midi};
pub use encode::{to_bytes, to_smf, write_midi};
pub use error::{MidiError, Result};
