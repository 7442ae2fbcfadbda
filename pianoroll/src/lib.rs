// Multitrack piano rolls.
//
// Represents multi-instrument symbolic music as time-quantized piano-roll
// matrices (time steps x 128 MIDI pitches), one per track, and provides the
// operations to transform, merge, pad, trim and slice them.
//
// Architecture:
// - roll.rs: The piano-roll matrix (boolean or numeric cells, fixed 128 columns)
// - track.rs: One instrument: a piano roll plus program, drum flag and name
// - multitrack.rs: Ordered tracks + shared tempo/downbeat/resolution, and all
//   cross-track operations (stacking, merging, padding, trimming, selection)
// - merge.rs: `MergeMode` reductions and the stacked (time, pitch, track) view
// - select.rs: Track selectors and time windows for slicing
// - archive.rs: Lossless JSON persistence
// - error.rs: Error type and its kind classification
//
// Track lengths inside a multitrack are reconciled lazily and validation is
// opt-in (`validate()`); no operation validates behind the caller's back.
//
// The MIDI codec lives in the separate `pianoroll_midi` crate.

pub mod archive;
pub mod error;
pub mod merge;
pub mod multitrack;
pub mod roll;
pub mod select;
pub mod track;

pub use error::{Error, ErrorKind, Result};
pub use merge::{MergeMode, StackedPianoroll};
pub use multitrack::{
    DEFAULT_MERGED_NAME, DEFAULT_RESOLUTION, DEFAULT_TEMPO, MergeRequest, Multitrack,
};
pub use roll::{N_PITCHES, Pianoroll};
pub use select::{StepRange, TrackSelector};
pub use track::{MAX_PROGRAM, Track};
