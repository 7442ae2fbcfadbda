// A single instrument track: one piano roll plus instrument metadata.
//
// `Track` is independent of `Multitrack` and can be built, transformed and
// validated on its own. Mutators return `&mut Self` so calls chain:
//
//     track.binarize(0.0).pad(4).transpose(2);
//
// Nothing is validated automatically. A mutator may leave the track in a state
// `validate()` rejects; callers validate when they need the guarantee.
//
// Transposition on a `Track` always applies. Skipping drum tracks is a
// multitrack-level policy (see `Multitrack::transpose`).

use crate::error::{Error, Result};
use crate::roll::{N_PITCHES, Pianoroll};
use crate::select::StepRange;
use std::fmt;
use std::ops::RangeBounds;

/// Highest valid General MIDI program number.
pub const MAX_PROGRAM: u8 = 127;

/// One instrument's piano roll with its General MIDI program, drum flag and
/// name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    /// Track name; empty if unnamed.
    pub name: String,
    /// General MIDI program number, 0..=127.
    pub program: u8,
    /// Percussion track. Drum tracks are never transposed by a multitrack.
    pub is_drum: bool,
    pub pianoroll: Pianoroll,
}

impl Track {
    /// A track on program 0 (Acoustic Grand Piano), not a drum, unnamed.
    pub fn new(pianoroll: Pianoroll) -> Self {
        Track {
            name: String::new(),
            program: 0,
            is_drum: false,
            pianoroll,
        }
    }

    pub fn with_program(mut self, program: u8) -> Self {
        self.program = program;
        self
    }

    pub fn with_drum(mut self, is_drum: bool) -> Self {
        self.is_drum = is_drum;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check the track's invariants.
    ///
    /// The roll's 128-column shape and the field types are guaranteed by the
    /// Rust types, leaving the program range as the runtime check.
    pub fn validate(&self) -> Result<()> {
        if self.program > MAX_PROGRAM {
            return Err(Error::value(
                "program",
                format!("{} is not in [0, {MAX_PROGRAM}]", self.program),
            ));
        }
        Ok(())
    }

    /// Number of time steps in the piano roll.
    pub fn len(&self) -> usize {
        self.pianoroll.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pianoroll.is_empty()
    }

    /// True if no cell of the piano roll is active.
    pub fn is_silent(&self) -> bool {
        self.pianoroll.is_silent()
    }

    /// True if every entry is 0 or 1, or the roll is boolean.
    pub fn is_binarized(&self) -> bool {
        self.pianoroll.has_binary_values()
    }

    /// Length without trailing silence: last active step + 1, or 0.
    pub fn active_length(&self) -> usize {
        self.pianoroll.active_length()
    }

    /// `(lowest, highest)` active pitch. A silent track has no range.
    pub fn active_pitch_range(&self) -> Result<(u8, u8)> {
        self.pianoroll.active_pitch_range().ok_or(Error::Silent)
    }

    /// Overwrite every active entry with `value`.
    pub fn assign_constant(&mut self, value: f32) -> &mut Self {
        self.pianoroll.assign_constant(value);
        self
    }

    /// Replace the roll with `value > threshold` as booleans.
    pub fn binarize(&mut self, threshold: f32) -> &mut Self {
        self.pianoroll.binarize(threshold);
        self
    }

    /// Clamp every entry into `[lower, upper]`.
    pub fn clip(&mut self, lower: f32, upper: f32) -> &mut Self {
        self.pianoroll.clip(lower, upper);
        self
    }

    /// Append `n` silent steps.
    pub fn pad(&mut self, n: usize) -> &mut Self {
        self.pianoroll.pad(n);
        self
    }

    /// Append the fewest silent steps that make the length a multiple of
    /// `factor`.
    pub fn pad_to_multiple(&mut self, factor: usize) -> Result<&mut Self> {
        if factor == 0 {
            return Err(Error::value("factor", "must be positive"));
        }
        let remainder = self.len() % factor;
        if remainder > 0 {
            self.pianoroll.pad(factor - remainder);
        }
        Ok(self)
    }

    /// Shift all pitches by `semitone`; pitches leaving 0..=127 are lost.
    pub fn transpose(&mut self, semitone: i32) -> &mut Self {
        self.pianoroll.transpose(semitone);
        self
    }

    /// Drop the steps after the last active one.
    pub fn trim_trailing_silence(&mut self) -> &mut Self {
        let active = self.active_length();
        self.pianoroll.truncate(active);
        self
    }

    /// A new track holding only the given time steps. Bounds past the end are
    /// clamped.
    pub fn slice(&self, steps: impl RangeBounds<usize>) -> Track {
        self.slice_window(StepRange::new(steps))
    }

    pub(crate) fn slice_window(&self, window: StepRange) -> Track {
        Track {
            name: self.name.clone(),
            program: self.program,
            is_drum: self.is_drum,
            pianoroll: self.pianoroll.slice(window),
        }
    }

    /// A new track whose roll keeps only the listed pitches active. The roll
    /// keeps all 128 columns; unlisted pitches are silenced.
    pub fn select_pitches(&self, pitches: &[u8]) -> Track {
        let mut track = self.clone();
        track.pianoroll.keep_pitches(pitches);
        track
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.pianoroll.is_binary() {
            "bool"
        } else {
            "float"
        };
        write!(
            f,
            "Track(name={:?}, program={}, is_drum={}, pianoroll=<{}x{} {}>)",
            self.name,
            self.program,
            self.is_drum,
            self.len(),
            N_PITCHES,
            kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(steps: usize, notes: &[(usize, usize)]) -> Track {
        let mut roll = Pianoroll::zeros(steps);
        for &(step, pitch) in notes {
            roll.set(step, pitch, 100.0);
        }
        Track::new(roll)
    }

    #[test]
    fn test_defaults() {
        let track = Track::new(Pianoroll::zeros(4));
        assert_eq!(track.program, 0);
        assert!(!track.is_drum);
        assert!(track.name.is_empty());
        assert!(track.validate().is_ok());
    }

    #[test]
    fn test_validate_program_range() {
        let track = Track::new(Pianoroll::zeros(1)).with_program(128);
        let err = track.validate().unwrap_err();
        assert!(matches!(err, Error::Value { field: "program", .. }));
    }

    #[test]
    fn test_is_binarized() {
        let mut track = track_with(4, &[(0, 60)]);
        assert!(!track.is_binarized());
        track.binarize(0.0);
        assert!(track.is_binarized());
        assert!(Track::new(Pianoroll::zeros(3)).is_binarized());
    }

    #[test]
    fn test_active_length_and_pitch_range() {
        let track = track_with(12, &[(1, 48), (5, 76)]);
        assert_eq!(track.active_length(), 6);
        assert_eq!(track.active_pitch_range().unwrap(), (48, 76));
    }

    #[test]
    fn test_silent_track_has_no_pitch_range() {
        let track = track_with(8, &[]);
        assert_eq!(track.active_length(), 0);
        assert!(matches!(track.active_pitch_range(), Err(Error::Silent)));
    }

    #[test]
    fn test_pad_to_multiple() {
        let mut track = track_with(10, &[]);
        track.pad_to_multiple(4).unwrap();
        assert_eq!(track.len(), 12);
        track.pad_to_multiple(4).unwrap();
        assert_eq!(track.len(), 12);
        assert!(track.pad_to_multiple(0).is_err());
    }

    #[test]
    fn test_chaining() {
        let mut track = track_with(2, &[(1, 60)]);
        track.clip(0.0, 64.0).pad(2).transpose(12);
        assert_eq!(track.len(), 4);
        assert_eq!(track.pianoroll.value(1, 72), 64.0);
    }

    #[test]
    fn test_transpose_round_trip_loses_out_of_range() {
        let mut track = track_with(1, &[(0, 60), (0, 126)]);
        track.transpose(5).transpose(-5);
        assert!(track.pianoroll.is_active(0, 60));
        assert!(!track.pianoroll.is_active(0, 126));
    }

    #[test]
    fn test_trim_trailing_silence() {
        let mut track = track_with(20, &[(3, 60)]);
        track.trim_trailing_silence();
        assert_eq!(track.len(), 4);
    }

    #[test]
    fn test_slice_copies_metadata() {
        let track = track_with(10, &[(5, 60)])
            .with_name("lead")
            .with_program(81);
        let part = track.slice(4..8);
        assert_eq!(part.len(), 4);
        assert_eq!(part.name, "lead");
        assert_eq!(part.program, 81);
        assert!(part.pianoroll.is_active(1, 60));
    }

    #[test]
    fn test_select_pitches() {
        let track = track_with(2, &[(0, 60), (0, 62), (1, 64)]);
        let part = track.select_pitches(&[62, 64]);
        assert_eq!(part.len(), 2);
        assert!(!part.pianoroll.is_active(0, 60));
        assert!(part.pianoroll.is_active(0, 62));
        assert!(part.pianoroll.is_active(1, 64));
        assert!(track.pianoroll.is_active(0, 60));
    }

    #[test]
    fn test_display() {
        let track = Track::new(Pianoroll::binary_zeros(8)).with_name("bass");
        assert_eq!(
            track.to_string(),
            "Track(name=\"bass\", program=0, is_drum=false, pianoroll=<8x128 bool>)"
        );
    }
}
