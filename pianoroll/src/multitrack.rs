// The multitrack container: an ordered list of tracks sharing one time axis.
//
// `Multitrack` owns its tracks plus the time-axis metadata (resolution, tempo
// curve, downbeat flags). Track order is the channel/instrument order and is
// kept by every operation except explicit removal and merging.
//
// Lengths are reconciled lazily. Tracks may have different numbers of time
// steps, and tempo/downbeat may differ from both. Operations that need a
// common time axis (`stacked_pianoroll`, `merged_pianoroll`, `merge_tracks`)
// pad private copies; only `pad_to_same` pads the tracks themselves.
//
// Validation is opt-in: no mutator validates, and `validate()` walks the whole
// aggregate on request, reporting the first violation.
//
// Time/track selection (`select`, `slice`) resolves its time window once into
// a `StepRange` and applies that same value to every track, the tempo and the
// downbeats, so the sliced pieces stay aligned.
//
// See also: `track.rs` for the per-track operations broadcast from here,
// `merge.rs` for the reduction policies, `select.rs` for selectors,
// `archive.rs` for persistence.

use crate::error::{Error, Result};
use crate::merge::{MergeMode, StackedPianoroll};
use crate::roll::Pianoroll;
use crate::select::{StepRange, TrackSelector};
use crate::track::Track;
use log::{debug, trace};
use std::fmt;
use std::ops::RangeBounds;

/// Time steps per quarter note when none is given.
pub const DEFAULT_RESOLUTION: usize = 24;

/// Tempo (quarter notes per minute) assumed when a multitrack has no tempo
/// curve.
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Name given to a merged track unless the request says otherwise.
pub const DEFAULT_MERGED_NAME: &str = "merged";

/// A set of tracks plus shared time-axis metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Multitrack {
    pub name: String,
    /// Time steps per quarter note. Must be positive.
    pub resolution: usize,
    /// Tempo in qpm at each time step. All values must be positive.
    pub tempo: Option<Vec<f64>>,
    /// True at the first time step of each bar.
    pub downbeat: Option<Vec<bool>>,
    pub tracks: Vec<Track>,
}

impl Default for Multitrack {
    fn default() -> Self {
        Multitrack {
            name: String::new(),
            resolution: DEFAULT_RESOLUTION,
            tempo: None,
            downbeat: None,
            tracks: Vec::new(),
        }
    }
}

/// Parameters for `Multitrack::merge_tracks`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRequest {
    /// Tracks to merge; all of them by default.
    pub tracks: TrackSelector,
    pub mode: MergeMode,
    /// Program of the merged track.
    pub program: u8,
    pub is_drum: bool,
    pub name: String,
    /// Remove the merged source tracks afterwards.
    pub remove_source: bool,
}

impl Default for MergeRequest {
    fn default() -> Self {
        MergeRequest {
            tracks: TrackSelector::All,
            mode: MergeMode::Sum,
            program: 0,
            is_drum: false,
            name: DEFAULT_MERGED_NAME.to_string(),
            remove_source: false,
        }
    }
}

impl Multitrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_tempo(mut self, tempo: Vec<f64>) -> Self {
        self.tempo = Some(tempo);
        self
    }

    pub fn with_downbeat(mut self, downbeat: Vec<bool>) -> Self {
        self.downbeat = Some(downbeat);
        self
    }

    /// Set the downbeats from the indices of the steps that start a bar. The
    /// flag vector ends at the last listed step.
    pub fn with_downbeat_steps(mut self, steps: &[usize]) -> Self {
        let len = steps.iter().max().map_or(0, |&last| last + 1);
        let mut downbeat = vec![false; len];
        for &step in steps {
            downbeat[step] = true;
        }
        self.downbeat = Some(downbeat);
        self
    }

    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Check every invariant of the aggregate, tracks included, and return
    /// the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::value("resolution", "must be a positive integer"));
        }
        if let Some(tempo) = &self.tempo {
            let bad = tempo
                .iter()
                .enumerate()
                .find(|(_, t)| t.is_nan() || **t <= 0.0);
            if let Some((step, value)) = bad {
                return Err(Error::value(
                    "tempo",
                    format!("step {step} has non-positive tempo {value}"),
                ));
            }
        }
        for (index, track) in self.tracks.iter().enumerate() {
            track.validate().map_err(|source| Error::Track {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }

    /// True if every track is binarized.
    pub fn is_binarized(&self) -> bool {
        self.tracks.iter().all(Track::is_binarized)
    }

    /// The longest active length over all tracks: what would remain after
    /// trimming the ensemble's trailing silence.
    pub fn active_length(&self) -> usize {
        self.tracks
            .iter()
            .map(Track::active_length)
            .max()
            .unwrap_or(0)
    }

    /// Lowest and highest active pitch over all tracks.
    ///
    /// Silent tracks are skipped, so one silent track does not fail the
    /// whole ensemble even though `Track::active_pitch_range` returns
    /// `Error::Silent` for it. Fails with `Error::Silent` only when every
    /// track is silent, and with `Error::NoTracks` when there are none.
    pub fn active_pitch_range(&self) -> Result<(u8, u8)> {
        if self.tracks.is_empty() {
            return Err(Error::NoTracks);
        }
        self.tracks
            .iter()
            .filter_map(|track| track.pianoroll.active_pitch_range())
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
            .ok_or(Error::Silent)
    }

    /// Indices of the steps flagged as downbeats; empty without downbeats.
    pub fn downbeat_steps(&self) -> Vec<usize> {
        self.downbeat.as_deref().map_or_else(Vec::new, |downbeat| {
            downbeat
                .iter()
                .enumerate()
                .filter_map(|(step, &down)| down.then_some(step))
                .collect()
        })
    }

    /// Number of downbeats.
    pub fn count_downbeats(&self) -> usize {
        self.downbeat
            .as_deref()
            .map_or(0, |downbeat| downbeat.iter().filter(|&&d| d).count())
    }

    /// Indices of tracks whose piano roll is entirely silent.
    pub fn empty_tracks(&self) -> Vec<usize> {
        self.tracks
            .iter()
            .enumerate()
            .filter_map(|(i, track)| track.is_silent().then_some(i))
            .collect()
    }

    /// Longest piano roll, in time steps; 0 without tracks.
    pub fn max_length(&self) -> usize {
        self.tracks.iter().map(Track::len).max().unwrap_or(0)
    }

    /// All piano rolls padded to the longest one and stacked as a
    /// (time, pitch, track) tensor. The tracks themselves are not touched.
    pub fn stacked_pianoroll(&self) -> StackedPianoroll {
        StackedPianoroll::new(self.tracks.iter().map(|track| track.pianoroll.clone()))
    }

    /// The stacked piano rolls reduced along the track axis.
    pub fn merged_pianoroll(&self, mode: MergeMode) -> Pianoroll {
        self.stacked_pianoroll().merge(mode)
    }

    /// Append a track as is; lengths are not reconciled.
    pub fn append(&mut self, track: Track) -> &mut Self {
        self.tracks.push(track);
        self
    }

    pub fn assign_constant(&mut self, value: f32) -> &mut Self {
        for track in &mut self.tracks {
            track.assign_constant(value);
        }
        self
    }

    pub fn binarize(&mut self, threshold: f32) -> &mut Self {
        for track in &mut self.tracks {
            track.binarize(threshold);
        }
        self
    }

    pub fn clip(&mut self, lower: f32, upper: f32) -> &mut Self {
        for track in &mut self.tracks {
            track.clip(lower, upper);
        }
        self
    }

    /// Divide the resolution by `factor` and keep every `factor`-th step of
    /// each piano roll, starting at step 0. A trailing partial window is
    /// dropped. Tempo and downbeats are left as they are.
    pub fn downsample(&mut self, factor: usize) -> Result<&mut Self> {
        if factor == 0 || self.resolution % factor != 0 {
            return Err(Error::Downsample {
                factor,
                resolution: self.resolution,
            });
        }
        self.resolution /= factor;
        for track in &mut self.tracks {
            track.pianoroll.decimate(factor);
        }
        debug!(
            "downsampled {} tracks by {factor}, resolution now {}",
            self.tracks.len(),
            self.resolution
        );
        Ok(self)
    }

    /// Append `n` silent steps to every track. Track lengths still differ if
    /// they differed before; see `pad_to_same`.
    pub fn pad(&mut self, n: usize) -> &mut Self {
        for track in &mut self.tracks {
            track.pad(n);
        }
        self
    }

    /// Pad every track to a multiple of `factor` steps.
    pub fn pad_to_multiple(&mut self, factor: usize) -> Result<&mut Self> {
        for track in &mut self.tracks {
            track.pad_to_multiple(factor)?;
        }
        Ok(self)
    }

    /// Pad shorter tracks with silence so every track is `max_length()` long.
    pub fn pad_to_same(&mut self) -> &mut Self {
        let max_length = self.max_length();
        for track in &mut self.tracks {
            track.pianoroll.pad_to(max_length);
        }
        self
    }

    /// Transpose every non-drum track by `semitone`.
    pub fn transpose(&mut self, semitone: i32) -> &mut Self {
        for track in self.tracks.iter_mut().filter(|t| !t.is_drum) {
            track.transpose(semitone);
        }
        self
    }

    /// Cut every track at the ensemble's active length. Tracks already
    /// shorter are unchanged.
    pub fn trim_trailing_silence(&mut self) -> &mut Self {
        let active_length = self.active_length();
        for track in &mut self.tracks {
            track.pianoroll.truncate(active_length);
        }
        debug!("trimmed {} tracks to {active_length} steps", self.tracks.len());
        self
    }

    /// Remove the selected tracks, keeping the rest in order. Indices past the
    /// end are ignored.
    pub fn remove_tracks(&mut self, selector: impl Into<TrackSelector>) -> &mut Self {
        let selector = selector.into();
        let before = self.tracks.len();
        let mut index = 0;
        self.tracks.retain(|_| {
            let keep = !selector.contains(index);
            index += 1;
            keep
        });
        debug!("removed {} of {before} tracks", before - self.tracks.len());
        self
    }

    pub fn remove_empty_tracks(&mut self) -> &mut Self {
        let empty = self.empty_tracks();
        self.remove_tracks(empty)
    }

    /// Merge the requested tracks into one new track appended at the end.
    ///
    /// With `remove_source`, the merged tracks are removed afterwards; when
    /// the request addressed all tracks, only the new track remains.
    pub fn merge_tracks(&mut self, request: MergeRequest) -> Result<&mut Self> {
        let indices = request.tracks.resolve(self.tracks.len())?;
        let merged = StackedPianoroll::new(
            indices
                .iter()
                .map(|&i| self.tracks[i].pianoroll.clone()),
        )
        .merge(request.mode);
        trace!(
            "merging tracks {indices:?} with mode {} into {:?}",
            request.mode, request.name
        );

        let existing = self.tracks.len();
        self.tracks.push(Track {
            name: request.name,
            program: request.program,
            is_drum: request.is_drum,
            pianoroll: merged,
        });

        if request.remove_source {
            if request.tracks.is_all() {
                self.remove_tracks(0..existing);
            } else {
                self.remove_tracks(indices);
            }
        }
        Ok(self)
    }

    /// A new multitrack holding the selected tracks, with the full tempo and
    /// downbeat.
    pub fn select(&self, tracks: impl Into<TrackSelector>) -> Result<Multitrack> {
        self.slice(tracks, ..)
    }

    /// A new multitrack holding the selected tracks cut to `steps`. The same
    /// window is applied to every piano roll, the tempo and the downbeats.
    pub fn slice(
        &self,
        tracks: impl Into<TrackSelector>,
        steps: impl RangeBounds<usize>,
    ) -> Result<Multitrack> {
        let window = StepRange::new(steps);
        let indices = tracks.into().resolve(self.tracks.len())?;
        Ok(Multitrack {
            name: self.name.clone(),
            resolution: self.resolution,
            tempo: self.tempo.as_deref().map(|tempo| window.apply(tempo)),
            downbeat: self.downbeat.as_deref().map(|db| window.apply(db)),
            tracks: indices
                .iter()
                .map(|&i| self.tracks[i].slice_window(window))
                .collect(),
        })
    }
}

impl fmt::Display for Multitrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multitrack(")?;
        if !self.name.is_empty() {
            write!(f, "name={:?}, ", self.name)?;
        }
        write!(f, "resolution={}", self.resolution)?;
        if let Some(first) = self.tempo.as_deref().and_then(<[f64]>::first) {
            write!(f, ", tempo=[{first:?}, ...]")?;
        }
        if let Some(first) = self.downbeat.as_deref().and_then(<[bool]>::first) {
            write!(f, ", downbeat=[{first}, ...]")?;
        }
        if !self.tracks.is_empty() {
            write!(f, ", tracks=[")?;
            for (i, track) in self.tracks.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{track}")?;
            }
            write!(f, "]")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_track(steps: usize, notes: &[(usize, usize)]) -> Track {
        let mut roll = Pianoroll::binary_zeros(steps);
        for &(step, pitch) in notes {
            roll.set(step, pitch, 1.0);
        }
        Track::new(roll)
    }

    fn three_tracks() -> Multitrack {
        Multitrack::new().with_tracks(vec![
            binary_track(4, &[(0, 60)]).with_name("a"),
            binary_track(8, &[(2, 40)]).with_name("b"),
            binary_track(6, &[]).with_name("c"),
        ])
    }

    #[test]
    fn test_defaults() {
        let mt = Multitrack::new();
        assert_eq!(mt.resolution, DEFAULT_RESOLUTION);
        assert!(mt.tempo.is_none());
        assert!(mt.downbeat.is_none());
        assert!(mt.is_empty());
        assert!(mt.validate().is_ok());
    }

    #[test]
    fn test_validate_resolution_and_tempo() {
        let mt = Multitrack::new().with_resolution(0);
        assert!(matches!(
            mt.validate(),
            Err(Error::Value { field: "resolution", .. })
        ));

        let mt = Multitrack::new().with_tempo(vec![120.0, 0.0]);
        assert!(matches!(
            mt.validate(),
            Err(Error::Value { field: "tempo", .. })
        ));

        let mt = Multitrack::new().with_tempo(vec![f64::NAN]);
        assert!(mt.validate().is_err());
    }

    #[test]
    fn test_validate_cascades_into_tracks() {
        let mut mt = three_tracks();
        mt.tracks[1].program = 200;
        match mt.validate() {
            Err(Error::Track { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, Error::Value { field: "program", .. }));
            }
            other => panic!("expected a track error, got {other:?}"),
        }
    }

    #[test]
    fn test_mutators_do_not_validate() {
        let mut mt = three_tracks();
        mt.resolution = 0;
        mt.pad(2).binarize(0.0);
        assert!(mt.validate().is_err());
    }

    #[test]
    fn test_lengths() {
        let mt = three_tracks();
        assert_eq!(mt.max_length(), 8);
        assert_eq!(mt.active_length(), 3);
        assert_eq!(Multitrack::new().max_length(), 0);
    }

    #[test]
    fn test_active_pitch_range_union() {
        let mt = three_tracks();
        assert_eq!(mt.active_pitch_range().unwrap(), (40, 60));
        assert!(matches!(
            Multitrack::new().active_pitch_range(),
            Err(Error::NoTracks)
        ));
        let silent = Multitrack::new().with_tracks(vec![binary_track(2, &[])]);
        assert!(matches!(silent.active_pitch_range(), Err(Error::Silent)));
    }

    #[test]
    fn test_active_pitch_range_skips_silent_track() {
        let mt = Multitrack::new().with_tracks(vec![
            binary_track(4, &[(0, 72)]),
            binary_track(4, &[]),
            binary_track(2, &[(1, 30)]),
        ]);
        assert!(matches!(mt.tracks[1].active_pitch_range(), Err(Error::Silent)));
        assert_eq!(mt.active_pitch_range().unwrap(), (30, 72));
    }

    #[test]
    fn test_downbeats() {
        let mt = Multitrack::new().with_downbeat_steps(&[0, 4, 8]);
        assert_eq!(mt.downbeat.as_ref().unwrap().len(), 9);
        assert_eq!(mt.downbeat_steps(), vec![0, 4, 8]);
        assert_eq!(mt.count_downbeats(), 3);
        assert!(Multitrack::new().downbeat_steps().is_empty());
        assert_eq!(Multitrack::new().count_downbeats(), 0);
    }

    #[test]
    fn test_empty_tracks() {
        let mut mt = three_tracks();
        assert_eq!(mt.empty_tracks(), vec![2]);
        mt.remove_empty_tracks();
        assert_eq!(mt.len(), 2);
        assert!(mt.empty_tracks().is_empty());
    }

    #[test]
    fn test_pad_to_same() {
        let mut mt = three_tracks();
        mt.pad_to_same();
        assert!(mt.tracks.iter().all(|t| t.len() == 8));
    }

    #[test]
    fn test_pad_to_multiple() {
        let mut mt = three_tracks();
        mt.pad_to_multiple(5).unwrap();
        let lens: Vec<usize> = mt.tracks.iter().map(Track::len).collect();
        assert_eq!(lens, vec![5, 10, 10]);
        assert!(mt.pad_to_multiple(0).is_err());
    }

    #[test]
    fn test_trim_trailing_silence() {
        let mut mt = three_tracks();
        mt.trim_trailing_silence();
        let lens: Vec<usize> = mt.tracks.iter().map(Track::len).collect();
        assert_eq!(lens, vec![3, 3, 3]);

        let mut mt = Multitrack::new().with_tracks(vec![
            binary_track(2, &[]),
            binary_track(10, &[(6, 1)]),
        ]);
        mt.trim_trailing_silence();
        let lens: Vec<usize> = mt.tracks.iter().map(Track::len).collect();
        assert_eq!(lens, vec![2, 7]);
    }

    #[test]
    fn test_transpose_skips_drums() {
        let mut mt = Multitrack::new().with_tracks(vec![
            binary_track(1, &[(0, 60)]),
            binary_track(1, &[(0, 36)]).with_drum(true),
        ]);
        mt.transpose(2);
        assert!(mt.tracks[0].pianoroll.is_active(0, 62));
        assert!(mt.tracks[1].pianoroll.is_active(0, 36));
    }

    #[test]
    fn test_downsample() {
        let mut mt = Multitrack::new()
            .with_tracks(vec![binary_track(5, &[(0, 1), (2, 2), (3, 3), (4, 4)])]);
        mt.downsample(2).unwrap();
        assert_eq!(mt.resolution, 12);
        let roll = &mt.tracks[0].pianoroll;
        assert_eq!(roll.len(), 3);
        assert!(roll.is_active(0, 1));
        assert!(roll.is_active(1, 2));
        assert!(roll.is_active(2, 4));
        assert!(roll.active_pitch_range().unwrap() == (1, 4));
    }

    #[test]
    fn test_downsample_rejects_non_factor() {
        let mut mt = three_tracks();
        let err = mt.downsample(5).unwrap_err();
        assert!(matches!(
            err,
            Error::Downsample {
                factor: 5,
                resolution: 24
            }
        ));
        assert_eq!(mt.resolution, 24);
        assert!(mt.downsample(0).is_err());
    }

    #[test]
    fn test_merged_pianoroll_modes() {
        let mt = Multitrack::new().with_tracks(vec![
            binary_track(2, &[(0, 60)]),
            binary_track(3, &[(0, 60), (2, 61)]),
        ]);
        let sum = mt.merged_pianoroll(MergeMode::Sum);
        assert_eq!(sum.len(), 3);
        assert_eq!(sum.value(0, 60), 2.0);
        let any = mt.merged_pianoroll(MergeMode::Any);
        assert!(any.is_binary());
        assert!(any.is_active(2, 61));
        let max = mt.merged_pianoroll(MergeMode::Max);
        assert_eq!(max.value(0, 60), 1.0);
    }

    #[test]
    fn test_merge_tracks_keeps_sources_by_default() {
        let mut mt = three_tracks();
        mt.merge_tracks(MergeRequest {
            tracks: TrackSelector::Many(vec![0, 1]),
            mode: MergeMode::Any,
            ..MergeRequest::default()
        })
        .unwrap();
        assert_eq!(mt.len(), 4);
        let merged = &mt.tracks[3];
        assert_eq!(merged.name, DEFAULT_MERGED_NAME);
        assert_eq!(merged.len(), 8);
        assert!(merged.pianoroll.is_active(0, 60));
        assert!(merged.pianoroll.is_active(2, 40));
    }

    #[test]
    fn test_merge_tracks_remove_selected_sources() {
        let mut mt = three_tracks();
        mt.merge_tracks(MergeRequest {
            tracks: TrackSelector::Many(vec![0, 2]),
            name: "ab".to_string(),
            program: 33,
            remove_source: true,
            ..MergeRequest::default()
        })
        .unwrap();
        let names: Vec<&str> = mt.tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b", "ab"]);
        assert_eq!(mt.tracks[1].program, 33);
    }

    #[test]
    fn test_merge_all_tracks_remove_sources() {
        let mut mt = three_tracks();
        mt.merge_tracks(MergeRequest {
            remove_source: true,
            ..MergeRequest::default()
        })
        .unwrap();
        assert_eq!(mt.len(), 1);
        assert_eq!(mt.tracks[0].name, DEFAULT_MERGED_NAME);
    }

    #[test]
    fn test_merge_tracks_bad_index() {
        let mut mt = three_tracks();
        let err = mt
            .merge_tracks(MergeRequest {
                tracks: TrackSelector::One(9),
                ..MergeRequest::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::TrackIndex { index: 9, len: 3 }));
        assert_eq!(mt.len(), 3);
    }

    #[test]
    fn test_remove_tracks_single_and_range() {
        let mut mt = three_tracks();
        mt.remove_tracks(1usize);
        let names: Vec<&str> = mt.tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);

        let mut mt = three_tracks();
        mt.remove_tracks(0usize..2);
        assert_eq!(mt.tracks[0].name, "c");

        let mut mt = three_tracks();
        mt.remove_tracks(vec![7usize]);
        assert_eq!(mt.len(), 3);
    }

    #[test]
    fn test_select_keeps_full_metadata() {
        let mt = three_tracks().with_tempo(vec![100.0; 8]);
        let sub = mt.select(2usize).unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.tracks[0].name, "c");
        assert_eq!(sub.tempo.as_ref().unwrap().len(), 8);
        assert!(mt.select(vec![0usize, 3]).is_err());
    }

    #[test]
    fn test_slice_range_of_tracks() {
        let mt = three_tracks().with_downbeat_steps(&[0, 4]);
        let sub = mt.slice(1usize..3, 2..6).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.tracks[0].name, "b");
        assert_eq!(sub.tracks[0].len(), 4);
        assert!(sub.tracks[0].pianoroll.is_active(0, 40));
        assert_eq!(sub.tracks[1].len(), 4);
        assert_eq!(sub.downbeat, Some(vec![false, false, true]));
    }

    #[test]
    fn test_display() {
        let mt = Multitrack::new()
            .with_name("song")
            .with_tempo(vec![120.0])
            .with_tracks(vec![binary_track(1, &[])]);
        assert_eq!(
            mt.to_string(),
            "Multitrack(name=\"song\", resolution=24, tempo=[120.0, ...], \
             tracks=[Track(name=\"\", program=0, is_drum=false, pianoroll=<1x128 bool>)])"
        );
    }
}
