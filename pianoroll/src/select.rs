// Track and time selection.
//
// A multitrack can be cut along two axes at once: which tracks to keep
// (`TrackSelector`) and which time steps to keep (`StepRange`). The time
// window is resolved once from the caller's range and the very same
// `StepRange` value is applied to every track's piano roll, to the tempo
// curve and to the downbeat flags. Each sequence clamps the window to its own
// length, the way sequence slicing behaves, so sequences of different length
// stay aligned at their shared prefix.
//
// See also: `multitrack.rs` (`select`, `slice`, `remove_tracks`,
// `merge_tracks`), `track.rs` (`Track::slice`).

use crate::error::{Error, Result};
use std::ops::{Bound, Range, RangeBounds, RangeFull};

/// A half-open window over the time axis, resolved from any Rust range.
///
/// `end == None` means "to the end of whatever sequence it is applied to".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRange {
    start: usize,
    end: Option<usize>,
}

impl StepRange {
    pub fn new(bounds: impl RangeBounds<usize>) -> Self {
        let start = match bounds.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match bounds.end_bound() {
            Bound::Included(&e) => Some(e.saturating_add(1)),
            Bound::Excluded(&e) => Some(e),
            Bound::Unbounded => None,
        };
        StepRange { start, end }
    }

    /// The window covering every step.
    pub fn full() -> Self {
        StepRange {
            start: 0,
            end: None,
        }
    }

    /// Concrete index range for a sequence of `len` items. Never panics:
    /// bounds past the end are clamped and an inverted window is empty.
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let end = self.end.map_or(len, |e| e.min(len));
        let start = self.start.min(end);
        start..end
    }

    /// Copy the items inside the window.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items[self.bounds(items.len())].to_vec()
    }
}

impl Default for StepRange {
    fn default() -> Self {
        StepRange::full()
    }
}

/// Which tracks of a multitrack an operation addresses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackSelector {
    /// Every track, in order.
    #[default]
    All,
    /// A single track.
    One(usize),
    /// An explicit list, visited in the given order.
    Many(Vec<usize>),
    /// A contiguous run of tracks; clamped to the track count.
    Range(Range<usize>),
}

impl TrackSelector {
    pub fn is_all(&self) -> bool {
        matches!(self, TrackSelector::All)
    }

    /// Resolve to track positions for a list of `len` tracks. Explicit
    /// indices past the end are an error; ranges are clamped.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>> {
        let check = |index: usize| {
            if index < len {
                Ok(index)
            } else {
                Err(Error::TrackIndex { index, len })
            }
        };
        match self {
            TrackSelector::All => Ok((0..len).collect()),
            TrackSelector::One(index) => Ok(vec![check(*index)?]),
            TrackSelector::Many(indices) => indices.iter().map(|&i| check(i)).collect(),
            TrackSelector::Range(range) => Ok(clamp_range(range, len).collect()),
        }
    }

    /// Whether position `index` is addressed. Unlike `resolve`, indices past
    /// the end simply never match.
    pub fn contains(&self, index: usize) -> bool {
        match self {
            TrackSelector::All => true,
            TrackSelector::One(i) => *i == index,
            TrackSelector::Many(indices) => indices.contains(&index),
            TrackSelector::Range(range) => range.contains(&index),
        }
    }
}

fn clamp_range(range: &Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

impl From<usize> for TrackSelector {
    fn from(index: usize) -> Self {
        TrackSelector::One(index)
    }
}

impl From<Vec<usize>> for TrackSelector {
    fn from(indices: Vec<usize>) -> Self {
        TrackSelector::Many(indices)
    }
}

impl From<&[usize]> for TrackSelector {
    fn from(indices: &[usize]) -> Self {
        TrackSelector::Many(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TrackSelector {
    fn from(indices: [usize; N]) -> Self {
        TrackSelector::Many(indices.to_vec())
    }
}

impl From<Range<usize>> for TrackSelector {
    fn from(range: Range<usize>) -> Self {
        TrackSelector::Range(range)
    }
}

impl From<RangeFull> for TrackSelector {
    fn from(_: RangeFull) -> Self {
        TrackSelector::All
    }
}
