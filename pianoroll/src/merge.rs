// Stacking and merging piano rolls across tracks.
//
// A `StackedPianoroll` is the 3-D (time, pitch, track) view of several rolls
// padded to a common length. `MergeMode` reduces that stack along the track
// axis:
// - `Sum`: elementwise sum. Boolean cells count as 1, so summing binarized
//   tracks gives exact integer note counts.
// - `Max`: elementwise maximum. Stays boolean when every layer is boolean.
// - `Any`: logical OR of activity, always boolean.
//
// The mode is a closed enum; parsing a mode name is the only place an unknown
// mode can show up, and it fails there with `Error::UnknownMergeMode`.

use crate::error::{Error, Result};
use crate::roll::{N_PITCHES, Pianoroll};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How to combine several piano rolls into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    #[default]
    Sum,
    Max,
    Any,
}

impl MergeMode {
    pub const ALL: [MergeMode; 3] = [MergeMode::Sum, MergeMode::Max, MergeMode::Any];

    pub fn as_str(self) -> &'static str {
        match self {
            MergeMode::Sum => "sum",
            MergeMode::Max => "max",
            MergeMode::Any => "any",
        }
    }

    /// Reduce `layers` along the track axis. Layers shorter than the longest
    /// one read as silent past their end. No layers give an empty roll.
    pub fn reduce(self, layers: &[Pianoroll]) -> Pianoroll {
        let steps = layers.iter().map(Pianoroll::len).max().unwrap_or(0);
        match self {
            MergeMode::Sum => {
                let mut out = vec![[0.0f32; N_PITCHES]; steps];
                for layer in layers {
                    for (acc, row) in out.iter_mut().zip(layer.to_numeric_rows()) {
                        for (a, v) in acc.iter_mut().zip(row) {
                            *a += v;
                        }
                    }
                }
                Pianoroll::Numeric(out)
            }
            MergeMode::Max if !layers.is_empty() && layers.iter().all(Pianoroll::is_binary) => {
                MergeMode::Any.reduce(layers)
            }
            MergeMode::Max => {
                let mut out: Option<Vec<[f32; N_PITCHES]>> = None;
                for layer in layers {
                    let mut rows = layer.to_numeric_rows();
                    rows.resize(steps, [0.0; N_PITCHES]);
                    out = Some(match out {
                        None => rows,
                        Some(mut acc) => {
                            for (acc_row, row) in acc.iter_mut().zip(rows) {
                                for (a, v) in acc_row.iter_mut().zip(row) {
                                    *a = a.max(v);
                                }
                            }
                            acc
                        }
                    });
                }
                Pianoroll::Numeric(out.unwrap_or_default())
            }
            MergeMode::Any => {
                let mut out = vec![[false; N_PITCHES]; steps];
                for layer in layers {
                    for (acc, row) in out.iter_mut().zip(layer.to_numeric_rows()) {
                        for (a, v) in acc.iter_mut().zip(row) {
                            *a |= v != 0.0;
                        }
                    }
                }
                Pianoroll::Binary(out)
            }
        }
    }
}

impl FromStr for MergeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MergeMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnknownMergeMode(s.to_string()))
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Several piano rolls of equal length, viewed as a (time, pitch, track)
/// tensor. Layer order is track order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackedPianoroll {
    layers: Vec<Pianoroll>,
}

impl StackedPianoroll {
    /// Stack `rolls`, padding each to the longest one.
    pub fn new(rolls: impl IntoIterator<Item = Pianoroll>) -> Self {
        let mut layers: Vec<Pianoroll> = rolls.into_iter().collect();
        let steps = layers.iter().map(Pianoroll::len).max().unwrap_or(0);
        for layer in &mut layers {
            layer.pad_to(steps);
        }
        StackedPianoroll { layers }
    }

    /// `(time steps, 128, tracks)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.steps(), N_PITCHES, self.layers.len())
    }

    pub fn steps(&self) -> usize {
        self.layers.first().map_or(0, Pianoroll::len)
    }

    pub fn n_tracks(&self) -> usize {
        self.layers.len()
    }

    /// Value at `(step, pitch, track)`; 0 outside the tensor.
    pub fn get(&self, step: usize, pitch: usize, track: usize) -> f32 {
        self.layers
            .get(track)
            .map_or(0.0, |layer| layer.value(step, pitch))
    }

    pub fn layer(&self, track: usize) -> Option<&Pianoroll> {
        self.layers.get(track)
    }

    pub fn layers(&self) -> &[Pianoroll] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Pianoroll> {
        self.layers
    }

    /// Reduce along the track axis.
    pub fn merge(&self, mode: MergeMode) -> Pianoroll {
        mode.reduce(&self.layers)
    }
}
