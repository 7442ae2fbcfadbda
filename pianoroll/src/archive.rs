// JSON archive format for multitracks.
//
// A multitrack is written as a JSON object listing its attributes as named,
// independent arrays: `resolution`, `tempo`, `downbeat`, `name`, and per track
// `name`, `program`, `is_drum` and a sparse `pianoroll`. Piano rolls are
// stored in coordinate form (`steps[i]`, `pitches[i]`, `values[i]` for every
// active cell, plus the full `shape`), which keeps mostly-silent rolls small.
// Boolean rolls carry no `values` array.
//
// Loading checks the sparse arrays against the declared shape, since archives
// may come from other tools: a column count other than 128 or mismatched array
// lengths is a type error, coordinates outside the shape are a value error. A
// roll longer than `MAX_ARCHIVE_STEPS` is a value error in both directions,
// checked before any rows are allocated.
//
// JSON has no encoding for infinities or NaN, so saving refuses non-finite
// cell values and tempos instead of writing `null`. Everything that saves
// loads back equal, for every attribute of `Multitrack` and `Track`.

use crate::error::{Error, Result};
use crate::multitrack::Multitrack;
use crate::roll::{N_PITCHES, Pianoroll};
use crate::track::Track;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Longest piano roll an archive may hold, in time steps. A numeric roll of
/// this length takes 512 MiB in memory.
pub const MAX_ARCHIVE_STEPS: usize = 1 << 20;

#[derive(Debug, Serialize, Deserialize)]
struct ArchivedMultitrack {
    #[serde(default)]
    name: String,
    resolution: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tempo: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    downbeat: Option<Vec<bool>>,
    #[serde(default)]
    tracks: Vec<ArchivedTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArchivedTrack {
    #[serde(default)]
    name: String,
    #[serde(default)]
    program: u8,
    #[serde(default)]
    is_drum: bool,
    pianoroll: SparseRoll,
}

/// Coordinate-list form of a piano roll.
#[derive(Debug, Serialize, Deserialize)]
struct SparseRoll {
    /// `[time steps, pitches]`.
    shape: [usize; 2],
    binary: bool,
    steps: Vec<usize>,
    pitches: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<f32>,
}

impl SparseRoll {
    fn encode(roll: &Pianoroll) -> Result<Self> {
        check_length(roll.len())?;
        let mut sparse = SparseRoll {
            shape: [roll.len(), N_PITCHES],
            binary: roll.is_binary(),
            steps: Vec::new(),
            pitches: Vec::new(),
            values: Vec::new(),
        };
        match roll {
            Pianoroll::Binary(rows) => {
                for (step, row) in rows.iter().enumerate() {
                    for (pitch, _) in row.iter().enumerate().filter(|(_, on)| **on) {
                        sparse.steps.push(step);
                        sparse.pitches.push(pitch);
                    }
                }
            }
            Pianoroll::Numeric(rows) => {
                for (step, row) in rows.iter().enumerate() {
                    for (pitch, &v) in row.iter().enumerate().filter(|(_, v)| **v != 0.0) {
                        if !v.is_finite() {
                            return Err(Error::value(
                                "pianoroll",
                                format!("cell ({step}, {pitch}) holds non-finite value {v}"),
                            ));
                        }
                        sparse.steps.push(step);
                        sparse.pitches.push(pitch);
                        sparse.values.push(v);
                    }
                }
            }
        }
        Ok(sparse)
    }

    fn decode(&self) -> Result<Pianoroll> {
        let [n_steps, n_pitches] = self.shape;
        if n_pitches != N_PITCHES {
            return Err(Error::type_mismatch(
                "pianoroll",
                format!("expected {N_PITCHES} pitch columns, found {n_pitches}"),
            ));
        }
        check_length(n_steps)?;
        if self.pitches.len() != self.steps.len()
            || (!self.binary && self.values.len() != self.steps.len())
        {
            return Err(Error::type_mismatch(
                "pianoroll",
                format!(
                    "coordinate arrays differ in length ({} steps, {} pitches, {} values)",
                    self.steps.len(),
                    self.pitches.len(),
                    self.values.len()
                ),
            ));
        }
        let mut roll = if self.binary {
            Pianoroll::binary_zeros(n_steps)
        } else {
            Pianoroll::zeros(n_steps)
        };
        for (i, (&step, &pitch)) in self.steps.iter().zip(&self.pitches).enumerate() {
            if step >= n_steps || pitch >= N_PITCHES {
                return Err(Error::value(
                    "pianoroll",
                    format!("cell ({step}, {pitch}) lies outside shape ({n_steps}, {N_PITCHES})"),
                ));
            }
            let value = if self.binary { 1.0 } else { self.values[i] };
            roll.set(step, pitch, value);
        }
        Ok(roll)
    }
}

fn check_length(n_steps: usize) -> Result<()> {
    if n_steps > MAX_ARCHIVE_STEPS {
        return Err(Error::value(
            "pianoroll",
            format!("{n_steps} time steps exceed the archive limit of {MAX_ARCHIVE_STEPS}"),
        ));
    }
    Ok(())
}

impl ArchivedMultitrack {
    fn encode(multitrack: &Multitrack) -> Result<Self> {
        if let Some(tempo) = &multitrack.tempo {
            if let Some((step, value)) = tempo.iter().enumerate().find(|(_, t)| !t.is_finite()) {
                return Err(Error::value(
                    "tempo",
                    format!("step {step} has non-finite tempo {value}"),
                ));
            }
        }
        let tracks = multitrack
            .tracks
            .iter()
            .enumerate()
            .map(|(index, track)| {
                let pianoroll = SparseRoll::encode(&track.pianoroll).map_err(|source| Error::Track {
                    index,
                    source: Box::new(source),
                })?;
                Ok(ArchivedTrack {
                    name: track.name.clone(),
                    program: track.program,
                    is_drum: track.is_drum,
                    pianoroll,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ArchivedMultitrack {
            name: multitrack.name.clone(),
            resolution: multitrack.resolution,
            tempo: multitrack.tempo.clone(),
            downbeat: multitrack.downbeat.clone(),
            tracks,
        })
    }

    fn decode(self) -> Result<Multitrack> {
        let tracks = self
            .tracks
            .into_iter()
            .enumerate()
            .map(|(index, archived)| {
                let pianoroll = archived.pianoroll.decode().map_err(|source| Error::Track {
                    index,
                    source: Box::new(source),
                })?;
                Ok(Track {
                    name: archived.name,
                    program: archived.program,
                    is_drum: archived.is_drum,
                    pianoroll,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Multitrack {
            name: self.name,
            resolution: self.resolution,
            tempo: self.tempo,
            downbeat: self.downbeat,
            tracks,
        })
    }
}

/// Serialize `multitrack` as JSON into `writer`.
///
/// Fails before writing anything if a roll is too long or holds a
/// non-finite value, or if the tempo is non-finite.
pub fn to_writer<W: Write>(multitrack: &Multitrack, writer: W) -> Result<()> {
    serde_json::to_writer(writer, &ArchivedMultitrack::encode(multitrack)?)?;
    Ok(())
}

/// Serialize `multitrack` to a JSON string.
pub fn to_json(multitrack: &Multitrack) -> Result<String> {
    Ok(serde_json::to_string(&ArchivedMultitrack::encode(multitrack)?)?)
}

/// Read a multitrack from JSON.
pub fn from_reader<R: Read>(reader: R) -> Result<Multitrack> {
    let archived: ArchivedMultitrack = serde_json::from_reader(reader)?;
    archived.decode()
}

/// Parse a multitrack from a JSON string.
pub fn from_json(json: &str) -> Result<Multitrack> {
    let archived: ArchivedMultitrack = serde_json::from_str(json)?;
    archived.decode()
}

/// Write `multitrack` to a JSON archive file.
pub fn save(multitrack: &Multitrack, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    to_writer(multitrack, &mut writer)?;
    writer.flush()?;
    debug!(
        "saved multitrack with {} tracks to {}",
        multitrack.len(),
        path.display()
    );
    Ok(())
}

/// Load a multitrack from a JSON archive file.
pub fn load(path: impl AsRef<Path>) -> Result<Multitrack> {
    let path = path.as_ref();
    let multitrack = from_reader(BufReader::new(File::open(path)?))?;
    debug!(
        "loaded multitrack with {} tracks from {}",
        multitrack.len(),
        path.display()
    );
    Ok(multitrack)
}
