// Tunable parameters for MIDI conversion.
//
// `MidiOptions` gathers every constant the codec needs instead of scattering
// magic numbers through encode.rs and decode.rs. It deserializes from JSON with
// every field optional, so a config file only names what it changes:
//
//     { "resolution": 12, "default_velocity": 100 }

use crate::error::{MidiError, Result};
use pianoroll::DEFAULT_TEMPO;
use serde::{Deserialize, Serialize};

/// General MIDI percussion channel (channel 10, zero-based 9).
pub const GM_DRUM_CHANNEL: u8 = 9;

/// Longest decoded piano roll, in time steps. At the default resolution of
/// 24 this is about six hours at 120 qpm, and a numeric roll of this length
/// takes 512 MiB.
pub const DEFAULT_MAX_STEPS: usize = 1 << 20;

/// Settings shared by the encoder and decoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiOptions {
    /// Time steps per quarter note of decoded multitracks.
    pub resolution: usize,
    /// MIDI ticks per quarter note of encoded files.
    pub ticks_per_quarter: u16,
    /// Note-on velocity for cells of boolean piano rolls.
    pub default_velocity: u8,
    /// Tempo (qpm) used when a multitrack or file has none.
    pub default_tempo: f64,
    /// Zero-based channel that carries drum tracks.
    pub drum_channel: u8,
    /// Decoding fails with `MidiError::TooLong` past this many steps.
    pub max_steps: usize,
}

impl Default for MidiOptions {
    fn default() -> Self {
        MidiOptions {
            resolution: pianoroll::DEFAULT_RESOLUTION,
            ticks_per_quarter: 480,
            default_velocity: 64,
            default_tempo: DEFAULT_TEMPO,
            drum_channel: GM_DRUM_CHANNEL,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl MidiOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: MidiOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |field, detail: &str| {
            Err(MidiError::Option {
                field,
                detail: detail.to_string(),
            })
        };
        if self.resolution == 0 {
            return invalid("resolution", "must be positive");
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return invalid("ticks_per_quarter", "must be in [1, 32767]");
        }
        if self.default_velocity == 0 || self.default_velocity > 127 {
            return invalid("default_velocity", "must be in [1, 127]");
        }
        if self.default_tempo.is_nan() || self.default_tempo <= 0.0 {
            return invalid("default_tempo", "must be positive");
        }
        if self.drum_channel > 15 {
            return invalid("drum_channel", "must be in [0, 15]");
        }
        if self.max_steps == 0 {
            return invalid("max_steps", "must be positive");
        }
        Ok(())
    }
}
