// MIDI input into multitracks.
//
// Parses a Standard MIDI File (any format) into a Multitrack at the configured
// resolution. Every (MIDI track, channel) pair that plays at least one note
// becomes one Track with a numeric piano roll holding note velocities. The
// program is the channel's first program change, the drum flag comes from the
// drum channel and the name from the MIDI track's TrackName event.
//
// Ticks map to steps by rounding to the nearest step; a note always covers at
// least one step. The tempo curve is sampled from Tempo events and the
// downbeat array from TimeSignature events (4/4 when none are present). All
// tracks are padded to the length of the longest.
//
// The decoded length is checked against `MidiOptions::max_steps` before any
// roll is allocated: a file of a few dozen bytes can place a note billions of
// ticks out.
//
// Only metrical timing is supported; SMPTE timecode files are rejected.
//
// See also: encode.rs for the inverse.

use crate::config::MidiOptions;
use crate::error::{MidiError, Result};
use log::{debug, warn};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use pianoroll::{Multitrack, N_PITCHES, Pianoroll, Track};
use std::path::Path;

const N_CHANNELS: usize = 16;

/// A note in ticks, before quantization.
#[derive(Clone, Copy, Debug)]
struct RawNote {
    pitch: u8,
    start: u64,
    end: u64,
    velocity: u8,
}

/// The notes one channel of one MIDI track played.
#[derive(Debug)]
struct Part {
    name: String,
    channel: u8,
    program: u8,
    notes: Vec<RawNote>,
}

/// Everything collected from the file before quantization.
#[derive(Debug, Default)]
struct Collected {
    song_name: String,
    parts: Vec<Part>,
    tempos: Vec<(u64, f64)>,
    time_signatures: Vec<(u64, u8, u8)>,
}

/// Tick-to-step conversion, rounding to the nearest step.
struct Quantizer {
    resolution: u64,
    ticks_per_quarter: u64,
}

impl Quantizer {
    /// `None` when the step does not fit in `usize`.
    fn step(&self, tick: u64) -> Option<usize> {
        let scaled = tick
            .checked_mul(self.resolution)?
            .checked_add(self.ticks_per_quarter / 2)?;
        usize::try_from(scaled / self.ticks_per_quarter).ok()
    }
}

/// Read a MIDI file into a multitrack.
pub fn read_midi(path: impl AsRef<Path>, options: &MidiOptions) -> Result<Multitrack> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let multitrack = from_bytes(&bytes, options)?;
    debug!("read {} tracks from {}", multitrack.len(), path.display());
    Ok(multitrack)
}

/// Parse the bytes of a Standard MIDI File into a multitrack.
pub fn from_bytes(bytes: &[u8], options: &MidiOptions) -> Result<Multitrack> {
    let smf = Smf::parse(bytes)?;
    from_smf(&smf, options)
}

/// Convert a parsed SMF into a multitrack.
pub fn from_smf(smf: &Smf, options: &MidiOptions) -> Result<Multitrack> {
    options.validate()?;
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) if tpq.as_int() > 0 => u64::from(tpq.as_int()),
        _ => return Err(MidiError::UnsupportedTiming),
    };
    let quantizer = Quantizer {
        resolution: options.resolution as u64,
        ticks_per_quarter,
    };

    let collected = collect(smf);
    let mut length = 0;
    for note in collected.parts.iter().flat_map(|part| &part.notes) {
        match note_steps(note, &quantizer) {
            Some((_, end)) if end <= options.max_steps => length = length.max(end),
            _ => {
                return Err(MidiError::TooLong {
                    max: options.max_steps,
                });
            }
        }
    }

    let tracks: Vec<Track> = collected
        .parts
        .iter()
        .map(|part| {
            let mut roll = Pianoroll::zeros(length);
            for note in &part.notes {
                let Some((start, end)) = note_steps(note, &quantizer) else {
                    continue;
                };
                for step in start..end {
                    roll.set(step, usize::from(note.pitch), f32::from(note.velocity));
                }
            }
            Track::new(roll)
                .with_name(part.name.clone())
                .with_program(part.program)
                .with_drum(part.channel == options.drum_channel)
        })
        .collect();

    let tempo = tempo_curve(&collected.tempos, length, options.default_tempo, &quantizer);
    let downbeat = downbeats(
        &collected.time_signatures,
        length,
        options.resolution,
        &quantizer,
    );
    debug!(
        "decoded {} tracks of {} steps at resolution {}",
        tracks.len(),
        length,
        options.resolution
    );
    Ok(Multitrack::new()
        .with_name(collected.song_name)
        .with_resolution(options.resolution)
        .with_tempo(tempo)
        .with_downbeat(downbeat)
        .with_tracks(tracks))
}

/// Quantized `[start, end)` of a note, at least one step long.
fn note_steps(note: &RawNote, quantizer: &Quantizer) -> Option<(usize, usize)> {
    let start = quantizer.step(note.start)?;
    let end = quantizer.step(note.end)?.max(start.checked_add(1)?);
    Some((start, end))
}

/// Walk every MIDI track, pairing note-ons with note-offs per channel and key.
fn collect(smf: &Smf) -> Collected {
    let mut collected = Collected::default();
    for (track_index, track) in smf.tracks.iter().enumerate() {
        let mut tick = 0u64;
        let mut name = String::new();
        let mut programs = [None::<u8>; N_CHANNELS];
        let mut open = vec![[None::<(u64, u8)>; N_PITCHES]; N_CHANNELS];
        let mut notes: Vec<Vec<RawNote>> = vec![Vec::new(); N_CHANNELS];

        for event in track {
            tick += u64::from(event.delta.as_int());
            match event.kind {
                TrackEventKind::Midi { channel, message } => {
                    let ch = usize::from(channel.as_int());
                    match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            let pitch = key.as_int();
                            // A repeated note-on ends the sounding note first.
                            if let Some((start, velocity)) =
                                open[ch][usize::from(pitch)].replace((tick, vel.as_int()))
                            {
                                notes[ch].push(RawNote {
                                    pitch,
                                    start,
                                    end: tick,
                                    velocity,
                                });
                            }
                        }
                        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                            let pitch = key.as_int();
                            if let Some((start, velocity)) = open[ch][usize::from(pitch)].take() {
                                notes[ch].push(RawNote {
                                    pitch,
                                    start,
                                    end: tick,
                                    velocity,
                                });
                            }
                        }
                        MidiMessage::ProgramChange { program } => {
                            if programs[ch].is_none() {
                                programs[ch] = Some(program.as_int());
                            }
                        }
                        _ => {}
                    }
                }
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                    name = String::from_utf8_lossy(bytes).into_owned();
                }
                TrackEventKind::Meta(MetaMessage::Tempo(micros)) if micros.as_int() > 0 => {
                    collected
                        .tempos
                        .push((tick, 60_000_000.0 / f64::from(micros.as_int())));
                }
                TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, power, _, _)) => {
                    collected.time_signatures.push((tick, numerator, power));
                }
                _ => {}
            }
        }

        let mut dangling = 0;
        for (ch, keys) in open.iter().enumerate() {
            for (pitch, slot) in keys.iter().enumerate() {
                if let Some((start, velocity)) = *slot {
                    dangling += 1;
                    notes[ch].push(RawNote {
                        pitch: pitch as u8,
                        start,
                        end: tick,
                        velocity,
                    });
                }
            }
        }
        if dangling > 0 {
            warn!("MIDI track {track_index}: closed {dangling} notes still sounding at its end");
        }

        let mut any_notes = false;
        for (ch, channel_notes) in notes.into_iter().enumerate() {
            if channel_notes.is_empty() {
                continue;
            }
            any_notes = true;
            collected.parts.push(Part {
                name: name.clone(),
                channel: ch as u8,
                program: programs[ch].unwrap_or(0),
                notes: channel_notes,
            });
        }
        // A leading track without notes is a conductor track; its name is
        // the song title.
        if track_index == 0 && !any_notes {
            collected.song_name = name;
        }
    }
    collected
}

/// Per-step tempo from tempo change events. Steps before the first change use
/// `default_tempo`.
fn tempo_curve(
    changes: &[(u64, f64)],
    length: usize,
    default_tempo: f64,
    quantizer: &Quantizer,
) -> Vec<f64> {
    let mut changes: Vec<(usize, f64)> = changes
        .iter()
        .map(|&(tick, qpm)| (quantizer.step(tick).unwrap_or(usize::MAX), qpm))
        .collect();
    changes.sort_by_key(|(step, _)| *step);

    let mut tempo = vec![default_tempo; length];
    let mut pending = changes.into_iter().peekable();
    let mut current = default_tempo;
    for (step, slot) in tempo.iter_mut().enumerate() {
        while let Some(&(at, qpm)) = pending.peek() {
            if at > step {
                break;
            }
            current = qpm;
            pending.next();
        }
        *slot = current;
    }
    tempo
}

/// Downbeat array from time signature events. Each signature marks a bar
/// every `numerator * 4 / 2^power` quarter notes until the next signature.
fn downbeats(
    signatures: &[(u64, u8, u8)],
    length: usize,
    resolution: usize,
    quantizer: &Quantizer,
) -> Vec<bool> {
    let mut signatures: Vec<(usize, u8, u8)> = signatures
        .iter()
        .map(|&(tick, numerator, power)| {
            let step = quantizer.step(tick).unwrap_or(usize::MAX);
            (step, numerator, power)
        })
        .collect();
    signatures.sort_by_key(|(step, _, _)| *step);
    if signatures.first().is_none_or(|&(step, _, _)| step > 0) {
        signatures.insert(0, (0, 4, 2));
    }

    let mut downbeat = vec![false; length];
    for (i, &(start, numerator, power)) in signatures.iter().enumerate() {
        let end = signatures
            .get(i + 1)
            .map_or(length, |&(next, _, _)| next.min(length));
        let bar = usize::from(numerator)
            .checked_mul(resolution)
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| n.checked_shr(u32::from(power)))
            .unwrap_or(0);
        if bar == 0 {
            continue;
        }
        for step in (start.min(end)..end).step_by(bar) {
            downbeat[step] = true;
        }
    }
    downbeat
}
