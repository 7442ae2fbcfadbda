// MIDI output from multitracks.
//
// Converts a Multitrack into a Standard MIDI File (SMF format 1). Track 0 is
// the conductor track: the multitrack name, a tempo event at step 0 and at
// every step where the tempo curve changes, and a time signature wherever the
// bar length implied by the downbeat array changes. Each roll track follows as
// its own MIDI track with a name, a program change and its notes.
//
// A note is a run of identical nonzero values in one pitch column, so a change
// of velocity mid-note re-triggers the key. Boolean rolls play at the
// configured default velocity. Drum tracks use the drum channel; melodic
// tracks take the remaining channels in order, wrapping after 16.
//
// See also: decode.rs for the inverse, config.rs for the tunable constants.

use crate::config::MidiOptions;
use crate::error::{MidiError, Result};
use log::debug;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track as MidiTrack, TrackEvent,
    TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use pianoroll::{Multitrack, N_PITCHES, Pianoroll, Track};
use std::path::Path;

/// Largest delta a single track event can carry (28 bits).
const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Largest tempo value a Tempo meta event can carry (24 bits).
const MAX_TEMPO_MICROS: f64 = 16_777_215.0;

/// A note derived from a run of equal values in one pitch column.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Note {
    pitch: u8,
    start: usize,
    end: usize,
    velocity: u8,
}

/// Convert a multitrack to MIDI and write it to a file.
pub fn write_midi(
    multitrack: &Multitrack,
    path: impl AsRef<Path>,
    options: &MidiOptions,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(multitrack, options)?;
    std::fs::write(path, &bytes)?;
    debug!("wrote {} bytes of MIDI to {}", bytes.len(), path.display());
    Ok(())
}

/// Convert a multitrack to the bytes of a Standard MIDI File.
pub fn to_bytes(multitrack: &Multitrack, options: &MidiOptions) -> Result<Vec<u8>> {
    let smf = to_smf(multitrack, options)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Convert a multitrack to an in-memory SMF.
///
/// The result borrows track names from `multitrack`. Fails if the multitrack
/// or the options do not validate, or with `MidiError::GapTooLong` if two
/// consecutive events of a track lie further apart than a delta can encode.
pub fn to_smf<'a>(multitrack: &'a Multitrack, options: &MidiOptions) -> Result<Smf<'a>> {
    options.validate()?;
    multitrack.validate()?;

    let clock = Clock {
        resolution: multitrack.resolution as u64,
        ticks_per_quarter: u64::from(options.ticks_per_quarter),
    };
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(options.ticks_per_quarter)),
    ));
    smf.tracks.push(conductor_track(multitrack, options, &clock)?);

    let mut channels = ChannelAllocator::new(options.drum_channel);
    for track in &multitrack.tracks {
        let channel = if track.is_drum {
            options.drum_channel
        } else {
            channels.next_melodic()
        };
        smf.tracks.push(note_track(track, u4::new(channel), options, &clock)?);
    }
    debug!(
        "encoded {} tracks at {} ticks per quarter",
        multitrack.len(),
        options.ticks_per_quarter
    );
    Ok(smf)
}

/// Step-to-tick conversion.
struct Clock {
    resolution: u64,
    ticks_per_quarter: u64,
}

impl Clock {
    fn tick(&self, step: usize) -> u64 {
        step as u64 * self.ticks_per_quarter / self.resolution
    }
}

/// Hands out MIDI channels for melodic tracks, never the drum channel.
struct ChannelAllocator {
    drum: u8,
    next: u8,
}

impl ChannelAllocator {
    fn new(drum: u8) -> Self {
        ChannelAllocator { drum, next: 0 }
    }

    fn next_melodic(&mut self) -> u8 {
        if self.next == self.drum {
            self.next = (self.next + 1) % 16;
        }
        let channel = self.next;
        self.next = (self.next + 1) % 16;
        channel
    }
}

/// Turn absolute-tick events into a delta-timed track ending in EndOfTrack.
/// Events must already be sorted by tick.
fn into_track<'a>(events: Vec<(u64, TrackEventKind<'a>)>) -> Result<MidiTrack<'a>> {
    let mut track = Vec::with_capacity(events.len() + 1);
    let mut last_tick = 0;
    for (tick, kind) in events {
        let ticks = tick - last_tick;
        let delta = u32::try_from(ticks)
            .ok()
            .filter(|&delta| u64::from(delta) <= MAX_DELTA)
            .ok_or(MidiError::GapTooLong { ticks })?;
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(track)
}

fn tempo_event<'a>(qpm: f64) -> TrackEventKind<'a> {
    let micros = (60_000_000.0 / qpm).round().clamp(1.0, MAX_TEMPO_MICROS);
    TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros as u32)))
}

fn conductor_track<'a>(
    multitrack: &'a Multitrack,
    options: &MidiOptions,
    clock: &Clock,
) -> Result<MidiTrack<'a>> {
    let mut events = Vec::new();
    if !multitrack.name.is_empty() {
        events.push((
            0,
            TrackEventKind::Meta(MetaMessage::TrackName(multitrack.name.as_bytes())),
        ));
    }

    let downbeats = multitrack.downbeat_steps();
    for (step, numerator, power) in time_signatures(&downbeats, multitrack.resolution) {
        events.push((
            clock.tick(step),
            TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, power, 24, 8)),
        ));
    }

    match multitrack.tempo.as_deref() {
        Some(tempo) if !tempo.is_empty() => {
            let mut previous = None;
            for (step, &qpm) in tempo.iter().enumerate() {
                if previous != Some(qpm) {
                    events.push((clock.tick(step), tempo_event(qpm)));
                    previous = Some(qpm);
                }
            }
        }
        _ => events.push((0, tempo_event(options.default_tempo))),
    }

    events.sort_by_key(|(tick, _)| *tick);
    into_track(events)
}

/// Time signatures implied by downbeat spacing, as `(step, numerator,
/// log2 denominator)`. A signature is emitted at each downbeat whose bar
/// length differs from the previous bar. Bars that are not a whole number of
/// quarter, eighth or sixteenth notes produce no event.
fn time_signatures(downbeats: &[usize], resolution: usize) -> Vec<(usize, u8, u8)> {
    let mut signatures = Vec::new();
    let mut previous_bar = None;
    for pair in downbeats.windows(2) {
        let (start, bar) = (pair[0], pair[1] - pair[0]);
        if previous_bar == Some(bar) {
            continue;
        }
        previous_bar = Some(bar);
        if let Some((numerator, power)) = meter(bar, resolution) {
            signatures.push((start, numerator, power));
        }
    }
    signatures
}

/// Express a bar of `bar` steps as a meter over a quarter, eighth or
/// sixteenth note denominator.
fn meter(bar: usize, resolution: usize) -> Option<(u8, u8)> {
    for power in 2..=4u8 {
        let whole = resolution * 4;
        let divisor = 1usize << power;
        if whole % divisor != 0 {
            break;
        }
        let unit = whole / divisor;
        if bar % unit == 0 {
            return u8::try_from(bar / unit).ok().map(|numerator| (numerator, power));
        }
    }
    None
}

fn note_track<'a>(
    track: &'a Track,
    channel: u4,
    options: &MidiOptions,
    clock: &Clock,
) -> Result<MidiTrack<'a>> {
    let mut events = Vec::new();
    if !track.name.is_empty() {
        events.push((
            0,
            0,
            TrackEventKind::Meta(MetaMessage::TrackName(track.name.as_bytes())),
        ));
    }
    events.push((
        0,
        0,
        TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(track.program.min(127)),
            },
        },
    ));

    // Offs sort before ons at the same tick so a re-triggered key is released
    // before it sounds again.
    for note in notes(&track.pianoroll, options.default_velocity) {
        let key = u7::new(note.pitch);
        events.push((
            clock.tick(note.start),
            2,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(note.velocity),
                },
            },
        ));
        events.push((
            clock.tick(note.end),
            1,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        ));
    }

    events.sort_by_key(|(tick, order, _)| (*tick, *order));
    into_track(events.into_iter().map(|(tick, _, kind)| (tick, kind)).collect())
}

/// Note-on velocity for a cell value.
fn velocity(roll: &Pianoroll, value: f32, default_velocity: u8) -> u8 {
    if roll.is_binary() {
        default_velocity
    } else {
        value.round().clamp(1.0, 127.0) as u8
    }
}

/// Scan each pitch column for runs of equal nonzero values.
fn notes(roll: &Pianoroll, default_velocity: u8) -> Vec<Note> {
    let len = roll.len();
    let mut notes = Vec::new();
    for pitch in 0..N_PITCHES {
        let mut open: Option<(usize, f32)> = None;
        for step in 0..=len {
            let value = if step < len { roll.value(step, pitch) } else { 0.0 };
            if let Some((start, held)) = open {
                if value == held {
                    continue;
                }
                notes.push(Note {
                    pitch: pitch as u8,
                    start,
                    end: step,
                    velocity: velocity(roll, held, default_velocity),
                });
                open = None;
            }
            if value != 0.0 {
                open = Some((step, value));
            }
        }
    }
    notes
}
