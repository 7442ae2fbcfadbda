// The piano-roll matrix.
//
// A piano roll is a (time steps x 128 pitches) matrix. Rows are time steps,
// columns are MIDI pitches 0..=127, and a nonzero cell means the pitch is
// sounding at that step. Rows are stored as fixed-size `[T; 128]` arrays, so
// the 128-column shape holds by construction and only the time dimension
// varies.
//
// Two storage variants exist:
// - `Binary`: boolean activations, the result of binarizing.
// - `Numeric`: intensities, usually MIDI velocities in 0..=127.
//
// Most transforms are written once as generic helpers over `[T; 128]` rows
// and dispatched to either variant through `for_each_variant!`.
//
// See also: `track.rs` (metadata + per-track API on top of this), `merge.rs`
// (stacking and reducing several rolls).

use crate::select::StepRange;

/// Number of MIDI pitches, i.e. the fixed column count of every piano roll.
pub const N_PITCHES: usize = 128;

/// A piano-roll matrix with either boolean or numeric cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Pianoroll {
    Binary(Vec<[bool; N_PITCHES]>),
    Numeric(Vec<[f32; N_PITCHES]>),
}

macro_rules! for_each_variant {
    ($roll:expr, $rows:ident => $body:expr) => {
        match $roll {
            Pianoroll::Binary($rows) => $body,
            Pianoroll::Numeric($rows) => $body,
        }
    };
}

impl Default for Pianoroll {
    fn default() -> Self {
        Pianoroll::Numeric(Vec::new())
    }
}

impl Pianoroll {
    /// An all-zero numeric roll with `steps` rows.
    pub fn zeros(steps: usize) -> Self {
        Pianoroll::Numeric(vec![[0.0; N_PITCHES]; steps])
    }

    /// An all-false binary roll with `steps` rows.
    pub fn binary_zeros(steps: usize) -> Self {
        Pianoroll::Binary(vec![[false; N_PITCHES]; steps])
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        for_each_variant!(self, rows => rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the storage is boolean. See `has_binary_values` for the
    /// value-based check.
    pub fn is_binary(&self) -> bool {
        matches!(self, Pianoroll::Binary(_))
    }

    /// True if every entry is 0 or 1 (always true for boolean storage).
    pub fn has_binary_values(&self) -> bool {
        match self {
            Pianoroll::Binary(_) => true,
            Pianoroll::Numeric(rows) => rows
                .iter()
                .flatten()
                .all(|&v| v == 0.0 || v == 1.0),
        }
    }

    /// Cell value as a number (`true` reads as 1.0). Out-of-range
    /// coordinates read as 0.
    pub fn value(&self, step: usize, pitch: usize) -> f32 {
        if pitch >= N_PITCHES {
            return 0.0;
        }
        match self {
            Pianoroll::Binary(rows) => rows
                .get(step)
                .map_or(0.0, |r| f32::from(u8::from(r[pitch]))),
            Pianoroll::Numeric(rows) => rows.get(step).map_or(0.0, |r| r[pitch]),
        }
    }

    pub fn is_active(&self, step: usize, pitch: usize) -> bool {
        self.value(step, pitch) != 0.0
    }

    /// Set one cell. For boolean storage any nonzero `value` becomes `true`.
    ///
    /// Panics if `step` or `pitch` is out of range.
    pub fn set(&mut self, step: usize, pitch: usize, value: f32) {
        match self {
            Pianoroll::Binary(rows) => rows[step][pitch] = value != 0.0,
            Pianoroll::Numeric(rows) => rows[step][pitch] = value,
        }
    }

    /// True if no cell is active.
    pub fn is_silent(&self) -> bool {
        self.active_length() == 0
    }

    /// One past the last step with any active pitch; 0 for a silent roll.
    pub fn active_length(&self) -> usize {
        for_each_variant!(self, rows => active_length(rows))
    }

    /// Lowest and highest active pitch over all steps, or `None` if silent.
    pub fn active_pitch_range(&self) -> Option<(u8, u8)> {
        for_each_variant!(self, rows => active_pitch_range(rows))
    }

    /// Rows converted to numbers, `true` as 1.0.
    pub fn to_numeric_rows(&self) -> Vec<[f32; N_PITCHES]> {
        match self {
            Pianoroll::Binary(rows) => binary_to_numeric(rows),
            Pianoroll::Numeric(rows) => rows.clone(),
        }
    }

    /// Overwrite every active cell with `value`. A boolean roll becomes
    /// numeric; a numeric roll stays numeric.
    pub fn assign_constant(&mut self, value: f32) {
        match self {
            Pianoroll::Binary(rows) => {
                let numeric = rows
                    .iter()
                    .map(|row| row.map(|on| if on { value } else { 0.0 }))
                    .collect();
                *self = Pianoroll::Numeric(numeric);
            }
            Pianoroll::Numeric(rows) => {
                for v in rows.iter_mut().flatten() {
                    if *v != 0.0 {
                        *v = value;
                    }
                }
            }
        }
    }

    /// Replace the roll with a boolean one: `value > threshold`.
    pub fn binarize(&mut self, threshold: f32) {
        let binary = match self {
            Pianoroll::Binary(rows) => rows
                .iter()
                .map(|row| row.map(|on| f32::from(u8::from(on)) > threshold))
                .collect(),
            Pianoroll::Numeric(rows) => rows
                .iter()
                .map(|row| row.map(|v| v > threshold))
                .collect(),
        };
        *self = Pianoroll::Binary(binary);
    }

    /// Clamp every cell into `[lower, upper]`. A boolean roll is promoted to
    /// numeric 0/1 first. If `lower > upper` every cell becomes `upper`.
    pub fn clip(&mut self, lower: f32, upper: f32) {
        let mut rows = match std::mem::take(self) {
            Pianoroll::Binary(rows) => binary_to_numeric(&rows),
            Pianoroll::Numeric(rows) => rows,
        };
        for v in rows.iter_mut().flatten() {
            *v = v.max(lower).min(upper);
        }
        *self = Pianoroll::Numeric(rows);
    }

    /// Append `n` silent steps.
    pub fn pad(&mut self, n: usize) {
        for_each_variant!(self, rows => pad_rows(rows, n))
    }

    /// Pad with silent steps up to `len`; longer rolls are left alone.
    pub fn pad_to(&mut self, len: usize) {
        let current = self.len();
        if current < len {
            self.pad(len - current);
        }
    }

    /// Drop every step at index `len` and beyond.
    pub fn truncate(&mut self, len: usize) {
        for_each_variant!(self, rows => rows.truncate(len))
    }

    /// Keep steps 0, factor, 2*factor, ...
    ///
    /// Panics if `factor` is zero; callers check it first.
    pub(crate) fn decimate(&mut self, factor: usize) {
        for_each_variant!(self, rows => {
            *rows = rows.iter().step_by(factor).copied().collect();
        })
    }

    /// Shift every pitch by `semitone`. Pitches pushed outside 0..=127 are
    /// dropped.
    pub fn transpose(&mut self, semitone: i32) {
        for_each_variant!(self, rows => shift_rows(rows, semitone))
    }

    /// Copy of the steps inside `window`.
    pub fn slice(&self, window: StepRange) -> Self {
        match self {
            Pianoroll::Binary(rows) => Pianoroll::Binary(window.apply(rows)),
            Pianoroll::Numeric(rows) => Pianoroll::Numeric(window.apply(rows)),
        }
    }

    /// Silence every pitch column not listed in `pitches`.
    pub fn keep_pitches(&mut self, pitches: &[u8]) {
        let mut keep = [false; N_PITCHES];
        for &p in pitches {
            if let Some(slot) = keep.get_mut(usize::from(p)) {
                *slot = true;
            }
        }
        for_each_variant!(self, rows => mask_columns(rows, &keep))
    }
}

fn active_length<T: Copy + Default + PartialEq>(rows: &[[T; N_PITCHES]]) -> usize {
    let zero = T::default();
    rows.iter()
        .rposition(|row| row.iter().any(|v| *v != zero))
        .map_or(0, |last| last + 1)
}

fn active_pitch_range<T: Copy + Default + PartialEq>(
    rows: &[[T; N_PITCHES]],
) -> Option<(u8, u8)> {
    let zero = T::default();
    let column_active = |pitch: usize| rows.iter().any(|row| row[pitch] != zero);
    let low = (0..N_PITCHES).find(|&p| column_active(p))?;
    let high = (0..N_PITCHES).rev().find(|&p| column_active(p))?;
    Some((u8::try_from(low).ok()?, u8::try_from(high).ok()?))
}

fn binary_to_numeric(rows: &[[bool; N_PITCHES]]) -> Vec<[f32; N_PITCHES]> {
    rows.iter()
        .map(|row| row.map(|on| if on { 1.0 } else { 0.0 }))
        .collect()
}

fn pad_rows<T: Copy + Default>(rows: &mut Vec<[T; N_PITCHES]>, n: usize) {
    rows.resize(rows.len() + n, [T::default(); N_PITCHES]);
}

fn shift_rows<T: Copy + Default>(rows: &mut [[T; N_PITCHES]], semitone: i32) {
    if semitone == 0 {
        return;
    }
    let zero = T::default();
    let shift = usize::try_from(semitone.unsigned_abs()).unwrap_or(N_PITCHES);
    for row in rows.iter_mut() {
        if shift >= N_PITCHES {
            row.fill(zero);
        } else if semitone > 0 {
            row.copy_within(..N_PITCHES - shift, shift);
            row[..shift].fill(zero);
        } else {
            row.copy_within(shift.., 0);
            row[N_PITCHES - shift..].fill(zero);
        }
    }
}

fn mask_columns<T: Copy + Default>(rows: &mut [[T; N_PITCHES]], keep: &[bool; N_PITCHES]) {
    let zero = T::default();
    for row in rows.iter_mut() {
        for (cell, &kept) in row.iter_mut().zip(keep) {
            if !kept {
                *cell = zero;
            }
        }
    }
}
