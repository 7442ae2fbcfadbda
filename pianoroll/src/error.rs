// Error types for the piano-roll containers.
//
// Every failure is classified into one of four kinds (see `ErrorKind`):
// type mismatches (data with the wrong shape, only reachable when decoding
// foreign data since the Rust types rule most of them out), value/range
// violations, structural violations (bad track references, empty track
// lists), and I/O failures from the archive helpers.
//
// `validate()` on `Track` and `Multitrack` is the only place that walks the
// whole object graph; mutators return errors only when they cannot do their
// job otherwise (e.g. a downsample factor that does not divide the
// resolution).

use std::io;

/// Broad classification of an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Data has the wrong shape or element type.
    Type,
    /// A value lies outside its allowed range or set.
    Value,
    /// The container structure is inconsistent (missing or bad track refs).
    Structure,
    /// Reading or writing an archive failed.
    Io,
}

/// Errors produced by the piano-roll containers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{field}` has the wrong shape or type: {detail}")]
    Type { field: &'static str, detail: String },

    #[error("`{field}` is out of range: {detail}")]
    Value { field: &'static str, detail: String },

    #[error("track {index}: {source}")]
    Track {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("unknown merge mode `{0}`, expected one of `sum`, `max`, `any`")]
    UnknownMergeMode(String),

    #[error("downsample factor {factor} does not divide resolution {resolution}")]
    Downsample { factor: usize, resolution: usize },

    #[error("piano roll has no active pitch")]
    Silent,

    #[error("track index {index} is out of range for {len} tracks")]
    TrackIndex { index: usize, len: usize },

    #[error("multitrack has no tracks")]
    NoTracks,

    #[error("malformed archive: {0}")]
    Archive(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn value(field: &'static str, detail: impl Into<String>) -> Self {
        Error::Value {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn type_mismatch(field: &'static str, detail: impl Into<String>) -> Self {
        Error::Type {
            field,
            detail: detail.into(),
        }
    }

    /// Classify this error. Errors wrapped in `Error::Track` report the kind
    /// of the underlying track error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Type { .. } => ErrorKind::Type,
            Error::Value { .. }
            | Error::UnknownMergeMode(_)
            | Error::Downsample { .. }
            | Error::Silent => ErrorKind::Value,
            Error::Track { source, .. } => source.kind(),
            Error::TrackIndex { .. } | Error::NoTracks => ErrorKind::Structure,
            Error::Archive(_) | Error::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
