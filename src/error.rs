use std::error::Error as StdError;

use thiserror::Error;

/// cuetrack's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// cuetrack's crate-wide error type.
///
/// A missing active segment is never an error; resolvers return `Option` for that.
/// This type covers loading, editing, and exporting transcripts.
///
/// Kept independent of `anyhow` so downstream libraries aren't forced to adopt it
/// in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// A single segment breaks its own invariants (`end > start`, finite times, non-empty text).
    #[error("invalid segment '{id}': {reason}")]
    InvalidSegment { id: String, reason: String },

    /// The sequence as a whole is unsorted or overlapping and strict ingestion was requested.
    #[error("malformed transcript: {0}")]
    Malformed(String),

    /// An edit referenced a segment id that the transcript does not contain.
    #[error("unknown segment '{0}'")]
    UnknownSegment(String),

    #[error("cannot write segment: encoder is already closed")]
    EncoderClosed,

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn invalid_segment(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Bail out of a validation routine with [`Error::InvalidSegment`] when `$cond` is false.
macro_rules! ensure_segment {
    ($cond:expr, $id:expr, $reason:expr) => {
        if !$cond {
            return Err($crate::error::Error::invalid_segment($id.clone(), $reason));
        }
    };
}

pub(crate) use ensure_segment;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_segment_names_the_segment() {
        let err = Error::invalid_segment("seg-3", "end must be after start");
        assert_eq!(
            err.to_string(),
            "invalid segment 'seg-3': end must be after start"
        );
    }

    #[test]
    fn anyhow_errors_keep_their_context_chain() {
        let err: Error = anyhow::anyhow!("root cause").context("loading").into();
        assert_eq!(err.to_string(), "loading: root cause");
    }
}
