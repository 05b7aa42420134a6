use super::Format;
use crate::model::molecule::Notation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("cannot write a {notation} structure as {format}")]
    NotationMismatch { format: Format, notation: Notation },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    /// Whether the error concerns a single record and reading may continue.
    pub fn is_record_error(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}
