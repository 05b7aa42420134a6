//! Error type for molecule processing.

use thiserror::Error;

/// Failures that abort a [`process_mols`](super::process_mols) run.
///
/// A malformed input record is not one of them: it is counted in
/// [`ProcessStats::errors`](super::ProcessStats::errors) and skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// A database query failed, including cartridge searches and
    /// structure conversion.
    #[error(transparent)]
    Db(#[from] crate::db::Error),

    /// Reading input, parsing converted structures or writing output failed.
    #[error(transparent)]
    Io(#[from] crate::io::Error),
}
