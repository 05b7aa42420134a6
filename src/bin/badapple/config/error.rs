use std::path::PathBuf;

use thiserror::Error;

/// Option combinations the parser alone cannot reject.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("-scafid ID required for -describescaf.")]
    MissingScafId,

    #[error("-i IFILE required for -process_mols.")]
    MissingInput,

    #[error("Non-existent input file: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("-ifmt FORMAT required when reading from stdin.")]
    StdinNeedsFormat,

    #[error("Cannot infer input format of {}; use -ifmt sdf|smiles.", .0.display())]
    UnknownInputFormat(PathBuf),

    #[error("Cannot infer output format of {}; use a .sdf or .smi extension.", .0.display())]
    UnknownOutputFormat(PathBuf),
}

impl ConfigError {
    /// Errors reported as command-line usage errors with the usage line.
    pub fn is_usage(&self) -> bool {
        !matches!(self, ConfigError::InputNotFound(_))
    }
}
