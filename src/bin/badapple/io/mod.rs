pub mod infer;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::PathBuf;

use badapple::io::{MolReader, MolWriter};
use thiserror::Error;

use crate::config::{InputPath, InputSpec, OutputSpec};

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Failed to open input file: {}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create output file: {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub enum InputSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputSource::File(r) => r.read(buf),
            InputSource::Stdin(r) => r.read(buf),
        }
    }
}

impl BufRead for InputSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            InputSource::File(r) => r.fill_buf(),
            InputSource::Stdin(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            InputSource::File(r) => r.consume(amt),
            InputSource::Stdin(r) => r.consume(amt),
        }
    }
}

pub fn open_input(spec: &InputSpec) -> Result<MolReader<InputSource>, OpenError> {
    let source = match &spec.path {
        InputPath::File(path) => {
            let file = File::open(path).map_err(|source| OpenError::Input {
                path: path.clone(),
                source,
            })?;
            InputSource::File(BufReader::new(file))
        }
        InputPath::Stdin => InputSource::Stdin(BufReader::new(io::stdin())),
    };
    Ok(MolReader::new(source, spec.format))
}

pub enum OutputTarget {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::File(w) => w.write(buf),
            OutputTarget::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::File(w) => w.flush(),
            OutputTarget::Stdout(w) => w.flush(),
        }
    }
}

pub fn create_output(spec: &OutputSpec) -> Result<MolWriter<OutputTarget>, OpenError> {
    let target = match &spec.path {
        Some(path) => {
            let file = File::create(path).map_err(|source| OpenError::Output {
                path: path.clone(),
                source,
            })?;
            OutputTarget::File(BufWriter::new(file))
        }
        None => OutputTarget::Stdout(BufWriter::new(io::stdout().lock())),
    };
    Ok(MolWriter::new(target, spec.format.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use badapple::io::{Format, OutputFormat};

    #[test]
    fn reads_from_file_in_declared_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.smi");
        std::fs::write(&path, "CCO ethanol\nCCN ethylamine\n").unwrap();

        let reader = open_input(&InputSpec {
            path: InputPath::File(path),
            format: Format::Smiles,
        })
        .unwrap();
        assert_eq!(reader.count(), 2);
    }

    #[test]
    fn unwritable_output_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = OutputSpec {
            path: Some(dir.path().join("no/such/dir/out.sdf")),
            format: OutputFormat::Sdf,
        };
        assert!(matches!(create_output(&spec), Err(OpenError::Output { .. })));
    }
}
