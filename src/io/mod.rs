//! Molecule file I/O: SD files and SMILES line files.
//!
//! [`MolReader`] streams [`Molecule`] records out of any [`BufRead`];
//! [`MolWriter`] writes them back in the format chosen for the output. A
//! malformed record surfaces as a [`Error::Parse`] item and the reader moves
//! on to the next record.

use std::fmt;
use std::io::{BufRead, Write};

pub mod error;

mod sdf {
    pub mod reader;
    pub mod writer;
}

mod smiles {
    pub mod reader;
    pub mod writer;
}

pub use error::Error;
pub use sdf::reader::parse_molfile;

use crate::model::molecule::{Molecule, Notation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Sdf,
    Smiles,
}

impl Format {
    pub fn notation(self) -> Notation {
        match self {
            Format::Sdf => Notation::Molfile,
            Format::Smiles => Notation::Smiles,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Smiles => write!(f, "SMILES"),
        }
    }
}

/// Columns written after the SMILES on each output line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmilesOptions {
    pub names: bool,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Sdf,
    Smiles(SmilesOptions),
}

impl OutputFormat {
    pub fn format(&self) -> Format {
        match self {
            OutputFormat::Sdf => Format::Sdf,
            OutputFormat::Smiles(_) => Format::Smiles,
        }
    }

    pub fn notation(&self) -> Notation {
        self.format().notation()
    }
}

pub enum MolReader<R> {
    Sdf(sdf::reader::Records<R>),
    Smiles(smiles::reader::Records<R>),
}

impl<R: BufRead> MolReader<R> {
    pub fn new(reader: R, format: Format) -> Self {
        match format {
            Format::Sdf => Self::Sdf(sdf::reader::Records::new(reader)),
            Format::Smiles => Self::Smiles(smiles::reader::Records::new(reader)),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Self::Sdf(_) => Format::Sdf,
            Self::Smiles(_) => Format::Smiles,
        }
    }
}

impl<R: BufRead> Iterator for MolReader<R> {
    type Item = Result<Molecule, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Sdf(r) => r.next(),
            Self::Smiles(r) => r.next(),
        }
    }
}

pub struct MolWriter<W> {
    inner: W,
    format: OutputFormat,
}

impl<W: Write> MolWriter<W> {
    pub fn new(inner: W, format: OutputFormat) -> Self {
        Self { inner, format }
    }

    pub fn notation(&self) -> Notation {
        self.format.notation()
    }

    pub fn write(&mut self, molecule: &Molecule) -> Result<(), Error> {
        match &self.format {
            OutputFormat::Sdf => sdf::writer::write(&mut self.inner, molecule),
            OutputFormat::Smiles(options) => {
                smiles::writer::write(&mut self.inner, molecule, options)
            }
        }
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
