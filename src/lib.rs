//! Promiscuity annotation of screening compounds from their molecular scaffolds.
//!
//! A Badapple database holds, for every scaffold seen in a body of
//! high-throughput screening data, how many compounds, substances, assays and
//! samples containing it were tested and found active. From those counts each
//! scaffold gets a promiscuity score (pScore); a molecule is scored by the
//! scaffolds it contains, so frequent hitters can be flagged before follow-up.
//!
//! # Features
//!
//! - **Database access**: PostgreSQL (with an RDKit or gNova OpenChord
//!   cartridge), MySQL and embedded file databases through one blocking
//!   [`DbCon`]
//! - **Molecule I/O**: streaming SD file and SMILES readers and writers that
//!   keep going past malformed records
//! - **Annotation**: [`process_mols`] attaches pScore, advisory and matched
//!   scaffolds to every molecule of a stream
//! - **Reports**: text summaries of a database and of single scaffolds
//!
//! # Quick Start
//!
//! ```no_run
//! use badapple::db::{ConnectionParams, DbCon};
//! use badapple::io::{Format, MolReader, MolWriter, OutputFormat};
//! use badapple::{ProcessConfig, process_mols};
//! use std::fs::File;
//! use std::io::{BufReader, stdout};
//!
//! let mut db = DbCon::connect(&ConnectionParams::default())?;
//! let reader = MolReader::new(BufReader::new(File::open("hits.sdf")?), Format::Sdf);
//! let mut writer = MolWriter::new(stdout().lock(), OutputFormat::Sdf);
//!
//! let stats = process_mols(&mut db, &ProcessConfig::default(), reader, &mut writer, |_| {})?;
//! eprintln!("{} molecules annotated", stats.annotated);
//! db.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`db`]: Connections, engines and the [`ScaffoldStore`] seam
//! - [`io`]: SD file and SMILES reading and writing
//! - [`describe`]: Database and scaffold summaries
//! - [`process_mols`]: Stream annotation, configured by [`ProcessConfig`]
//!
//! # Data Types
//!
//! - [`Molecule`]: Named structure (molfile or SMILES) with data properties
//! - [`ScaffoldRecord`]: Scaffold row with its [`ScaffoldStats`]
//! - [`Medians`]: Database medians damping the pScore ratios
//! - [`Advisory`]: `low`, `moderate` or `high` band of a pScore
//! - [`IdRange`]: Inclusive scaffold id bounds

mod annotate;
mod model;

pub mod db;
pub mod describe;
pub mod io;

pub use model::molecule::{Molecule, Molfile, Notation, Structure};
pub use model::scaffold::{
    Advisory, CompoundRef, DbMetadata, HIGH_PSCORE, IdRange, MODERATE_PSCORE, Medians,
    PSCORE_SCALE, ScaffoldRecord, ScaffoldStats, pscore,
};
pub use model::smiles::{SmilesCounts, SmilesError};

pub use annotate::{
    ADVISORY_FIELD, ANNOTATION_FIELDS, NOTE_FIELD, NSCAF_FIELD, PSCORE_FIELD, ProcessConfig,
    ProcessStats, SCAFFOLDS_FIELD, SCAFIDS_FIELD, process_mols,
};

pub use annotate::Error as ProcessError;
pub use db::{DbCon, ScaffoldStore};
