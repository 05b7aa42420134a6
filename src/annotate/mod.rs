//! Scaffold-based promiscuity annotation of molecule streams.
//!
//! [`process_mols`] reads molecules, looks up the database scaffolds each one
//! contains and writes it back with Badapple properties attached:
//!
//! | Property | Value |
//! |---|---|
//! | [`PSCORE_FIELD`] | highest pScore of the matched scaffolds |
//! | [`ADVISORY_FIELD`] | `low`, `moderate` or `high` for that score |
//! | [`NSCAF_FIELD`] | number of matched scaffolds |
//! | [`SCAFIDS_FIELD`] | matched scaffold ids, comma separated |
//! | [`SCAFFOLDS_FIELD`] | matched scaffold SMILES, joined with `.` |
//! | [`NOTE_FIELD`] | why a molecule was not annotated |

mod config;
mod error;

pub use config::ProcessConfig;
pub use error::Error;

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::db::{self, ScaffoldStore};
use crate::io::{MolReader, MolWriter, parse_molfile};
use crate::model::molecule::{Molecule, Notation, Structure};
use crate::model::scaffold::{Advisory, Medians, ScaffoldRecord};

pub const PSCORE_FIELD: &str = "BADAPPLE_PSCORE_MAX";
pub const ADVISORY_FIELD: &str = "BADAPPLE_ADVISORY";
pub const NSCAF_FIELD: &str = "BADAPPLE_NSCAF";
pub const SCAFIDS_FIELD: &str = "BADAPPLE_SCAFIDS";
pub const SCAFFOLDS_FIELD: &str = "BADAPPLE_SCAFFOLDS";
pub const NOTE_FIELD: &str = "BADAPPLE_NOTE";

/// Every property a processed molecule may carry, in output column order.
pub const ANNOTATION_FIELDS: [&str; 6] = [
    PSCORE_FIELD,
    ADVISORY_FIELD,
    NSCAF_FIELD,
    SCAFIDS_FIELD,
    SCAFFOLDS_FIELD,
    NOTE_FIELD,
];

/// Counters for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Records pulled from the input, including skipped and malformed ones.
    pub read: usize,
    pub skipped: usize,
    /// Over the atom or ring limit; written with a note.
    pub filtered: usize,
    /// At least one scaffold matched.
    pub annotated: usize,
    /// Searched, no scaffold matched.
    pub unmatched: usize,
    /// Malformed input records.
    pub errors: usize,
    pub written: usize,
}

impl ProcessStats {
    /// Records past the skip count.
    pub fn processed(&self) -> usize {
        self.read - self.skipped
    }
}

/// Annotates every molecule from `reader` and writes it to `writer`.
///
/// The first `nskip` records are read and dropped; after that at most `nmax`
/// records are processed (`0` for all). Malformed records are logged,
/// counted and dropped. `observe` is called after every record.
pub fn process_mols<S, R, W, F>(
    store: &mut S,
    config: &ProcessConfig,
    mut reader: MolReader<R>,
    writer: &mut MolWriter<W>,
    mut observe: F,
) -> Result<ProcessStats, Error>
where
    S: ScaffoldStore + ?Sized,
    R: BufRead,
    W: Write,
    F: FnMut(&ProcessStats),
{
    let medians = match store.metadata(&config.schema)? {
        Some(meta) => meta.medians,
        None => {
            warn!("no metadata row found; pScores use zero medians");
            Medians::default()
        }
    };
    if config.scafid_range.is_empty() {
        warn!(range = ?config.scafid_range, "scaffold id range is empty; nothing will match");
    }

    let mut stats = ProcessStats::default();
    loop {
        if config.nmax > 0 && stats.processed() >= config.nmax {
            debug!(nmax = config.nmax, "record limit reached");
            break;
        }
        let Some(item) = reader.next() else {
            break;
        };
        let item = match item {
            Err(e) if !e.is_record_error() => return Err(e.into()),
            item => item,
        };
        stats.read += 1;

        if stats.read <= config.nskip {
            stats.skipped += 1;
            observe(&stats);
            continue;
        }

        let mut mol = match item {
            Ok(mol) => mol,
            Err(e) => {
                warn!(record = stats.read, "skipping malformed record: {e}");
                stats.errors += 1;
                observe(&stats);
                continue;
            }
        };

        if let Some(note) = limit_note(&mol, config) {
            debug!(record = stats.read, name = %mol.name, "{note}");
            mol.set_property(NOTE_FIELD, note);
            stats.filtered += 1;
        } else {
            let matches = store.matching_scaffolds(
                &config.schema,
                config.chemkit,
                &mol,
                config.scafid_range,
            )?;
            if matches.is_empty() {
                stats.unmatched += 1;
            } else {
                stats.annotated += 1;
            }
            let max = annotate(&mut mol, &matches, &medians);
            if config.verbosity >= 2 {
                info!(
                    record = stats.read,
                    name = %mol.name,
                    nscaf = matches.len(),
                    pscore = max.map(|s| format!("{s:.0}")).unwrap_or_default(),
                    "processed"
                );
            }
        }

        match writer.notation() {
            target if mol.notation() != target => {
                convert_structure(store, config, &mut mol, target)?;
            }
            Notation::Smiles => canonicalize_smiles(store, config, &mut mol)?,
            Notation::Molfile => {}
        }
        writer.write(&mol)?;
        stats.written += 1;
        observe(&stats);
    }

    writer.flush()?;
    info!(
        read = stats.read,
        skipped = stats.skipped,
        filtered = stats.filtered,
        annotated = stats.annotated,
        unmatched = stats.unmatched,
        errors = stats.errors,
        written = stats.written,
        "processing finished"
    );
    Ok(stats)
}

fn limit_note(mol: &Molecule, config: &ProcessConfig) -> Option<String> {
    let atoms = mol.heavy_atom_count();
    if atoms > config.max_atoms {
        return Some(format!(
            "not processed: {atoms} heavy atoms > {}",
            config.max_atoms
        ));
    }
    let rings = mol.ring_count();
    if rings > config.max_rings {
        return Some(format!("not processed: {rings} rings > {}", config.max_rings));
    }
    None
}

/// Sets the Badapple properties from the matched scaffolds and returns the
/// highest pScore, if any scaffold matched.
fn annotate(mol: &mut Molecule, matches: &[ScaffoldRecord], medians: &Medians) -> Option<f64> {
    let max = matches
        .iter()
        .map(|s| s.pscore(medians))
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));

    let ids = matches
        .iter()
        .map(|s| s.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let smiles = matches
        .iter()
        .map(|s| s.smiles.as_str())
        .collect::<Vec<_>>()
        .join(".");

    match max {
        Some(score) => {
            mol.set_property(PSCORE_FIELD, format!("{score:.0}"));
            mol.set_property(ADVISORY_FIELD, Advisory::from_score(score).to_string());
        }
        None => {
            mol.set_property(PSCORE_FIELD, "");
            mol.set_property(ADVISORY_FIELD, "");
        }
    }
    mol.set_property(NSCAF_FIELD, matches.len().to_string());
    mol.set_property(SCAFIDS_FIELD, ids);
    mol.set_property(SCAFFOLDS_FIELD, smiles);
    max
}

fn convert_structure<S: ScaffoldStore + ?Sized>(
    store: &mut S,
    config: &ProcessConfig,
    mol: &mut Molecule,
    target: Notation,
) -> Result<(), Error> {
    let text = store.convert(config.chemkit, mol, target)?;
    mol.structure = match target {
        Notation::Smiles => Structure::Smiles(text.trim().to_string()),
        Notation::Molfile => Structure::Molfile(parse_molfile(&text)?),
    };
    Ok(())
}

/// Rewrites a SMILES structure in the cartridge's canonical form. A SMILES
/// the cartridge cannot read is written as given.
fn canonicalize_smiles<S: ScaffoldStore + ?Sized>(
    store: &mut S,
    config: &ProcessConfig,
    mol: &mut Molecule,
) -> Result<(), Error> {
    match store.convert(config.chemkit, mol, Notation::Smiles) {
        Ok(text) => {
            mol.structure = Structure::Smiles(text.trim().to_string());
            Ok(())
        }
        Err(db::Error::Conversion { .. }) => {
            warn!(name = %mol.name, "cartridge could not canonicalise SMILES; written as read");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
