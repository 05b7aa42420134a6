//! Human-readable summaries of a Badapple database and its scaffolds.

use std::fmt::Write as _;

use thiserror::Error;
use tracing::warn;

use crate::db::{self, Chemkit, ScaffoldStore};
use crate::model::scaffold::{Advisory, Medians};

/// Compounds listed for a scaffold at verbosity 1.
pub const BRIEF_COMPOUND_LIMIT: usize = 10;

/// Compounds listed, with their SMILES, at verbosity 2 and above.
pub const FULL_COMPOUND_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] db::Error),

    #[error("scaffold {0} not found")]
    ScaffoldNotFound(i64),
}

/// Description, build date, per-table row counts and scaffold medians.
pub fn describe_db_txt<S: ScaffoldStore + ?Sized>(
    store: &mut S,
    schema: &str,
) -> Result<String, Error> {
    let mut out = String::new();

    let metadata = store.metadata(schema)?;
    match &metadata {
        Some(meta) => {
            if let Some(desc) = &meta.description {
                let _ = writeln!(out, "description: {desc}");
            }
            if let Some(date) = &meta.date_built {
                let _ = writeln!(out, "date built: {date}");
            }
        }
        None => warn!(schema, "database has no metadata row"),
    }

    let counts = store.table_counts(schema)?;
    let width = counts.iter().map(|(t, _)| t.len()).max().unwrap_or(0);
    let _ = writeln!(out, "tables ({}):", counts.len());
    for (table, n) in &counts {
        let _ = writeln!(out, "  {table:<width$} {n:>10} rows");
    }

    if let Some(meta) = metadata {
        let Medians {
            nsub_tested,
            nass_tested,
            nsam_tested,
        } = meta.medians;
        let _ = writeln!(out, "scaffold medians:");
        let _ = writeln!(out, "  nsub_tested: {nsub_tested:.1}");
        let _ = writeln!(out, "  nass_tested: {nass_tested:.1}");
        let _ = writeln!(out, "  nsam_tested: {nsam_tested:.1}");
    }

    Ok(out)
}

/// Structure, statistics and pScore of one scaffold.
///
/// With `verbosity >= 1` the compounds containing the scaffold are listed
/// (up to [`BRIEF_COMPOUND_LIMIT`] ids); with `verbosity >= 2` up to
/// [`FULL_COMPOUND_LIMIT`], each with its SMILES.
pub fn describe_scaffold_txt<S: ScaffoldStore + ?Sized>(
    store: &mut S,
    schema: &str,
    chemkit: Chemkit,
    scafid: i64,
    verbosity: u8,
) -> Result<String, Error> {
    let scaf = store
        .scaffold(schema, chemkit, scafid)?
        .ok_or(Error::ScaffoldNotFound(scafid))?;
    let medians = store
        .metadata(schema)?
        .map(|m| m.medians)
        .unwrap_or_default();

    let s = &scaf.stats;
    let mut out = String::new();
    let _ = writeln!(out, "scafsmi: {}", scaf.smiles);
    if let Some(tree) = &scaf.tree {
        let _ = writeln!(out, "scaftree: {tree}");
    }
    let _ = writeln!(
        out,
        "compounds:  total {:>8}  tested {:>8}  active {:>8}",
        s.ncpd_total, s.ncpd_tested, s.ncpd_active
    );
    let _ = writeln!(
        out,
        "substances: total {:>8}  tested {:>8}  active {:>8}",
        s.nsub_total, s.nsub_tested, s.nsub_active
    );
    let _ = writeln!(
        out,
        "assays:                    tested {:>8}  active {:>8}",
        s.nass_tested, s.nass_active
    );
    let _ = writeln!(
        out,
        "samples:                   tested {:>8}  active {:>8}",
        s.nsam_tested, s.nsam_active
    );
    let _ = writeln!(out, "in_drug: {}", scaf.in_drug);

    let score = scaf.pscore(&medians);
    let _ = writeln!(
        out,
        "pScore: {score:.0} ({} advisory)",
        Advisory::from_score(score)
    );

    if verbosity >= 1 {
        let full = verbosity >= 2;
        let limit = if full {
            FULL_COMPOUND_LIMIT
        } else {
            BRIEF_COMPOUND_LIMIT
        };
        let cpds = store.scaffold_compounds(schema, scafid, limit)?;
        let _ = writeln!(out, "compounds containing scaffold (max {limit}): {}", cpds.len());
        if full {
            for cpd in &cpds {
                let _ = writeln!(
                    out,
                    "  {:>10} {}",
                    cpd.id,
                    cpd.smiles.as_deref().unwrap_or("")
                );
            }
        } else if !cpds.is_empty() {
            let ids: Vec<String> = cpds.iter().map(|c| c.id.to_string()).collect();
            let _ = writeln!(out, "  {}", ids.join(", "));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    #[test]
    fn database_description_lists_metadata_tables_and_medians() {
        let mut store = MemoryStore::sample();
        let txt = describe_db_txt(&mut store, "public").unwrap();
        assert!(txt.starts_with("description: Badapple sample\ndate built: 2024-01-31\n"));
        assert!(txt.contains("tables (4):\n"));
        assert!(txt.contains("  scaffold          2 rows\n"));
        assert!(txt.contains("  nass_tested: 400.0\n"));
    }

    #[test]
    fn database_without_metadata_still_lists_tables() {
        let mut store = MemoryStore::sample();
        store.metadata = None;
        let txt = describe_db_txt(&mut store, "public").unwrap();
        assert!(txt.starts_with("tables (4):"));
        assert!(!txt.contains("medians"));
    }

    #[test]
    fn scaffold_description_includes_score_and_advisory() {
        let mut store = MemoryStore::sample();
        let txt = describe_scaffold_txt(&mut store, "public", Chemkit::Rdkit, 1, 0).unwrap();
        assert!(txt.starts_with("scafsmi: c1ccccc1\nscaftree: 1\n"));
        assert!(txt.contains("in_drug: true\n"));
        assert!(txt.contains("pScore: 120 (moderate advisory)\n"));
        assert!(!txt.contains("compounds containing"));
    }

    #[test]
    fn verbosity_one_lists_ten_compound_ids() {
        let mut store = MemoryStore::sample();
        let txt = describe_scaffold_txt(&mut store, "public", Chemkit::Rdkit, 1, 1).unwrap();
        assert!(txt.contains("compounds containing scaffold (max 10): 10\n"));
        assert!(txt.contains("  100, 101, 102"));
        assert!(!txt.contains("110"));
        assert!(!txt.contains("c1ccccc1C"));
    }

    #[test]
    fn verbosity_two_lists_compounds_with_smiles() {
        let mut store = MemoryStore::sample();
        let txt = describe_scaffold_txt(&mut store, "public", Chemkit::Rdkit, 1, 2).unwrap();
        assert!(txt.contains("(max 100): 15\n"));
        assert!(txt.contains("       114 c1ccccc1CCCCCCCCCCCCCCC\n"));
    }

    #[test]
    fn unknown_scaffold_is_an_error() {
        let mut store = MemoryStore::sample();
        let err = describe_scaffold_txt(&mut store, "public", Chemkit::Rdkit, 42, 0).unwrap_err();
        assert!(matches!(err, Error::ScaffoldNotFound(42)));
        assert_eq!(err.to_string(), "scaffold 42 not found");
    }
}
