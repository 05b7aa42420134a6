//! In-memory [`ScaffoldStore`] for unit tests.

use super::{Chemkit, DbType, Error, ScaffoldStore};
use crate::model::molecule::{Molecule, Notation};
use crate::model::scaffold::{
    CompoundRef, DbMetadata, IdRange, Medians, ScaffoldRecord, ScaffoldStats,
};

/// Matches a scaffold when its SMILES occurs verbatim in the query text.
pub(crate) struct MemoryStore {
    pub metadata: Option<DbMetadata>,
    pub scaffolds: Vec<ScaffoldRecord>,
    pub compounds: Vec<(i64, CompoundRef)>,
    /// SMILES canonicalisations; unlisted SMILES are already canonical.
    pub canonical: Vec<(String, String)>,
    pub searches: usize,
    pub conversions: usize,
}

/// Carbon atom molfile as a cartridge would return it.
pub(crate) const CARBON_MOLFILE: &str = "
     RDKit          2D

  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
M  END
";

fn stats(sub: i64, ass: i64, sam: i64) -> ScaffoldStats {
    ScaffoldStats {
        ncpd_total: 12,
        ncpd_tested: 10,
        ncpd_active: 3,
        nsub_total: 9,
        nsub_tested: 8,
        nsub_active: sub,
        nass_tested: 600,
        nass_active: ass,
        nsam_tested: 1500,
        nsam_active: sam,
    }
}

impl MemoryStore {
    /// Two scaffolds: 1 (`c1ccccc1`, pScore 120) and 7 (`C1CCNCC1`,
    /// pScore 3200), with medians 2 / 400 / 500.
    pub fn sample() -> Self {
        Self {
            metadata: Some(DbMetadata {
                description: Some("Badapple sample".to_string()),
                date_built: Some("2024-01-31".to_string()),
                medians: Medians {
                    nsub_tested: 2.0,
                    nass_tested: 400.0,
                    nsam_tested: 500.0,
                },
            }),
            scaffolds: vec![
                ScaffoldRecord {
                    id: 1,
                    smiles: "c1ccccc1".into(),
                    tree: Some("1".into()),
                    stats: stats(4, 60, 100),
                    in_drug: true,
                },
                ScaffoldRecord {
                    id: 7,
                    smiles: "C1CCNCC1".into(),
                    tree: None,
                    stats: stats(8, 200, 400),
                    in_drug: false,
                },
            ],
            compounds: (0..15)
                .map(|i| {
                    (
                        1,
                        CompoundRef {
                            id: 100 + i,
                            smiles: Some(format!("c1ccccc1{}", "C".repeat(i as usize + 1))),
                        },
                    )
                })
                .collect(),
            canonical: vec![("OCC".into(), "CCO".into())],
            searches: 0,
            conversions: 0,
        }
    }
}

impl ScaffoldStore for MemoryStore {
    fn db_type(&self) -> DbType {
        DbType::Postgres
    }

    fn server_status(&mut self) -> Result<String, Error> {
        Ok("memory".into())
    }

    fn table_counts(&mut self, _schema: &str) -> Result<Vec<(String, i64)>, Error> {
        Ok(vec![
            ("compound".into(), self.compounds.len() as i64),
            ("metadata".into(), i64::from(self.metadata.is_some())),
            ("scaf2cpd".into(), self.compounds.len() as i64),
            ("scaffold".into(), self.scaffolds.len() as i64),
        ])
    }

    fn metadata(&mut self, _schema: &str) -> Result<Option<DbMetadata>, Error> {
        Ok(self.metadata.clone())
    }

    fn scaffold(
        &mut self,
        _schema: &str,
        _chemkit: Chemkit,
        id: i64,
    ) -> Result<Option<ScaffoldRecord>, Error> {
        Ok(self.scaffolds.iter().find(|s| s.id == id).cloned())
    }

    fn scaffold_compounds(
        &mut self,
        _schema: &str,
        scaffold_id: i64,
        limit: usize,
    ) -> Result<Vec<CompoundRef>, Error> {
        Ok(self
            .compounds
            .iter()
            .filter(|(sid, _)| *sid == scaffold_id)
            .map(|(_, c)| c.clone())
            .take(limit)
            .collect())
    }

    fn matching_scaffolds(
        &mut self,
        _schema: &str,
        _chemkit: Chemkit,
        molecule: &Molecule,
        ids: IdRange,
    ) -> Result<Vec<ScaffoldRecord>, Error> {
        self.searches += 1;
        let text = molecule.structure_text();
        Ok(self
            .scaffolds
            .iter()
            .filter(|s| ids.contains(s.id) && text.contains(&s.smiles))
            .cloned()
            .collect())
    }

    fn convert(
        &mut self,
        _chemkit: Chemkit,
        molecule: &Molecule,
        to: Notation,
    ) -> Result<String, Error> {
        self.conversions += 1;
        let text = molecule.structure_text();
        Ok(match (molecule.notation(), to) {
            (Notation::Smiles, Notation::Smiles) => self
                .canonical
                .iter()
                .find(|(smi, _)| smi == text)
                .map_or(text, |(_, can)| can.as_str())
                .to_string(),
            (Notation::Molfile, Notation::Molfile) => text.to_string(),
            (_, Notation::Smiles) => "C\n".to_string(),
            (_, Notation::Molfile) => CARBON_MOLFILE.to_string(),
        })
    }
}
