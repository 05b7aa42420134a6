use super::{Chemkit, DbType, Error};
use crate::model::molecule::{Molecule, Notation};
use crate::model::scaffold::{CompoundRef, DbMetadata, IdRange, ScaffoldRecord};

/// Read access to a Badapple scaffold database.
///
/// `schema` selects the schema on PostgreSQL and is ignored by engines
/// without schemas.
pub trait ScaffoldStore {
    fn db_type(&self) -> DbType;

    /// Server version string.
    fn server_status(&mut self) -> Result<String, Error>;

    /// Row counts of every table in the schema, ordered by table name.
    fn table_counts(&mut self, schema: &str) -> Result<Vec<(String, i64)>, Error>;

    /// The single `metadata` row, if the table has one.
    fn metadata(&mut self, schema: &str) -> Result<Option<DbMetadata>, Error>;

    fn scaffold(
        &mut self,
        schema: &str,
        chemkit: Chemkit,
        id: i64,
    ) -> Result<Option<ScaffoldRecord>, Error>;

    /// Compounds containing the scaffold, ordered by compound id.
    fn scaffold_compounds(
        &mut self,
        schema: &str,
        scaffold_id: i64,
        limit: usize,
    ) -> Result<Vec<CompoundRef>, Error>;

    /// Scaffolds contained in `molecule`, ordered by id.
    ///
    /// Containment is the cartridge's substructure test, not a lookup in the
    /// scaffold hierarchy: a scaffold embedded in a larger fused ring system
    /// of the molecule (benzene inside naphthalene) matches too.
    fn matching_scaffolds(
        &mut self,
        schema: &str,
        chemkit: Chemkit,
        molecule: &Molecule,
        ids: IdRange,
    ) -> Result<Vec<ScaffoldRecord>, Error>;

    /// The molecule's structure rewritten by the cartridge in canonical
    /// notation `to`. Called with the molecule's own notation this
    /// canonicalises the structure.
    fn convert(&mut self, chemkit: Chemkit, molecule: &Molecule, to: Notation)
    -> Result<String, Error>;
}
