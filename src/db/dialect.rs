use super::{Chemkit, DbType, Error};
use crate::model::molecule::Notation;

/// Columns of the `scaffold` table, in the order the row decoder reads them
/// after `id`, `scafsmi` and `scaftree`.
pub(crate) const STAT_COLUMNS: [&str; 10] = [
    "ncpd_total",
    "ncpd_tested",
    "ncpd_active",
    "nsub_total",
    "nsub_tested",
    "nsub_active",
    "nass_tested",
    "nass_active",
    "nsam_tested",
    "nsam_active",
];

/// SQL text generation for one engine.
///
/// Every value the engines disagree on is normalised in the generated SQL:
/// integers come back as 64-bit, fractions as double precision, flags as
/// 0/1 integers and catalog names as plain text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dialect(pub DbType);

impl Dialect {
    /// Positional bind marker for the `n`th parameter (1-based).
    pub fn placeholder(self, n: usize) -> String {
        match self.0 {
            DbType::Postgres => format!("${n}"),
            DbType::Mysql | DbType::Derby => "?".to_string(),
        }
    }

    fn int(self, expr: &str) -> String {
        match self.0 {
            DbType::Postgres => format!("CAST({expr} AS BIGINT)"),
            DbType::Mysql => format!("CAST({expr} AS SIGNED)"),
            DbType::Derby => expr.to_string(),
        }
    }

    fn float(self, expr: &str) -> String {
        match self.0 {
            DbType::Postgres => format!("CAST({expr} AS DOUBLE PRECISION)"),
            DbType::Mysql => format!("CAST({expr} AS DOUBLE)"),
            DbType::Derby => format!("CAST({expr} AS REAL)"),
        }
    }

    fn text(self, expr: &str) -> String {
        match self.0 {
            DbType::Mysql => format!("CAST({expr} AS CHAR)"),
            DbType::Postgres | DbType::Derby => format!("CAST({expr} AS TEXT)"),
        }
    }

    fn flag(self, expr: &str) -> String {
        match self.0 {
            DbType::Postgres => format!("CAST(CAST({expr} AS INTEGER) AS BIGINT)"),
            DbType::Mysql | DbType::Derby => self.int(expr),
        }
    }

    fn quote(self, ident: &str) -> String {
        match self.0 {
            DbType::Mysql => format!("`{ident}`"),
            DbType::Postgres | DbType::Derby => format!("\"{ident}\""),
        }
    }

    /// Table reference; only PostgreSQL qualifies it with the schema.
    pub fn table(self, schema: &str, table: &str) -> Result<String, Error> {
        validate_identifier(table)?;
        match self.0 {
            DbType::Postgres => {
                validate_identifier(schema)?;
                Ok(format!("{}.{}", self.quote(schema), self.quote(table)))
            }
            DbType::Mysql | DbType::Derby => Ok(self.quote(table)),
        }
    }

    pub fn server_version_sql(self) -> &'static str {
        match self.0 {
            DbType::Postgres => "SELECT CAST(version() AS TEXT)",
            DbType::Mysql => "SELECT CAST(VERSION() AS CHAR)",
            DbType::Derby => "SELECT sqlite_version()",
        }
    }

    pub fn list_tables_sql(self, schema: &str) -> Result<String, Error> {
        Ok(match self.0 {
            DbType::Postgres => {
                validate_identifier(schema)?;
                format!(
                    "SELECT CAST(table_name AS TEXT) FROM information_schema.tables \
                     WHERE table_schema = '{schema}' AND table_type = 'BASE TABLE' \
                     ORDER BY table_name"
                )
            }
            DbType::Mysql => "SELECT CAST(table_name AS CHAR) FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
                 ORDER BY table_name"
                .to_string(),
            DbType::Derby => "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name"
                .to_string(),
        })
    }

    pub fn count_rows_sql(self, schema: &str, table: &str) -> Result<String, Error> {
        Ok(format!(
            "SELECT {} FROM {}",
            self.int("COUNT(*)"),
            self.table(schema, table)?
        ))
    }

    pub fn metadata_sql(self, schema: &str) -> Result<String, Error> {
        Ok(format!(
            "SELECT {}, {}, {}, {}, {} FROM {}",
            self.text("db_description"),
            self.text("db_date_built"),
            self.float("median_nsub_tested"),
            self.float("median_nass_tested"),
            self.float("median_nsam_tested"),
            self.table(schema, "metadata")?
        ))
    }

    fn scaffold_smiles(self, chemkit: Chemkit) -> String {
        match (self.0, chemkit) {
            (DbType::Postgres, Chemkit::Rdkit) => {
                "COALESCE(CAST(mol_to_smiles(scafmol) AS TEXT), scafsmi)".to_string()
            }
            (DbType::Postgres, Chemkit::Openchord) => {
                "COALESCE(gnova.cansmiles(scafsmi), scafsmi)".to_string()
            }
            _ => "scafsmi".to_string(),
        }
    }

    fn scaffold_columns(self, chemkit: Chemkit) -> String {
        let mut cols = vec![
            format!("{} AS id", self.int("id")),
            format!("{} AS scafsmi", self.scaffold_smiles(chemkit)),
            "scaftree".to_string(),
        ];
        cols.extend(
            STAT_COLUMNS
                .iter()
                .map(|c| format!("{} AS {c}", self.int(&format!("COALESCE({c}, 0)")))),
        );
        cols.push(format!(
            "{} AS in_drug",
            self.flag("COALESCE(in_drug, FALSE)")
        ));
        cols.join(", ")
    }

    pub fn scaffold_sql(self, schema: &str, chemkit: Chemkit) -> Result<String, Error> {
        Ok(format!(
            "SELECT {} FROM {} WHERE id = {}",
            self.scaffold_columns(chemkit),
            self.table(schema, "scaffold")?,
            self.placeholder(1)
        ))
    }

    pub fn scaffold_compounds_sql(self, schema: &str) -> Result<String, Error> {
        Ok(format!(
            "SELECT {} AS cid, {} AS cansmi FROM {} s2c \
             LEFT JOIN {} c ON c.cid = s2c.cid \
             WHERE s2c.scafid = {} ORDER BY s2c.cid LIMIT {}",
            self.int("s2c.cid"),
            self.text("c.cansmi"),
            self.table(schema, "scaf2cpd")?,
            self.table(schema, "compound")?,
            self.placeholder(1),
            self.placeholder(2)
        ))
    }

    /// Scaffolds the cartridge finds as substructures of the bound query
    /// molecule, restricted to an inclusive id range (parameters 2 and 3).
    pub fn matching_scaffolds_sql(
        self,
        schema: &str,
        chemkit: Chemkit,
        notation: Notation,
    ) -> Result<String, Error> {
        if !self.0.has_cartridge() {
            return Err(Error::NoCartridge(self.0));
        }
        let predicate = match (chemkit, notation) {
            (Chemkit::Rdkit, Notation::Smiles) => "scafmol <@ mol_from_smiles($1::cstring)",
            (Chemkit::Rdkit, Notation::Molfile) => "scafmol <@ mol_from_ctab($1::cstring)",
            (Chemkit::Openchord, _) => "gnova.matches($1, scafsmi)",
        };
        Ok(format!(
            "SELECT {} FROM {} WHERE {predicate} AND id >= $2 AND id <= $3 ORDER BY id",
            self.scaffold_columns(chemkit),
            self.table(schema, "scaffold")?,
        ))
    }

    /// Single-value query rewriting the bound structure, given in notation
    /// `from`, as canonical `to`. With `from == to` this canonicalises.
    pub fn convert_sql(
        self,
        chemkit: Chemkit,
        from: Notation,
        to: Notation,
    ) -> Result<&'static str, Error> {
        if !self.0.has_cartridge() {
            return Err(Error::NoCartridge(self.0));
        }
        Ok(match (chemkit, from, to) {
            (Chemkit::Rdkit, Notation::Smiles, Notation::Molfile) => {
                "SELECT CAST(mol_to_ctab(mol_from_smiles($1::cstring)) AS TEXT)"
            }
            (Chemkit::Rdkit, Notation::Molfile, Notation::Molfile) => {
                "SELECT CAST(mol_to_ctab(mol_from_ctab($1::cstring)) AS TEXT)"
            }
            (Chemkit::Rdkit, Notation::Smiles, Notation::Smiles) => {
                "SELECT CAST(mol_to_smiles(mol_from_smiles($1::cstring)) AS TEXT)"
            }
            (Chemkit::Rdkit, Notation::Molfile, Notation::Smiles) => {
                "SELECT CAST(mol_to_smiles(mol_from_ctab($1::cstring)) AS TEXT)"
            }
            (Chemkit::Openchord, _, Notation::Molfile) => "SELECT gnova.molfile($1)",
            (Chemkit::Openchord, _, Notation::Smiles) => "SELECT gnova.cansmiles($1)",
        })
    }
}

/// Accepts plain SQL identifiers only: a letter or `_`, then letters,
/// digits or `_`.
pub(crate) fn validate_identifier(ident: &str) -> Result<(), Error> {
    let mut chars = ident.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(ident.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PG: Dialect = Dialect(DbType::Postgres);
    const MY: Dialect = Dialect(DbType::Mysql);
    const LITE: Dialect = Dialect(DbType::Derby);

    #[test]
    fn placeholders_follow_engine() {
        assert_eq!(PG.placeholder(2), "$2");
        assert_eq!(MY.placeholder(2), "?");
        assert_eq!(LITE.placeholder(1), "?");
    }

    #[test]
    fn tables_are_schema_qualified_on_postgres_only() {
        assert_eq!(PG.table("public", "scaffold").unwrap(), "\"public\".\"scaffold\"");
        assert_eq!(MY.table("public", "scaffold").unwrap(), "`scaffold`");
        assert_eq!(LITE.table("ignored", "scaffold").unwrap(), "\"scaffold\"");
    }

    #[test]
    fn rejects_unsafe_identifiers() {
        for bad in ["", "1abc", "a-b", "pub;lic", "x\"y", "a b"] {
            assert!(
                matches!(PG.table(bad, "scaffold"), Err(Error::InvalidIdentifier(_))),
                "{bad:?} accepted"
            );
        }
        assert!(validate_identifier("_badapple2").is_ok());
    }

    #[test]
    fn schema_only_validated_where_used() {
        assert!(LITE.table("not a schema", "scaffold").is_ok());
        assert!(LITE.list_tables_sql("not a schema").is_ok());
        assert!(PG.list_tables_sql("not a schema").is_err());
    }

    #[test]
    fn scaffold_query_normalises_column_types() {
        let sql = PG.scaffold_sql("public", Chemkit::Rdkit).unwrap();
        assert!(sql.contains("CAST(id AS BIGINT) AS id"));
        assert!(sql.contains("mol_to_smiles(scafmol)"));
        assert!(sql.contains("CAST(COALESCE(nsam_active, 0) AS BIGINT) AS nsam_active"));
        assert!(sql.contains("CAST(CAST(COALESCE(in_drug, FALSE) AS INTEGER) AS BIGINT)"));
        assert!(sql.ends_with("WHERE id = $1"));

        let sql = LITE.scaffold_sql("public", Chemkit::Rdkit).unwrap();
        assert!(sql.contains("scafsmi AS scafsmi"));
        assert!(!sql.contains("mol_to_smiles"));
        assert!(sql.ends_with("WHERE id = ?"));
    }

    #[test]
    fn openchord_canonicalises_through_gnova() {
        let sql = PG.scaffold_sql("public", Chemkit::Openchord).unwrap();
        assert!(sql.contains("gnova.cansmiles(scafsmi)"));
    }

    #[test]
    fn matching_predicate_depends_on_cartridge_and_notation() {
        let smi = PG
            .matching_scaffolds_sql("public", Chemkit::Rdkit, Notation::Smiles)
            .unwrap();
        assert!(smi.contains("scafmol <@ mol_from_smiles($1::cstring)"));
        assert!(smi.contains("id >= $2 AND id <= $3"));

        let ctab = PG
            .matching_scaffolds_sql("public", Chemkit::Rdkit, Notation::Molfile)
            .unwrap();
        assert!(ctab.contains("mol_from_ctab($1::cstring)"));

        let gnova = PG
            .matching_scaffolds_sql("public", Chemkit::Openchord, Notation::Smiles)
            .unwrap();
        assert!(gnova.contains("gnova.matches($1, scafsmi)"));
    }

    #[test]
    fn cartridge_queries_need_postgres() {
        assert!(matches!(
            MY.matching_scaffolds_sql("public", Chemkit::Rdkit, Notation::Smiles),
            Err(Error::NoCartridge(DbType::Mysql))
        ));
        assert!(matches!(
            LITE.convert_sql(Chemkit::Rdkit, Notation::Smiles, Notation::Molfile),
            Err(Error::NoCartridge(DbType::Derby))
        ));
        assert_eq!(
            PG.convert_sql(Chemkit::Openchord, Notation::Molfile, Notation::Smiles)
                .unwrap(),
            "SELECT gnova.cansmiles($1)"
        );
    }

    #[test]
    fn same_notation_conversion_canonicalises() {
        assert_eq!(
            PG.convert_sql(Chemkit::Rdkit, Notation::Smiles, Notation::Smiles)
                .unwrap(),
            "SELECT CAST(mol_to_smiles(mol_from_smiles($1::cstring)) AS TEXT)"
        );
        assert_eq!(
            PG.convert_sql(Chemkit::Openchord, Notation::Smiles, Notation::Smiles)
                .unwrap(),
            "SELECT gnova.cansmiles($1)"
        );
        assert!(
            PG.convert_sql(Chemkit::Rdkit, Notation::Molfile, Notation::Molfile)
                .unwrap()
                .contains("mol_to_ctab(mol_from_ctab($1::cstring))")
        );
    }

    #[test]
    fn catalog_queries_per_engine() {
        assert!(PG.list_tables_sql("badapple").unwrap().contains("table_schema = 'badapple'"));
        assert!(MY.list_tables_sql("x").unwrap().contains("DATABASE()"));
        assert!(LITE.list_tables_sql("x").unwrap().contains("sqlite_master"));
        assert_eq!(
            LITE.count_rows_sql("x", "compound").unwrap(),
            "SELECT COUNT(*) FROM \"compound\""
        );
        assert_eq!(LITE.server_version_sql(), "SELECT sqlite_version()");
    }

    #[test]
    fn compound_listing_joins_and_limits() {
        let sql = PG.scaffold_compounds_sql("public").unwrap();
        assert!(sql.contains("\"public\".\"scaf2cpd\" s2c"));
        assert!(sql.contains("LEFT JOIN \"public\".\"compound\" c ON c.cid = s2c.cid"));
        assert!(sql.ends_with("WHERE s2c.scafid = $1 ORDER BY s2c.cid LIMIT $2"));
    }
}
