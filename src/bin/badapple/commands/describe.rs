use std::io::Write;

use anyhow::{Context, Result};

use badapple::ScaffoldStore;
use badapple::describe::{describe_db_txt, describe_scaffold_txt};

use crate::config::RunConfig;

pub fn run_describe_db<S, W>(store: &mut S, config: &RunConfig, out: &mut W) -> Result<()>
where
    S: ScaffoldStore + ?Sized,
    W: Write,
{
    let text = describe_db_txt(store, &config.schema).context("Failed to describe database")?;

    writeln!(
        out,
        "database: ({}) {}",
        config.connection.db_type,
        config.connection.resolved_name()
    )?;
    write!(out, "{text}")?;
    out.flush()?;
    Ok(())
}

pub fn run_describe_scaffold<S, W>(
    store: &mut S,
    config: &RunConfig,
    scafid: i64,
    out: &mut W,
) -> Result<()>
where
    S: ScaffoldStore + ?Sized,
    W: Write,
{
    let text = describe_scaffold_txt(
        store,
        &config.schema,
        config.chemkit,
        scafid,
        config.verbosity,
    )
    .with_context(|| format!("Failed to describe scaffold {scafid}"))?;

    writeln!(out, "database: {}", config.connection.resolved_name())?;
    writeln!(out, "ScafID: {scafid}")?;
    write!(out, "{text}")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use badapple::db::{Chemkit, DbType, Error};
    use badapple::{
        CompoundRef, DbMetadata, IdRange, Medians, Molecule, Notation, ScaffoldRecord,
        ScaffoldStats,
    };

    use crate::cli;

    struct OneScaffold;

    impl ScaffoldStore for OneScaffold {
        fn db_type(&self) -> DbType {
            DbType::Postgres
        }

        fn server_status(&mut self) -> Result<String, Error> {
            Ok("PostgreSQL 16".into())
        }

        fn table_counts(&mut self, _schema: &str) -> Result<Vec<(String, i64)>, Error> {
            Ok(vec![("compound".into(), 3), ("scaffold".into(), 1)])
        }

        fn metadata(&mut self, _schema: &str) -> Result<Option<DbMetadata>, Error> {
            Ok(Some(DbMetadata {
                description: Some("test build".into()),
                date_built: None,
                medians: Medians {
                    nsub_tested: 2.0,
                    nass_tested: 400.0,
                    nsam_tested: 500.0,
                },
            }))
        }

        fn scaffold(
            &mut self,
            _schema: &str,
            _chemkit: Chemkit,
            id: i64,
        ) -> Result<Option<ScaffoldRecord>, Error> {
            Ok((id == 7).then(|| ScaffoldRecord {
                id,
                smiles: "C1CCNCC1".into(),
                tree: None,
                stats: ScaffoldStats::default(),
                in_drug: false,
            }))
        }

        fn scaffold_compounds(
            &mut self,
            _schema: &str,
            _scaffold_id: i64,
            _limit: usize,
        ) -> Result<Vec<CompoundRef>, Error> {
            Ok(Vec::new())
        }

        fn matching_scaffolds(
            &mut self,
            _schema: &str,
            _chemkit: Chemkit,
            _molecule: &Molecule,
            _ids: IdRange,
        ) -> Result<Vec<ScaffoldRecord>, Error> {
            Ok(Vec::new())
        }

        fn convert(
            &mut self,
            _chemkit: Chemkit,
            molecule: &Molecule,
            _to: Notation,
        ) -> Result<String, Error> {
            Ok(molecule.structure_text().to_string())
        }
    }

    fn config(args: &[&str]) -> RunConfig {
        let cli = cli::parse_from(std::iter::once("badapple").chain(args.iter().copied()))
            .expect("arguments parse");
        RunConfig::from_cli(cli).expect("valid configuration")
    }

    #[test]
    fn describe_db_prefixes_report_with_database_identity() {
        let config = config(&["-describedb", "-dbname", "ba2024"]);
        let mut out = Vec::new();
        run_describe_db(&mut OneScaffold, &config, &mut out).unwrap();

        let expected = format!(
            "database: (postgres) ba2024\n{}",
            describe_db_txt(&mut OneScaffold, "public").unwrap()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn describe_db_names_embedded_database_by_path() {
        let config = config(&["-describedb", "-dbtype", "derby", "-dbdir", "/data", "-dbname", "ba"]);
        let mut out = Vec::new();
        run_describe_db(&mut OneScaffold, &config, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().next(), Some("database: (derby) /data/ba"));
    }

    #[test]
    fn describe_scaffold_prints_database_and_id_lines() {
        let config = config(&["-describescaf", "-scafid", "7"]);
        let mut out = Vec::new();
        run_describe_scaffold(&mut OneScaffold, &config, 7, &mut out).unwrap();

        let expected = format!(
            "database: badapple\nScafID: 7\n{}",
            describe_scaffold_txt(&mut OneScaffold, "public", Chemkit::Rdkit, 7, 0).unwrap()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn unknown_scaffold_writes_nothing() {
        let config = config(&["-describescaf", "-scafid", "8"]);
        let mut out = Vec::new();
        let err = run_describe_scaffold(&mut OneScaffold, &config, 8, &mut out).unwrap_err();
        assert!(err.chain().any(|c| c.to_string() == "scaffold 8 not found"));
        assert!(out.is_empty());
    }
}
