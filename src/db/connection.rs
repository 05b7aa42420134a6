use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Connection, Row};
use tokio::runtime::Runtime;
use tracing::{debug, trace, warn};

use super::dialect::{Dialect, validate_identifier};
use super::{Chemkit, ConnectionParams, DbType, Error, ScaffoldStore};
use crate::model::molecule::{Molecule, Notation};
use crate::model::scaffold::{
    CompoundRef, DbMetadata, IdRange, Medians, ScaffoldRecord, ScaffoldStats,
};

/// One blocking database connection.
///
/// The driver is asynchronous; the connection owns a current-thread runtime
/// and blocks on every query.
pub struct DbCon {
    runtime: Runtime,
    conn: AnyConnection,
    dialect: Dialect,
}

impl DbCon {
    pub fn connect(params: &ConnectionParams) -> Result<Self, Error> {
        let url = params.url()?;
        debug!(
            db_type = %params.db_type,
            target = %params.display_target(),
            "connecting"
        );
        Self::open(params.db_type, url.as_str())
    }

    fn open(db_type: DbType, url: &str) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        let conn = runtime
            .block_on(AnyConnection::connect(url))
            .map_err(|source| Error::Connect { db_type, source })?;
        Ok(Self {
            runtime,
            conn,
            dialect: Dialect(db_type),
        })
    }

    pub fn close(self) -> Result<(), Error> {
        let Self { runtime, conn, .. } = self;
        runtime
            .block_on(conn.close())
            .map_err(Error::query("close"))
    }

    fn fetch_all(&mut self, context: &'static str, sql: &str) -> Result<Vec<AnyRow>, Error> {
        trace!(%sql, context);
        self.runtime
            .block_on(sqlx::query(sql).fetch_all(&mut self.conn))
            .map_err(Error::query(context))
    }
}

impl ScaffoldStore for DbCon {
    fn db_type(&self) -> DbType {
        self.dialect.0
    }

    fn server_status(&mut self) -> Result<String, Error> {
        let sql = self.dialect.server_version_sql();
        trace!(%sql, "server status");
        let version: Option<String> = self
            .runtime
            .block_on(sqlx::query_scalar(sql).fetch_one(&mut self.conn))
            .map_err(Error::query("server status"))?;
        Ok(version.unwrap_or_default())
    }

    fn table_counts(&mut self, schema: &str) -> Result<Vec<(String, i64)>, Error> {
        let sql = self.dialect.list_tables_sql(schema)?;
        let names = self
            .fetch_all("table listing", &sql)?
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::query("table listing"))?;

        let mut counts = Vec::with_capacity(names.len());
        for name in names {
            if validate_identifier(&name).is_err() {
                warn!(table = %name, "skipping table with unsupported name");
                continue;
            }
            let sql = self.dialect.count_rows_sql(schema, &name)?;
            trace!(%sql, "row count");
            let n: i64 = self
                .runtime
                .block_on(sqlx::query_scalar(&sql).fetch_one(&mut self.conn))
                .map_err(Error::query("row count"))?;
            counts.push((name, n));
        }
        Ok(counts)
    }

    fn metadata(&mut self, schema: &str) -> Result<Option<DbMetadata>, Error> {
        let sql = self.dialect.metadata_sql(schema)?;
        trace!(%sql, "metadata");
        let row = self
            .runtime
            .block_on(sqlx::query(&sql).fetch_optional(&mut self.conn))
            .map_err(Error::query("metadata"))?;
        row.as_ref()
            .map(metadata_row)
            .transpose()
            .map_err(Error::query("metadata"))
    }

    fn scaffold(
        &mut self,
        schema: &str,
        chemkit: Chemkit,
        id: i64,
    ) -> Result<Option<ScaffoldRecord>, Error> {
        let sql = self.dialect.scaffold_sql(schema, chemkit)?;
        trace!(%sql, id, "scaffold");
        let row = self
            .runtime
            .block_on(sqlx::query(&sql).bind(id).fetch_optional(&mut self.conn))
            .map_err(Error::query("scaffold"))?;
        row.as_ref()
            .map(scaffold_row)
            .transpose()
            .map_err(Error::query("scaffold"))
    }

    fn scaffold_compounds(
        &mut self,
        schema: &str,
        scaffold_id: i64,
        limit: usize,
    ) -> Result<Vec<CompoundRef>, Error> {
        let sql = self.dialect.scaffold_compounds_sql(schema)?;
        trace!(%sql, scaffold_id, limit, "scaffold compounds");
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .runtime
            .block_on(
                sqlx::query(&sql)
                    .bind(scaffold_id)
                    .bind(limit)
                    .fetch_all(&mut self.conn),
            )
            .map_err(Error::query("scaffold compounds"))?;
        rows.iter()
            .map(|row| {
                Ok(CompoundRef {
                    id: row.try_get(0)?,
                    smiles: row.try_get(1)?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Error::query("scaffold compounds"))
    }

    fn matching_scaffolds(
        &mut self,
        schema: &str,
        chemkit: Chemkit,
        molecule: &Molecule,
        ids: IdRange,
    ) -> Result<Vec<ScaffoldRecord>, Error> {
        let sql = self
            .dialect
            .matching_scaffolds_sql(schema, chemkit, molecule.notation())?;
        let (lo, hi) = ids.bounds();
        trace!(%sql, lo, hi, "matching scaffolds");
        let rows = self
            .runtime
            .block_on(
                sqlx::query(&sql)
                    .bind(molecule.structure_text().to_string())
                    .bind(lo)
                    .bind(hi)
                    .fetch_all(&mut self.conn),
            )
            .map_err(Error::query("scaffold search"))?;
        rows.iter()
            .map(scaffold_row)
            .collect::<Result<_, _>>()
            .map_err(Error::query("scaffold search"))
    }

    fn convert(
        &mut self,
        chemkit: Chemkit,
        molecule: &Molecule,
        to: Notation,
    ) -> Result<String, Error> {
        let from = molecule.notation();
        let sql = self.dialect.convert_sql(chemkit, from, to)?;
        trace!(%sql, %from, %to, "convert");
        let converted: Option<String> = self
            .runtime
            .block_on(
                sqlx::query_scalar(sql)
                    .bind(molecule.structure_text().to_string())
                    .fetch_one(&mut self.conn),
            )
            .map_err(Error::query("structure conversion"))?;
        converted
            .filter(|s| !s.trim().is_empty())
            .ok_or(Error::Conversion { from, to })
    }
}

fn metadata_row(row: &AnyRow) -> Result<DbMetadata, sqlx::Error> {
    let median = |i: usize| -> Result<f64, sqlx::Error> {
        Ok(row.try_get::<Option<f64>, _>(i)?.unwrap_or(0.0))
    };
    Ok(DbMetadata {
        description: row.try_get(0)?,
        date_built: row.try_get(1)?,
        medians: Medians {
            nsub_tested: median(2)?,
            nass_tested: median(3)?,
            nsam_tested: median(4)?,
        },
    })
}

/// Decodes a row selected with the dialect's scaffold column list.
fn scaffold_row(row: &AnyRow) -> Result<ScaffoldRecord, sqlx::Error> {
    let stat = |i: usize| row.try_get::<i64, _>(3 + i);
    Ok(ScaffoldRecord {
        id: row.try_get(0)?,
        smiles: row.try_get::<Option<String>, _>(1)?.unwrap_or_default(),
        tree: row.try_get(2)?,
        stats: ScaffoldStats {
            ncpd_total: stat(0)?,
            ncpd_tested: stat(1)?,
            ncpd_active: stat(2)?,
            nsub_total: stat(3)?,
            nsub_tested: stat(4)?,
            nsub_active: stat(5)?,
            nass_tested: stat(6)?,
            nass_active: stat(7)?,
            nsam_tested: stat(8)?,
            nsam_active: stat(9)?,
        },
        in_drug: row.try_get::<i64, _>(13)? != 0,
    })
}
