//! Database access for a Badapple database.
//!
//! [`DbCon`] is one blocking connection to a PostgreSQL, MySQL or embedded
//! database; the operations in [`crate::describe`] and [`crate::annotate`]
//! are written against the [`ScaffoldStore`] trait it implements. Engine
//! differences in SQL are confined to the `dialect` module.

use std::fmt;
use std::path::PathBuf;

mod connection;
mod dialect;
mod error;
#[cfg(test)]
pub(crate) mod memory;
mod store;

pub use connection::DbCon;
pub use error::Error;
pub use store::ScaffoldStore;

/// Database engine.
///
/// `Derby` names the embedded, file-backed engine: the database lives at
/// `dbdir/dbname` on the local filesystem and is opened through the SQLite
/// driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DbType {
    #[default]
    Postgres,
    Mysql,
    Derby,
}

impl DbType {
    pub fn default_port(self) -> Option<u16> {
        match self {
            DbType::Postgres => Some(5432),
            DbType::Mysql => Some(3306),
            DbType::Derby => None,
        }
    }

    /// Whether the engine can host a chemical cartridge.
    pub fn has_cartridge(self) -> bool {
        matches!(self, DbType::Postgres)
    }

    pub fn is_embedded(self) -> bool {
        matches!(self, DbType::Derby)
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbType::Postgres => write!(f, "postgres"),
            DbType::Mysql => write!(f, "mysql"),
            DbType::Derby => write!(f, "derby"),
        }
    }
}

/// Chemical cartridge installed in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chemkit {
    #[default]
    Rdkit,
    Openchord,
}

impl fmt::Display for Chemkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chemkit::Rdkit => write!(f, "rdkit"),
            Chemkit::Openchord => write!(f, "openchord"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub db_type: DbType,
    pub host: String,
    /// `None` selects the engine's default port.
    pub port: Option<u16>,
    pub name: String,
    /// Directory holding embedded databases.
    pub dir: PathBuf,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            db_type: DbType::Postgres,
            host: "localhost".to_string(),
            port: None,
            name: "badapple".to_string(),
            dir: PathBuf::from("/tmp"),
            user: "www".to_string(),
            password: "foobar".to_string(),
        }
    }
}

impl ConnectionParams {
    pub fn port(&self) -> Option<u16> {
        self.port.or(self.db_type.default_port())
    }

    /// Database identifier: the name, or `dir/name` for the embedded engine.
    pub fn resolved_name(&self) -> String {
        if self.db_type.is_embedded() {
            self.dir.join(&self.name).display().to_string()
        } else {
            self.name.clone()
        }
    }

    /// `host:port:name`, or just the path for the embedded engine.
    pub fn display_target(&self) -> String {
        match self.port() {
            Some(port) if !self.db_type.is_embedded() => {
                format!("{}:{}:{}", self.host, port, self.resolved_name())
            }
            _ => self.resolved_name(),
        }
    }

    /// Driver URL with percent-encoded credentials.
    pub fn url(&self) -> Result<url::Url, Error> {
        let scheme = match self.db_type {
            DbType::Postgres => "postgres",
            DbType::Mysql => "mysql",
            DbType::Derby => {
                let raw = format!("sqlite://{}?mode=ro", self.resolved_name());
                return url::Url::parse(&raw).map_err(|e| Error::Url(e.to_string()));
            }
        };

        let mut url = url::Url::parse(&format!("{scheme}://{}", self.host))
            .map_err(|e| Error::Url(format!("host '{}': {e}", self.host)))?;
        url.set_username(&self.user)
            .map_err(|_| Error::Url(format!("user '{}'", self.user)))?;
        url.set_password(Some(&self.password))
            .map_err(|_| Error::Url("password".to_string()))?;
        url.set_port(self.port())
            .map_err(|_| Error::Url("port".to_string()))?;
        url.set_path(&format!("/{}", self.name));
        Ok(url)
    }
}
