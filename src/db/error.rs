use super::DbType;
use crate::model::molecule::Notation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start the database runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("invalid connection parameters: {0}")]
    Url(String),

    #[error("DB ({db_type}) connection failed: {source}")]
    Connect {
        db_type: DbType,
        #[source]
        source: sqlx::Error,
    },

    #[error("{context} query failed: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("'{0}' is not a valid schema or table name")]
    InvalidIdentifier(String),

    #[error("no chemical cartridge is available on {0} databases")]
    NoCartridge(DbType),

    #[error("the chemical cartridge could not convert the structure from {from} to {to}")]
    Conversion { from: Notation, to: Notation },
}

impl Error {
    pub(crate) fn query(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query { context, source }
    }
}
