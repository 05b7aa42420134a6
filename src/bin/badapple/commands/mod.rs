mod describe;
mod process;

use std::io;

use anyhow::{Context, Result};
use tracing::info;

use badapple::ScaffoldStore;
use badapple::db::DbCon;

use crate::config::{ConfigError, Operation, RunConfig};
use crate::display::Context as DisplayContext;
use crate::io::{create_output, open_input};

pub fn dispatch(config: &RunConfig, ctx: DisplayContext) -> Result<()> {
    let reader = config.input.as_ref().map(open_input).transpose()?;
    let writer = match config.operation {
        Operation::ProcessMols => Some(create_output(&config.output)?),
        _ => None,
    };

    let params = &config.connection;
    let mut db = DbCon::connect(params).with_context(|| {
        format!(
            "Failed to connect to {} database {}",
            params.db_type,
            params.display_target()
        )
    })?;
    if config.verbosity >= 1 {
        info!(
            "DB ({}) connection ok :{}",
            params.db_type,
            params.display_target()
        );
    }
    if config.verbosity >= 2 {
        let status = db.server_status().context("Failed to query server status")?;
        info!("server: {status}");
    }

    let result = match config.operation {
        Operation::DescribeDb => {
            describe::run_describe_db(&mut db, config, &mut io::stdout().lock())
        }
        Operation::DescribeScaffold { scafid } => {
            describe::run_describe_scaffold(&mut db, config, scafid, &mut io::stdout().lock())
        }
        Operation::ProcessMols => match (reader, writer) {
            (Some(reader), Some(mut writer)) => {
                process::run_process(&mut db, config, reader, &mut writer, ctx)
            }
            _ => Err(ConfigError::MissingInput.into()),
        },
    };

    let closed = db.close();
    result?;
    closed.context("Failed to close database connection")
}
