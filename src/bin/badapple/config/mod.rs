mod error;

pub use error::ConfigError;

use std::path::{Path, PathBuf};

use badapple::db::{Chemkit, ConnectionParams, DbType};
use badapple::io::{Format, OutputFormat};
use badapple::{IdRange, ProcessConfig};

use crate::cli::Cli;
use crate::io::infer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DescribeDb,
    DescribeScaffold { scafid: i64 },
    ProcessMols,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPath {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub path: InputPath,
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    /// `None` writes to stdout.
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Everything a run needs, validated once from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub operation: Operation,
    pub connection: ConnectionParams,
    pub schema: String,
    pub chemkit: Chemkit,
    pub input: Option<InputSpec>,
    pub output: OutputSpec,
    pub process: ProcessConfig,
    pub verbosity: u8,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let operation = if cli.describedb {
            Operation::DescribeDb
        } else if cli.describescaf {
            Operation::DescribeScaffold {
                scafid: cli.scafid.ok_or(ConfigError::MissingScafId)?,
            }
        } else {
            Operation::ProcessMols
        };

        if operation == Operation::ProcessMols && cli.input.is_none() {
            return Err(ConfigError::MissingInput);
        }

        let input = cli
            .input
            .as_deref()
            .map(|path| input_spec(path, cli.input_format.map(Format::from)))
            .transpose()?;

        let output = match &cli.output {
            Some(path) if path.as_os_str() != "-" => OutputSpec {
                format: infer::output(path)
                    .ok_or_else(|| ConfigError::UnknownOutputFormat(path.clone()))?,
                path: Some(path.clone()),
            },
            _ => OutputSpec {
                path: None,
                format: OutputFormat::Sdf,
            },
        };

        let db_type = DbType::from(cli.dbtype);
        let chemkit = Chemkit::from(cli.chemkit);
        let connection = ConnectionParams {
            db_type,
            host: cli.dbhost,
            port: cli.dbport,
            name: cli.dbname,
            dir: cli.dbdir,
            user: cli.dbusr,
            password: cli.dbpw,
        };

        let process = ProcessConfig {
            schema: cli.dbschema.clone(),
            chemkit,
            nskip: cli.nskip,
            nmax: cli.nmax,
            max_atoms: cli.maxatoms,
            max_rings: cli.maxrings,
            scafid_range: IdRange::new(cli.scafid_min, cli.scafid_max),
            verbosity: cli.verbose,
        };

        Ok(Self {
            operation,
            connection,
            schema: cli.dbschema,
            chemkit,
            input,
            output,
            process,
            verbosity: cli.verbose,
        })
    }
}

fn input_spec(path: &Path, format: Option<Format>) -> Result<InputSpec, ConfigError> {
    if path.as_os_str() == "-" {
        return Ok(InputSpec {
            path: InputPath::Stdin,
            format: format.ok_or(ConfigError::StdinNeedsFormat)?,
        });
    }
    if !path.exists() {
        return Err(ConfigError::InputNotFound(path.to_path_buf()));
    }
    let format = format
        .or_else(|| infer::input(path))
        .ok_or_else(|| ConfigError::UnknownInputFormat(path.to_path_buf()))?;
    Ok(InputSpec {
        path: InputPath::File(path.to_path_buf()),
        format,
    })
}
