use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgGroup, CommandFactory, Parser, ValueEnum};

use badapple::db::{Chemkit, DbType};
use badapple::io::Format;

const EXIT_CODES_HELP: &str = "\
Exit status: 0 on success (including -h and --version); otherwise a sysexits code:
  64 usage error, 65 bad data, 66 input file missing, 69 database unavailable,
  70 internal error, 73 cannot create output, 74 I/O error.

Options may be spelled with one dash (-describedb) or two (--describedb).";

#[derive(Parser, Debug)]
#[command(
    name = "badapple",
    about = "Scaffold promiscuity analysis against a Badapple database",
    version,
    before_help = crate::display::banner_for_help(),
    after_help = EXIT_CODES_HELP,
    allow_negative_numbers = true,
    group(
        ArgGroup::new("operation")
            .required(true)
            .multiple(false)
            .args(["describedb", "describescaf", "process_mols"])
    )
)]
pub struct Cli {
    /// Describe the database: metadata, table sizes and medians
    #[arg(long, help_heading = "Operations")]
    pub describedb: bool,

    /// Describe one scaffold (requires -scafid)
    #[arg(long, help_heading = "Operations")]
    pub describescaf: bool,

    /// Annotate the molecules of -i with scaffold pScores
    #[arg(long = "process_mols", help_heading = "Operations")]
    pub process_mols: bool,

    /// Input molecules (.sdf, .sd, .mol, .smi, .smiles, .ism, .can; "-" for stdin)
    #[arg(short = 'i', value_name = "IFILE", help_heading = "I/O")]
    pub input: Option<PathBuf>,

    /// Input format (inferred from the extension; required for stdin)
    #[arg(long = "ifmt", value_name = "FORMAT", help_heading = "I/O")]
    pub input_format: Option<InputFormat>,

    /// Output molecules (.sdf or .smi family; stdout as SDF if omitted)
    #[arg(short = 'o', value_name = "OFILE", help_heading = "I/O")]
    pub output: Option<PathBuf>,

    /// Database engine
    #[arg(
        long,
        value_name = "TYPE",
        default_value = "postgres",
        env = "BADAPPLE_DBTYPE",
        help_heading = "Database"
    )]
    pub dbtype: DbTypeArg,

    /// Database host
    #[arg(
        long,
        value_name = "HOST",
        default_value = "localhost",
        env = "BADAPPLE_DBHOST",
        allow_hyphen_values = true,
        help_heading = "Database"
    )]
    pub dbhost: String,

    /// Database port [default: 5432 postgres, 3306 mysql]
    #[arg(long, value_name = "PORT", env = "BADAPPLE_DBPORT", help_heading = "Database")]
    pub dbport: Option<u16>,

    /// Database name
    #[arg(
        long,
        value_name = "NAME",
        default_value = "badapple",
        env = "BADAPPLE_DBNAME",
        allow_hyphen_values = true,
        help_heading = "Database"
    )]
    pub dbname: String,

    /// Database schema (postgres)
    #[arg(
        long,
        value_name = "SCHEMA",
        default_value = "public",
        env = "BADAPPLE_DBSCHEMA",
        allow_hyphen_values = true,
        help_heading = "Database"
    )]
    pub dbschema: String,

    /// Directory of embedded databases (derby)
    #[arg(
        long,
        value_name = "DIR",
        default_value = "/tmp",
        env = "BADAPPLE_DBDIR",
        allow_hyphen_values = true,
        help_heading = "Database"
    )]
    pub dbdir: PathBuf,

    /// Database user
    #[arg(
        long,
        value_name = "USER",
        default_value = "www",
        env = "BADAPPLE_DBUSR",
        allow_hyphen_values = true,
        help_heading = "Database"
    )]
    pub dbusr: String,

    /// Database password
    #[arg(
        long,
        value_name = "PW",
        default_value = "foobar",
        env = "BADAPPLE_DBPW",
        allow_hyphen_values = true,
        hide_env_values = true,
        hide_default_value = true,
        help_heading = "Database"
    )]
    pub dbpw: String,

    /// Chemical cartridge installed in the database
    #[arg(
        long,
        value_name = "KIT",
        default_value = "rdkit",
        env = "BADAPPLE_CHEMKIT",
        help_heading = "Database"
    )]
    pub chemkit: ChemkitArg,

    /// Scaffold ID for -describescaf
    #[arg(long, value_name = "ID", help_heading = "Scaffolds")]
    pub scafid: Option<i64>,

    /// Lowest scaffold ID used for annotation
    #[arg(long = "scafid_min", value_name = "ID", help_heading = "Scaffolds")]
    pub scafid_min: Option<i64>,

    /// Highest scaffold ID used for annotation
    #[arg(long = "scafid_max", value_name = "ID", help_heading = "Scaffolds")]
    pub scafid_max: Option<i64>,

    /// Skip molecules with more heavy atoms
    #[arg(long, value_name = "N", default_value_t = 50, help_heading = "Processing")]
    pub maxatoms: usize,

    /// Skip molecules with more rings
    #[arg(long, value_name = "N", default_value_t = 5, help_heading = "Processing")]
    pub maxrings: usize,

    /// Process at most N molecules (0 = all)
    #[arg(long, value_name = "N", default_value_t = 0, help_heading = "Processing")]
    pub nmax: usize,

    /// Skip the first N molecules
    #[arg(long, value_name = "N", default_value_t = 0, help_heading = "Processing")]
    pub nskip: usize,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, help_heading = "Output")]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    #[value(aliases = ["sd", "mol"])]
    Sdf,
    #[value(alias = "smi")]
    Smiles,
}

impl From<InputFormat> for Format {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Sdf => Format::Sdf,
            InputFormat::Smiles => Format::Smiles,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum DbTypeArg {
    #[default]
    #[value(alias = "postgresql")]
    Postgres,
    Mysql,
    Derby,
}

impl From<DbTypeArg> for DbType {
    fn from(t: DbTypeArg) -> Self {
        match t {
            DbTypeArg::Postgres => DbType::Postgres,
            DbTypeArg::Mysql => DbType::Mysql,
            DbTypeArg::Derby => DbType::Derby,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ChemkitArg {
    #[default]
    Rdkit,
    #[value(alias = "gnova")]
    Openchord,
}

impl From<ChemkitArg> for Chemkit {
    fn from(k: ChemkitArg) -> Self {
        match k {
            ChemkitArg::Rdkit => Chemkit::Rdkit,
            ChemkitArg::Openchord => Chemkit::Openchord,
        }
    }
}

pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(normalize_args(args))
}

/// Rewrites single-dash long options (`-dbhost`) to their double-dash form.
///
/// Only names the parser knows as long options are rewritten, so short
/// flags (`-i`, `-vv`), values following an option and everything after
/// `--` pass through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cmd = Cli::command();
    let mut longs: HashSet<&str> = HashSet::from(["help", "version"]);
    let mut with_value: HashSet<&str> = HashSet::new();
    for arg in cmd.get_arguments() {
        if let Some(long) = arg.get_long() {
            longs.insert(long);
            if arg.get_action().takes_values() {
                with_value.insert(long);
            }
        }
    }

    let mut out = Vec::new();
    let mut expect_value = false;
    let mut passthrough = false;
    for (idx, raw) in args.into_iter().map(Into::into).enumerate() {
        if idx == 0 || passthrough || expect_value {
            expect_value = false;
            out.push(raw);
            continue;
        }
        let Some(text) = raw.to_str() else {
            out.push(raw);
            continue;
        };
        if text == "--" {
            passthrough = true;
            out.push(raw);
            continue;
        }

        let long = text
            .strip_prefix("--")
            .or_else(|| text.strip_prefix('-'))
            .filter(|rest| !rest.is_empty());
        match long {
            Some(rest) => {
                let (name, inline) = match rest.split_once('=') {
                    Some((name, _)) => (name, true),
                    None => (rest, false),
                };
                if longs.contains(name) {
                    expect_value = !inline && with_value.contains(name);
                    out.push(OsString::from(format!("--{rest}")));
                } else {
                    out.push(raw);
                }
            }
            None => out.push(raw),
        }
    }
    out
}
