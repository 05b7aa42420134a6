//! Process exit codes (BSD sysexits.h compatible).

use badapple::{ProcessError, db, describe, io};

use crate::config::ConfigError;
use crate::io::OpenError;

/// Command line usage error
pub const USAGE: u8 = 64;

/// Data format error
pub const DATAERR: u8 = 65;

/// Cannot open input
pub const NOINPUT: u8 = 66;

/// Service unavailable
pub const UNAVAILABLE: u8 = 69;

/// Internal software error
pub const SOFTWARE: u8 = 70;

/// Can't create output file
pub const CANTCREAT: u8 = 73;

/// Input/output error
pub const IOERR: u8 = 74;

/// Exit code for a parse failure; help and version requests are not failures.
pub fn for_clap(err: &clap::Error) -> u8 {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => USAGE,
    }
}

pub fn for_config(err: &ConfigError) -> u8 {
    match err {
        ConfigError::InputNotFound(_) => NOINPUT,
        _ => USAGE,
    }
}

/// Picks the code of the first error in the chain with a known type.
pub fn code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return for_config(e);
        }
        if let Some(e) = cause.downcast_ref::<OpenError>() {
            return match e {
                OpenError::Input { .. } => NOINPUT,
                OpenError::Output { .. } => CANTCREAT,
            };
        }
        if let Some(e) = cause.downcast_ref::<db::Error>() {
            return for_db(e);
        }
        if let Some(e) = cause.downcast_ref::<io::Error>() {
            return for_io(e);
        }
        if let Some(e) = cause.downcast_ref::<describe::Error>() {
            return match e {
                describe::Error::Db(e) => for_db(e),
                describe::Error::ScaffoldNotFound(_) => DATAERR,
            };
        }
        if let Some(e) = cause.downcast_ref::<ProcessError>() {
            return match e {
                ProcessError::Db(e) => for_db(e),
                ProcessError::Io(e) => for_io(e),
            };
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return IOERR;
        }
    }
    SOFTWARE
}

fn for_db(err: &db::Error) -> u8 {
    match err {
        db::Error::Connect { .. } | db::Error::Query { .. } | db::Error::NoCartridge(_) => {
            UNAVAILABLE
        }
        db::Error::Url(_) | db::Error::InvalidIdentifier(_) => USAGE,
        db::Error::Conversion { .. } => DATAERR,
        db::Error::Runtime(_) => SOFTWARE,
    }
}

fn for_io(err: &io::Error) -> u8 {
    match err {
        io::Error::Io { .. } => IOERR,
        io::Error::Parse { .. } => DATAERR,
        io::Error::NotationMismatch { .. } => SOFTWARE,
    }
}
