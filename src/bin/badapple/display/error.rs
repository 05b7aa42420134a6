use std::io::{self, Write};

use anyhow::Error;
use clap::CommandFactory;
use clap::error::ErrorKind;

use crate::cli::Cli;
use crate::config::ConfigError;
use crate::util::text::wrap;

/// Reports a command-line combination error the way the parser reports its
/// own errors, with the usage line.
pub fn print_usage_error(err: &ConfigError) {
    let kind = match err {
        ConfigError::MissingScafId | ConfigError::MissingInput | ConfigError::StdinNeedsFormat => {
            ErrorKind::MissingRequiredArgument
        }
        _ => ErrorKind::InvalidValue,
    };
    let _ = Cli::command().error(kind, err).print();
}

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        for cause in err.chain() {
            collector.collect_typed(cause);
            if collector.has_typed_hints {
                break;
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_typed(&mut self, cause: &(dyn std::error::Error + 'static)) {
        use badapple::{ProcessError, describe};

        if let Some(e) = cause.downcast_ref::<crate::io::OpenError>() {
            self.mark_typed();
            self.collect_open_hints(e);
        } else if let Some(e) = cause.downcast_ref::<badapple::db::Error>() {
            self.mark_typed();
            self.collect_db_hints(e);
        } else if let Some(e) = cause.downcast_ref::<badapple::io::Error>() {
            self.mark_typed();
            self.collect_io_hints(e);
        } else if let Some(e) = cause.downcast_ref::<describe::Error>() {
            self.mark_typed();
            match e {
                describe::Error::Db(e) => self.collect_db_hints(e),
                describe::Error::ScaffoldNotFound(id) => {
                    self.add(format!("No row with id {id} in the scaffold table"));
                    self.add("Check -dbschema and -dbname point at the intended database");
                }
            }
        } else if let Some(e) = cause.downcast_ref::<ProcessError>() {
            self.mark_typed();
            match e {
                ProcessError::Db(e) => self.collect_db_hints(e),
                ProcessError::Io(e) => self.collect_io_hints(e),
            }
        }
    }

    fn collect_open_hints(&mut self, err: &crate::io::OpenError) {
        use crate::io::OpenError;

        match err {
            OpenError::Input { source, .. } => self.collect_std_io_hints(source),
            OpenError::Output { source, .. } => {
                self.collect_std_io_hints(source);
                self.add("Check that the output directory exists");
            }
        }
    }

    fn collect_db_hints(&mut self, err: &badapple::db::Error) {
        use badapple::db::{DbType, Error as DbError};

        match err {
            DbError::Connect { db_type, source } => {
                if db_type.is_embedded() {
                    self.add("The embedded database file is opened read-only at -dbdir/-dbname");
                    self.add("Check that the file exists and is readable");
                } else {
                    self.add(format!("Check that the {db_type} server is running and reachable"));
                    self.add("Verify -dbhost, -dbport, -dbname, -dbusr and -dbpw");
                }
                self.collect_sqlx_hints(source);
            }

            DbError::Query { context, source } => {
                self.add(format!("The {context} query was rejected by the database"));
                self.collect_sqlx_hints(source);
            }

            DbError::NoCartridge(db_type) => {
                self.add(format!(
                    "Scaffold search and structure conversion need a chemical cartridge, which {db_type} lacks"
                ));
                self.add("Use -dbtype postgres with the RDKit or OpenChord extension");
                if *db_type != DbType::Postgres {
                    self.add("-describedb and -describescaf work on every engine");
                }
            }

            DbError::Conversion { from, to } => {
                self.add(format!("The cartridge returned no {to} for a {from} structure"));
                self.add("Write output in the input's own format to avoid the conversion");
            }

            DbError::InvalidIdentifier(name) => {
                self.add(format!("'{name}' may only contain letters, digits and '_'"));
            }

            DbError::Url(_) => {
                self.add("Connection parameters could not form a valid URL");
                self.add("Check -dbhost for stray characters");
            }

            DbError::Runtime(_) => {
                self.add("The async runtime could not start; check system resource limits");
            }
        }
    }

    fn collect_sqlx_hints(&mut self, err: &sqlx::Error) {
        let msg = err.to_string().to_lowercase();

        if msg.contains("password") || msg.contains("authentication") {
            self.add("Authentication failed; check -dbusr and -dbpw (or BADAPPLE_DBUSR/BADAPPLE_DBPW)");
        } else if msg.contains("does not exist") || msg.contains("no such table") {
            self.add("A Badapple table or function is missing; check -dbschema and -chemkit");
        } else if msg.contains("refused") || msg.contains("timed out") {
            self.add("The server did not accept the connection");
        }
    }

    fn collect_io_hints(&mut self, err: &badapple::io::Error) {
        use badapple::io::{Error as IoError, Format};

        match err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {line} in {format} format"
                ));
                self.add("Inspect the file around that line for malformed entries");
                self.add("Try specifying -ifmt to ensure correct format detection");
                match format {
                    Format::Sdf => {
                        self.add("SDF: only V2000 connection tables are read");
                        self.add("SDF: check the counts line and the atom and bond blocks");
                    }
                    Format::Smiles => {
                        self.add("SMILES: one structure per line, optionally followed by a name");
                    }
                }
            }

            IoError::NotationMismatch { .. } => {
                self.add("A structure reached the writer in the wrong notation");
                self.add("This may indicate a bug; please report if reproducible");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data (not UTF-8 text?)");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use badapple::db::{DbType, Error as DbError};

    #[test]
    fn cartridge_hint_mentions_postgres() {
        let err = anyhow::Error::new(DbError::NoCartridge(DbType::Mysql));
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("-dbtype postgres")));
        assert!(hints.iter().any(|h| h.contains("-describedb")));
    }

    #[test]
    fn parse_hint_points_at_line() {
        let err = anyhow::Error::new(badapple::io::Error::parse(
            badapple::io::Format::Smiles,
            7,
            "unclosed ring",
        ))
        .context("Processing failed");
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("line 7"));
        assert!(hints.iter().any(|h| h.starts_with("SMILES:")));
    }

    #[test]
    fn untyped_errors_fall_back_to_message_hints() {
        let err = anyhow::anyhow!("something: No such file or directory");
        let hints = HintCollector::collect(&err).unwrap();
        assert_eq!(hints[0], "Check that the file path is correct");
        assert!(HintCollector::collect(&anyhow::anyhow!("odd")).is_none());
    }
}
