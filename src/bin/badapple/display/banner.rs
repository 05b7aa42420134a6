use std::io::{self, Write};
use std::sync::LazyLock;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HEADER: &str = "BADAPPLE - command line app for Badapple";

const TAGLINE: &str = "Bioactivity data associative promiscuity pattern learning engine";

static BANNER_FOR_HELP: LazyLock<String> =
    LazyLock::new(|| format!("{HEADER}\n{TAGLINE}, v{VERSION}"));

pub fn banner_for_help() -> &'static str {
    &BANNER_FOR_HELP
}

pub fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   {HEADER}{:>24}", format!("v{VERSION}"));
    let _ = writeln!(stderr, "   \x1b[2m{TAGLINE}\x1b[0m");
    let _ = writeln!(stderr);
}
