use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod exit;
mod io;
mod logging;
mod util;

use config::RunConfig;

fn main() -> ExitCode {
    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(exit::for_clap(&e));
        }
    };

    logging::init(cli.verbose);

    let config = match RunConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            let code = exit::for_config(&e);
            if e.is_usage() {
                display::print_usage_error(&e);
            } else {
                display::print_error(&anyhow::Error::new(e));
            }
            return ExitCode::from(code);
        }
    };

    let ctx = display::Context::detect();
    match commands::dispatch(&config, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::from(exit::code_for(&e))
        }
    }
}
