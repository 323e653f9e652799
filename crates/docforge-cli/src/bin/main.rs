//! docforge CLI binary entry point
//!
//! This is a thin wrapper that calls the library's `run_cli()` function.

use std::process::ExitCode;

use docforge_cli::run_cli;

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
