use std::process::ExitCode;

use backupkit_backup::cli::Cli;
use backupkit_backup::conf::N_EXIT_CODE_FATAL;
use clap::Parser;

fn main() -> ExitCode {
    match Cli::parse().run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(N_EXIT_CODE_FATAL)
        }
    }
}
