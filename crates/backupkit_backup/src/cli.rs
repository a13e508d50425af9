//! Command-line entry for the `backupkit` binary.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use backupkit_log::init_logging;
use chrono::Local;
use clap::Parser;

use crate::conf::load_backup_config;
use crate::session::run_backup_session;

#[derive(Debug, Parser)]
#[command(
    name = "backupkit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Timestamped, filtered backup of source directories",
    long_about = "Copies every configured source directory into \
                  <output_base_dir>/Backup_<YYYYMMDD_HHMMSS>/, skipping files and \
                  directories whose names match the ignore patterns. Settings come from \
                  backupkit.toml and BACKUPKIT_* environment variables."
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Use a specific configuration file instead of ./backupkit.toml
    #[arg(long, value_name = "FILE", env = "BACKUPKIT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load configuration, run one session, map the outcome to an exit code.
    pub fn run(self) -> Result<ExitCode> {
        init_logging(self.verbose, self.quiet);

        let spec_bk_config =
            load_backup_config(self.config.as_deref()).context("Failed to load configuration")?;
        tracing::debug!(?spec_bk_config, "configuration loaded");

        let mut stdout = io::stdout().lock();
        let report = run_backup_session(&spec_bk_config, &Local::now(), &mut stdout)
            .context("Backup aborted")?;
        Ok(ExitCode::from(report.derive_exit_code()))
    }
}
