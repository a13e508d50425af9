//! `backupkit_backup` v1:
//! Timestamped backup sessions over `backupkit_io_fs`.
//!
//! Modules:
//! - `conf`    : constants, default presets and config loading
//! - `spec`    : config model and errors
//! - `report`  : per-root outcomes and summary
//! - `session` : session orchestration
//! - `cli`     : `backupkit` command line

pub mod cli;
pub mod conf;
pub mod report;
pub mod session;
pub mod spec;

pub use conf::{derive_default_backup_config, load_backup_config};
pub use report::{EnumRootOutcome, ReportBackupSession, SpecRootReport};
pub use session::{derive_session_dir_name, derive_subfolder_name, run_backup_session};
pub use spec::{BackupConfigError, BackupSessionError, EnumBackupPatternMode, SpecBackupConfig};
