//! Backup constants, default presets and layered configuration loading.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::spec::{BackupConfigError, EnumBackupPatternMode, SpecBackupConfig};

/// Names skipped by default: build output, VCS metadata, editor state, logs, temp files.
pub const TUP_IGNORE_PATTERNS_DEFAULT: [&str; 17] = [
    "node_modules",
    ".next",
    ".git",
    ".gitignore",
    "dist",
    "build",
    ".nuxt",
    ".output",
    ".vscode",
    ".idea",
    "*.log",
    "coverage",
    ".nyc_output",
    "*.tmp",
    "*.temp",
    "Thumbs.db",
    ".DS_Store",
];

/// Session folder name prefix.
pub const C_SESSION_DIR_PREFIX: &str = "Backup_";
/// Session timestamp layout; sorts lexicographically.
pub const C_SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Subfolder name for a source root without a final path segment.
pub const C_SUBFOLDER_NAME_FALLBACK: &str = "root";
/// Default parent directory of session folders.
pub const C_OUTPUT_BASE_DIR_DEFAULT: &str = "backups";
/// Config file picked up from the working directory when none is given.
pub const C_CONFIG_FILE_DEFAULT: &str = "backupkit.toml";
/// Prefix of environment overrides, e.g. `BACKUPKIT_OUTPUT_BASE_DIR`.
pub const C_ENV_PREFIX: &str = "BACKUPKIT_";

/// Every root processed and every entry copied.
pub const N_EXIT_CODE_OK: u8 = 0;
/// Run aborted: bad configuration or session folder not created.
pub const N_EXIT_CODE_FATAL: u8 = 1;
/// Run finished but some roots or entries failed.
pub const N_EXIT_CODE_PARTIAL: u8 = 2;

/// Default ignore list as owned patterns.
pub fn derive_default_ignore_patterns() -> Vec<String> {
    TUP_IGNORE_PATTERNS_DEFAULT
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Compiled-in configuration: no sources, `./backups`, default ignore list.
pub fn derive_default_backup_config() -> SpecBackupConfig {
    SpecBackupConfig {
        source_dirs: Vec::new(),
        output_base_dir: PathBuf::from(C_OUTPUT_BASE_DIR_DEFAULT),
        ignore_patterns: derive_default_ignore_patterns(),
        pattern_mode: EnumBackupPatternMode::Glob,
    }
}

/// Merge defaults, a TOML file and `BACKUPKIT_*` variables, in that priority.
///
/// With `path_config = None` the file is [`C_CONFIG_FILE_DEFAULT`] in the
/// working directory and may be absent. An explicit path must exist.
pub fn load_backup_config(path_config: Option<&Path>) -> Result<SpecBackupConfig, BackupConfigError> {
    let path_file = match path_config {
        Some(path) => {
            if !path.is_file() {
                return Err(BackupConfigError::ConfigFileMissing(path.to_path_buf()));
            }
            path.to_path_buf()
        }
        None => PathBuf::from(C_CONFIG_FILE_DEFAULT),
    };

    Figment::from(Serialized::defaults(derive_default_backup_config()))
        .merge(Toml::file_exact(&path_file))
        .merge(Env::prefixed(C_ENV_PREFIX))
        .extract()
        .map_err(|e| BackupConfigError::Extract(e.to_string()))
}
