//! Backup configuration model and top-level error types.

use std::fmt;
use std::path::PathBuf;

use backupkit_io_fs::{EnumCopyPatternMode, SpecCopyOptions};
use serde::{Deserialize, Serialize};

use crate::conf::derive_default_backup_config;

////////////////////////////////////////////////////////////////////////////////
// #region Config

/// How `ignore_patterns` are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumBackupPatternMode {
    /// Shell-like wildcards.
    #[default]
    Glob,
    /// Regular expressions.
    Regex,
    /// Exact basenames.
    Literal,
}

impl From<EnumBackupPatternMode> for EnumCopyPatternMode {
    fn from(mode: EnumBackupPatternMode) -> Self {
        match mode {
            EnumBackupPatternMode::Glob => Self::Glob,
            EnumBackupPatternMode::Regex => Self::Regex,
            EnumBackupPatternMode::Literal => Self::Literal,
        }
    }
}

/// Everything one backup session needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecBackupConfig {
    /// Source roots, processed in this order.
    pub source_dirs: Vec<PathBuf>,
    /// Parent of the timestamped session folders.
    pub output_base_dir: PathBuf,
    /// Patterns matched against file and directory basenames.
    pub ignore_patterns: Vec<String>,
    /// Pattern interpretation.
    pub pattern_mode: EnumBackupPatternMode,
}

impl Default for SpecBackupConfig {
    fn default() -> Self {
        derive_default_backup_config()
    }
}

impl SpecBackupConfig {
    /// Copy options shared by every source root of the session.
    pub fn derive_copy_options(&self) -> SpecCopyOptions {
        SpecCopyOptions {
            patterns_exclude: self.ignore_patterns.clone(),
            rule_pattern: self.pattern_mode.into(),
            ..SpecCopyOptions::default()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Configuration could not be assembled.
#[derive(Debug)]
pub enum BackupConfigError {
    /// An explicitly requested config file does not exist.
    ConfigFileMissing(PathBuf),
    /// Merged sources did not deserialize into [`SpecBackupConfig`].
    Extract(String),
}

impl fmt::Display for BackupConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFileMissing(path) => {
                write!(f, "Config file does not exist: {}", path.display())
            }
            Self::Extract(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for BackupConfigError {}

/// Errors that abort the whole session.
#[derive(Debug)]
pub enum BackupSessionError {
    /// An ignore pattern failed to compile.
    InvalidPattern(String),
    /// The session folder could not be created.
    SessionInitFailed {
        /// Session folder path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Writing the console report failed.
    ConsoleWriteFailed(String),
}

impl fmt::Display for BackupSessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::SessionInitFailed { path, message } => write!(
                f,
                "Failed to create backup folder {}: {message}",
                path.display()
            ),
            Self::ConsoleWriteFailed(msg) => write!(f, "Failed to write report: {msg}"),
        }
    }
}

impl std::error::Error for BackupSessionError {}

impl From<std::io::Error> for BackupSessionError {
    fn from(e: std::io::Error) -> Self {
        Self::ConsoleWriteFailed(e.to_string())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use backupkit_io_fs::EnumCopyPatternMode;

    use super::{EnumBackupPatternMode, SpecBackupConfig};

    #[test]
    fn copy_options_follow_config() {
        let spec_bk_config = SpecBackupConfig {
            ignore_patterns: vec!["dist".to_string()],
            pattern_mode: EnumBackupPatternMode::Regex,
            ..SpecBackupConfig::default()
        };
        let spec_cp_options = spec_bk_config.derive_copy_options();
        assert_eq!(spec_cp_options.patterns_exclude, vec!["dist"]);
        assert_eq!(spec_cp_options.rule_pattern, EnumCopyPatternMode::Regex);
        assert_eq!(spec_cp_options.if_case_insensitive, cfg!(windows));
    }
}
