//! Copy specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for the exclude list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCopyPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    #[default]
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Exact basename match.
    Literal,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_tree`.
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Exclude patterns applied to both file and directory basenames.
    ///
    /// A matching directory is pruned before descent.
    pub patterns_exclude: Vec<String>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumCopyPatternMode,
    /// Match names case-insensitively.
    ///
    /// Defaults to the host filesystem convention (Windows: `true`).
    pub if_case_insensitive: bool,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            patterns_exclude: Vec::new(),
            rule_pattern: EnumCopyPatternMode::Glob,
            if_case_insensitive: cfg!(windows),
        }
    }
}

impl SpecCopyOptions {
    /// Build glob options from an exclude list.
    pub fn with_excludes<I, S>(patterns_exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns_exclude: patterns_exclude.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// One copy failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyError {
    /// Failed source or destination path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

impl fmt::Display for SpecCopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.exception)
    }
}

/// Reasons `copy_tree` refuses to start. Nothing has been copied when one of
/// these is returned.
#[derive(Debug)]
pub enum CopyTreeError {
    InvalidPattern(String),
    SourceNotDirectory(PathBuf),
    /// The destination contains the source, so the walk would read its own output.
    SourceInsideDestination {
        source: PathBuf,
        destination: PathBuf,
    },
    /// `create_dir_all` on the destination failed.
    DestinationInitFailed { path: PathBuf, message: String },
}

impl fmt::Display for CopyTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(msg) => f.write_str(msg),
            Self::SourceNotDirectory(path) => {
                write!(f, "{} is missing or not a directory", path.display())
            }
            Self::SourceInsideDestination {
                source,
                destination,
            } => write!(
                f,
                "cannot back up {} into {}, which contains it",
                source.display(),
                destination.display()
            ),
            Self::DestinationInitFailed { path, message } => {
                write!(f, "cannot create {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for CopyTreeError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
