//! Copy report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecCopyError;

/// Aggregate counters and diagnostics for one `copy_tree` run.
#[derive(Debug, Default, Clone)]
pub struct ReportCopy {
    /// Total directory/file entries listed from visited directories.
    pub cnt_scanned: u64,
    /// Files copied successfully.
    pub cnt_files_copied: u64,
    /// Subdirectories mirrored into the destination (root not counted).
    pub cnt_dirs_copied: u64,
    /// Entries dropped by the exclude list (pruned subtrees count once).
    pub cnt_excluded: u64,
    /// Non-fatal warnings collected during traversal/copy.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecCopyError>,
}

impl ReportCopy {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_files_copied".to_string(), self.cnt_files_copied);
        dict_counts.insert("cnt_dirs_copied".to_string(), self.cnt_dirs_copied);
        dict_counts.insert("cnt_excluded".to_string(), self.cnt_excluded);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} files={} dirs={} excluded={} errors={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_files_copied"],
            dict_counts["cnt_dirs_copied"],
            dict_counts["cnt_excluded"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    /// See [`ReportCopy::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportCopy::cnt_files_copied`].
    pub cnt_files_copied: u64,
    /// See [`ReportCopy::cnt_dirs_copied`].
    pub cnt_dirs_copied: u64,
    /// See [`ReportCopy::cnt_excluded`].
    pub cnt_excluded: u64,
    /// See [`ReportCopy::errors`].
    pub errors: Vec<SpecCopyError>,
    /// See [`ReportCopy::warnings`].
    pub warnings: Vec<String>,
}

impl ReportCopyBuilder {
    /// Increment scanned count by one.
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Increment copied-file count by one.
    pub fn add_file_copied(&mut self) {
        self.cnt_files_copied += 1;
    }

    /// Increment copied-directory count by one.
    pub fn add_dir_copied(&mut self) {
        self.cnt_dirs_copied += 1;
    }

    /// Increment excluded count by one.
    pub fn add_excluded(&mut self) {
        self.cnt_excluded += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        tracing::warn!(path = %path.display(), "copy failed: {exception}");
        self.errors.push(SpecCopyError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        ReportCopy {
            cnt_scanned: self.cnt_scanned,
            cnt_files_copied: self.cnt_files_copied,
            cnt_dirs_copied: self.cnt_dirs_copied,
            cnt_excluded: self.cnt_excluded,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
