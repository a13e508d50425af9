//! Session report: per-root outcomes and the console summary.

use std::path::PathBuf;

use backupkit_io_fs::ReportCopy;

use crate::conf::{N_EXIT_CODE_OK, N_EXIT_CODE_PARTIAL};

/// What happened to one configured source root.
#[derive(Debug, Clone)]
pub enum EnumRootOutcome {
    /// Traversal ran; the report may still hold per-entry errors.
    Copied(ReportCopy),
    /// Source root does not exist; contributes nothing.
    Missing,
    /// Traversal could not start for this root.
    Failed(String),
}

/// One source root and where it went.
#[derive(Debug, Clone)]
pub struct SpecRootReport {
    /// Configured source root.
    pub path_dir_src: PathBuf,
    /// Subfolder of the session folder.
    pub path_dir_dst: PathBuf,
    /// Result of the root.
    pub outcome: EnumRootOutcome,
}

/// Aggregate result of one backup session.
#[derive(Debug, Clone)]
pub struct ReportBackupSession {
    /// `<output_base_dir>/Backup_<timestamp>`.
    pub path_dir_session: PathBuf,
    /// Per-root results in configured order.
    pub l_roots: Vec<SpecRootReport>,
}

impl ReportBackupSession {
    fn iter_copy_reports(&self) -> impl Iterator<Item = &ReportCopy> {
        self.l_roots.iter().filter_map(|r| match &r.outcome {
            EnumRootOutcome::Copied(report) => Some(report),
            _ => None,
        })
    }

    /// Files copied across all roots.
    pub fn cnt_files_copied(&self) -> u64 {
        self.iter_copy_reports().map(|r| r.cnt_files_copied).sum()
    }

    /// Directories created across all roots.
    pub fn cnt_dirs_copied(&self) -> u64 {
        self.iter_copy_reports().map(|r| r.cnt_dirs_copied).sum()
    }

    /// Files and directories that failed to copy.
    pub fn cnt_entries_failed(&self) -> u64 {
        self.iter_copy_reports().map(|r| r.error_count() as u64).sum()
    }

    /// Roots skipped because they do not exist.
    pub fn cnt_roots_missing(&self) -> u64 {
        self.l_roots
            .iter()
            .filter(|r| matches!(r.outcome, EnumRootOutcome::Missing))
            .count() as u64
    }

    /// Roots whose traversal could not start.
    pub fn cnt_roots_failed(&self) -> u64 {
        self.l_roots
            .iter()
            .filter(|r| matches!(r.outcome, EnumRootOutcome::Failed(_)))
            .count() as u64
    }

    /// No root failed and no entry failed. Missing roots do not count.
    pub fn is_complete(&self) -> bool {
        self.cnt_roots_failed() == 0 && self.cnt_entries_failed() == 0
    }

    /// Process exit code for this session.
    pub fn derive_exit_code(&self) -> u8 {
        if self.is_complete() {
            N_EXIT_CODE_OK
        } else {
            N_EXIT_CODE_PARTIAL
        }
    }

    /// Summary block printed after the last root. Each failed entry and root
    /// is listed under its count, so failures stay visible without logging.
    pub fn format_summary(&self) -> String {
        let mut l_lines = vec![
            String::new(),
            "========== Backup Summary ==========".to_string(),
            format!("Total files copied: {}", self.cnt_files_copied()),
            format!("Total directories created: {}", self.cnt_dirs_copied()),
        ];
        let cnt_entries_failed = self.cnt_entries_failed();
        if cnt_entries_failed > 0 {
            l_lines.push(format!("Entries failed: {cnt_entries_failed}"));
            l_lines.extend(
                self.iter_copy_reports()
                    .flat_map(|r| r.errors.iter())
                    .map(|spec_error| format!("  {spec_error}")),
            );
        }
        let cnt_roots_failed = self.cnt_roots_failed();
        if cnt_roots_failed > 0 {
            l_lines.push(format!("Source directories failed: {cnt_roots_failed}"));
            for spec_root in &self.l_roots {
                if let EnumRootOutcome::Failed(reason) = &spec_root.outcome {
                    l_lines.push(format!("  {} ({reason})", spec_root.path_dir_src.display()));
                }
            }
        }
        if self.is_complete() {
            l_lines.push("Backup completed successfully ✅".to_string());
        } else {
            l_lines.push("Backup completed with errors ⚠".to_string());
        }
        l_lines.join("\n")
    }
}
