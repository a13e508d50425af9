//! One backup session: timestamped folder, one filtered copy per source root.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use backupkit_io_fs::{SpecCopyPatterns, copy_tree};
use chrono::{DateTime, TimeZone};

use crate::conf::{C_SESSION_DIR_PREFIX, C_SESSION_TIMESTAMP_FORMAT, C_SUBFOLDER_NAME_FALLBACK};
use crate::report::{EnumRootOutcome, ReportBackupSession, SpecRootReport};
use crate::spec::{BackupSessionError, SpecBackupConfig};

/// `Backup_<YYYYMMDD_HHMMSS>` for the session start instant.
pub fn derive_session_dir_name<Tz>(dt_session: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "{C_SESSION_DIR_PREFIX}{}",
        dt_session.format(C_SESSION_TIMESTAMP_FORMAT)
    )
}

/// Final path segment of a source root, or `root` when there is none.
pub fn derive_subfolder_name(path_dir_src: &Path) -> String {
    path_dir_src
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| C_SUBFOLDER_NAME_FALLBACK.to_string())
}

/// Run a backup session and print its progress and summary to `writer`.
///
/// The ignore list is compiled and the session folder created before any
/// root is touched; failing either aborts the session. After that, problems
/// stay local: a missing root is reported and skipped, a root that cannot be
/// copied is recorded as failed, and per-entry failures live in that root's
/// report.
pub fn run_backup_session<Tz, W>(
    spec_bk_config: &SpecBackupConfig,
    dt_session: &DateTime<Tz>,
    writer: &mut W,
) -> Result<ReportBackupSession, BackupSessionError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    W: Write,
{
    let spec_cp_options = spec_bk_config.derive_copy_options();
    SpecCopyPatterns::from_raw(
        &spec_cp_options.patterns_exclude,
        spec_cp_options.rule_pattern,
        spec_cp_options.if_case_insensitive,
    )
    .map_err(|e| BackupSessionError::InvalidPattern(e.to_string()))?;

    let path_dir_session = spec_bk_config
        .output_base_dir
        .join(derive_session_dir_name(dt_session));
    fs::create_dir_all(&path_dir_session).map_err(|e| BackupSessionError::SessionInitFailed {
        path: path_dir_session.clone(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path_dir_session.display(), "session folder ready");
    writeln!(writer, "Backup folder created: {}", path_dir_session.display())?;

    let mut set_subfolders: HashSet<String> = HashSet::new();
    let mut l_roots = Vec::with_capacity(spec_bk_config.source_dirs.len());

    for path_dir_src in &spec_bk_config.source_dirs {
        let name_subfolder = derive_subfolder_name(path_dir_src);
        let path_dir_dst = path_dir_session.join(&name_subfolder);

        if !path_dir_src.exists() {
            tracing::debug!(path = %path_dir_src.display(), "source directory missing, skipped");
            writeln!(
                writer,
                "Source directory does not exist: {}",
                path_dir_src.display()
            )?;
            l_roots.push(SpecRootReport {
                path_dir_src: path_dir_src.clone(),
                path_dir_dst,
                outcome: EnumRootOutcome::Missing,
            });
            continue;
        }

        if !set_subfolders.insert(name_subfolder.clone()) {
            tracing::warn!(
                subfolder = %name_subfolder,
                "another source root already uses this subfolder; contents are merged"
            );
        }

        let outcome = match copy_tree(path_dir_src, &path_dir_dst, spec_cp_options.clone()) {
            Ok(report_cp) => {
                tracing::info!(
                    "{}",
                    report_cp.format(&format!("[COPY {}]", path_dir_src.display()))
                );
                EnumRootOutcome::Copied(report_cp)
            }
            Err(e) => {
                tracing::error!(path = %path_dir_src.display(), "source root skipped: {e}");
                EnumRootOutcome::Failed(e.to_string())
            }
        };
        l_roots.push(SpecRootReport {
            path_dir_src: path_dir_src.clone(),
            path_dir_dst,
            outcome,
        });
    }

    let report = ReportBackupSession {
        path_dir_session,
        l_roots,
    };
    writeln!(writer, "{}", report.format_summary())?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::{derive_session_dir_name, derive_subfolder_name, run_backup_session};
    use crate::report::{EnumRootOutcome, ReportBackupSession};
    use crate::spec::{BackupSessionError, EnumBackupPatternMode, SpecBackupConfig};

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, txt).expect("write text");
    }

    fn config(source_dirs: Vec<PathBuf>, output_base_dir: PathBuf) -> SpecBackupConfig {
        SpecBackupConfig {
            source_dirs,
            output_base_dir,
            ignore_patterns: vec!["node_modules".to_string(), "*.log".to_string()],
            pattern_mode: EnumBackupPatternMode::Glob,
        }
    }

    fn run(spec_bk_config: &SpecBackupConfig) -> (ReportBackupSession, String) {
        let dt_session = Utc.with_ymd_and_hms(2025, 10, 10, 9, 5, 7).unwrap();
        let mut buf_out: Vec<u8> = Vec::new();
        let report =
            run_backup_session(spec_bk_config, &dt_session, &mut buf_out).expect("run session");
        (report, String::from_utf8(buf_out).expect("utf8 output"))
    }

    #[test]
    fn session_dir_name_layout() {
        let dt_session = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(derive_session_dir_name(&dt_session), "Backup_20250102_030405");
    }

    #[test]
    fn session_dir_names_differ_one_second_apart_and_sort() {
        let dt_first = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let dt_second = dt_first + chrono::Duration::seconds(1);
        let name_first = derive_session_dir_name(&dt_first);
        let name_second = derive_session_dir_name(&dt_second);
        assert_ne!(name_first, name_second);
        assert!(name_first < name_second);
    }

    #[test]
    fn subfolder_name_uses_last_segment() {
        assert_eq!(derive_subfolder_name(Path::new("/work/backend-fresh")), "backend-fresh");
        assert_eq!(derive_subfolder_name(Path::new("/work/docs/")), "docs");
        assert_eq!(derive_subfolder_name(Path::new("/")), "root");
    }

    #[test]
    fn session_copies_roots_and_skips_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let src_app = tmp.path().join("app");
        let src_docs = tmp.path().join("docs");
        let src_absent = tmp.path().join("absent");
        let out = tmp.path().join("out");

        write_text(&src_app.join("a.txt"), "a");
        write_text(&src_app.join("node_modules/x.js"), "x");
        write_text(&src_app.join("b/c.log"), "c");
        write_text(&src_app.join("b/d.txt"), "d");
        write_text(&src_docs.join("guide/intro.md"), "intro");

        let spec_bk_config = config(
            vec![src_app.clone(), src_absent.clone(), src_docs.clone()],
            out.clone(),
        );
        let (report, txt_out) = run(&spec_bk_config);

        let path_session = out.join("Backup_20251010_090507");
        assert_eq!(report.path_dir_session, path_session);
        assert!(path_session.join("app/a.txt").exists());
        assert!(path_session.join("app/b/d.txt").exists());
        assert!(!path_session.join("app/node_modules").exists());
        assert!(!path_session.join("app/b/c.log").exists());
        assert!(path_session.join("docs/guide/intro.md").exists());
        assert!(!path_session.join("absent").exists());

        assert_eq!(report.cnt_files_copied(), 3);
        assert_eq!(report.cnt_dirs_copied(), 2);
        assert_eq!(report.cnt_roots_missing(), 1);
        assert_eq!(report.derive_exit_code(), 0);
        assert!(matches!(report.l_roots[1].outcome, EnumRootOutcome::Missing));

        assert!(txt_out.starts_with(&format!(
            "Backup folder created: {}\n",
            path_session.display()
        )));
        assert!(txt_out.contains(&format!(
            "Source directory does not exist: {}\n",
            src_absent.display()
        )));
        assert!(txt_out.contains("Total files copied: 3\n"));
        assert!(txt_out.contains("Total directories created: 2\n"));
        assert!(txt_out.contains("Backup completed successfully"));
    }

    #[test]
    fn session_with_no_sources_still_creates_folder() {
        let tmp = TempDir::new().expect("tempdir");
        let out = tmp.path().join("out");
        let (report, txt_out) = run(&config(Vec::new(), out.clone()));

        assert!(report.path_dir_session.is_dir());
        assert_eq!(report.cnt_files_copied(), 0);
        assert!(txt_out.contains("Total files copied: 0"));
    }

    #[test]
    fn session_root_that_is_a_file_fails_only_that_root() {
        let tmp = TempDir::new().expect("tempdir");
        let src_file = tmp.path().join("notes.txt");
        let src_ok = tmp.path().join("ok");
        write_text(&src_file, "plain file");
        write_text(&src_ok.join("keep.txt"), "k");

        let spec_bk_config = config(vec![src_file, src_ok], tmp.path().join("out"));
        let (report, txt_out) = run(&spec_bk_config);

        assert!(matches!(report.l_roots[0].outcome, EnumRootOutcome::Failed(_)));
        assert_eq!(report.cnt_files_copied(), 1);
        assert_eq!(report.cnt_roots_failed(), 1);
        assert_eq!(report.derive_exit_code(), 2);
        assert!(txt_out.contains("Backup completed with errors"));
    }

    #[test]
    fn session_output_under_ignored_folder_of_source() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("proj");
        write_text(&src.join("main.rs"), "fn main() {}");
        std::fs::create_dir_all(src.join("build")).expect("mkdir build");

        let spec_bk_config = SpecBackupConfig {
            source_dirs: vec![src.clone()],
            output_base_dir: src.join("build/backups"),
            ..SpecBackupConfig::default()
        };
        let (report, txt_out) = run(&spec_bk_config);

        assert!(matches!(report.l_roots[0].outcome, EnumRootOutcome::Copied(_)));
        assert_eq!(report.cnt_files_copied(), 1);
        assert_eq!(report.cnt_dirs_copied(), 0);
        assert_eq!(report.derive_exit_code(), 0);
        assert!(report.path_dir_session.join("proj/main.rs").exists());
        assert!(!report.path_dir_session.join("proj/build").exists());
        assert!(txt_out.contains("Backup completed successfully"));
    }

    #[test]
    fn session_output_inside_copied_folder_does_not_recurse() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("proj");
        write_text(&src.join("main.rs"), "fn main() {}");

        let (report, _) = run(&config(vec![src.clone()], src.join("out")));

        assert!(matches!(report.l_roots[0].outcome, EnumRootOutcome::Copied(_)));
        assert_eq!(report.cnt_files_copied(), 1);
        assert_eq!(report.derive_exit_code(), 0);
        let path_copy = report.path_dir_session.join("proj");
        assert!(path_copy.join("main.rs").exists());
        assert!(path_copy.join("out/Backup_20251010_090507").is_dir());
        assert!(!path_copy.join("out/Backup_20251010_090507/proj").exists());
    }

    #[test]
    fn session_same_basename_roots_merge() {
        let tmp = TempDir::new().expect("tempdir");
        let src_a = tmp.path().join("a/shared");
        let src_b = tmp.path().join("b/shared");
        write_text(&src_a.join("one.txt"), "1");
        write_text(&src_b.join("two.txt"), "2");

        let (report, _) = run(&config(vec![src_a, src_b], tmp.path().join("out")));
        assert!(report.path_dir_session.join("shared/one.txt").exists());
        assert!(report.path_dir_session.join("shared/two.txt").exists());
        assert_eq!(report.cnt_files_copied(), 2);
    }

    #[test]
    fn session_invalid_pattern_aborts_before_writing() {
        let tmp = TempDir::new().expect("tempdir");
        let out = tmp.path().join("out");
        let spec_bk_config = SpecBackupConfig {
            ignore_patterns: vec!["[".to_string()],
            ..config(Vec::new(), out.clone())
        };

        let dt_session = Utc.with_ymd_and_hms(2025, 10, 10, 9, 5, 7).unwrap();
        let mut buf_out: Vec<u8> = Vec::new();
        let err = run_backup_session(&spec_bk_config, &dt_session, &mut buf_out)
            .expect_err("invalid pattern must fail");
        assert!(matches!(err, BackupSessionError::InvalidPattern(_)));
        assert!(!out.exists());
        assert!(buf_out.is_empty());
    }

    #[test]
    fn session_folder_creation_failure_is_fatal() {
        let tmp = TempDir::new().expect("tempdir");
        let out = tmp.path().join("out");
        write_text(&out, "a file where the output directory should be");

        let dt_session = Utc.with_ymd_and_hms(2025, 10, 10, 9, 5, 7).unwrap();
        let mut buf_out: Vec<u8> = Vec::new();
        let err = run_backup_session(&config(Vec::new(), out), &dt_session, &mut buf_out)
            .expect_err("must fail");
        assert!(matches!(err, BackupSessionError::SessionInitFailed { .. }));
    }
}
