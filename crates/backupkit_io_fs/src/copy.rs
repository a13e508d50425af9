//! Filtered tree traversal and copy orchestration.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{CopyTreeError, SpecCopyError, SpecCopyOptions};
use crate::util::{SpecCopyPatterns, copy_file_with_metadata, is_path_within};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_os: OsString,
    name_dir: String,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_os: OsString,
    name_file: String,
}

#[derive(Debug)]
struct SpecCopyContext {
    spec_cp_pats: SpecCopyPatterns,
    builder_cp_report: ReportCopyBuilder,
    /// Canonical destination when it lies under the source; never descended.
    path_dir_dst_nested: Option<PathBuf>,
}

/// Mirror `dir_source` into `dir_destination`, skipping excluded names.
///
/// Every file and directory whose basename matches an exclude pattern is
/// left out. A matching directory is pruned before descent, so nothing below
/// it is visited or counted. Directory entries are processed in name order.
///
/// Existing destination directories are reused and existing destination
/// files are overwritten, so repeated runs into the same destination are
/// safe.
///
/// The destination may live inside the source (for example under an
/// excluded `build/` folder); the walk then skips it. A source inside the
/// destination is refused.
///
/// Returns [`ReportCopy`] when the run completes (with possible per-entry errors
/// stored in the report). Returns [`CopyTreeError`] only for top-level setup and
/// validation failures, before anything is written.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: SpecCopyOptions,
) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.is_dir() {
        return Err(CopyTreeError::SourceNotDirectory(path_dir_src));
    }
    let spec_cp_pats = SpecCopyPatterns::from_raw(
        &spec_cp_options.patterns_exclude,
        spec_cp_options.rule_pattern,
        spec_cp_options.if_case_insensitive,
    )?;
    if is_path_within(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceInsideDestination {
            source: path_dir_src,
            destination: path_dir_dst,
        });
    }
    fs::create_dir_all(&path_dir_dst).map_err(|e| CopyTreeError::DestinationInitFailed {
        path: path_dir_dst.clone(),
        message: e.to_string(),
    })?;
    let path_dir_dst_nested = if is_path_within(&path_dir_dst, &path_dir_src) {
        fs::canonicalize(&path_dir_dst).ok()
    } else {
        None
    };

    let mut spec_cp_ctx = SpecCopyContext {
        spec_cp_pats,
        builder_cp_report: ReportCopyBuilder::default(),
        path_dir_dst_nested,
    };

    walk_directory(&path_dir_src, &path_dir_dst, &mut spec_cp_ctx);
    Ok(spec_cp_ctx.builder_cp_report.build())
}

fn walk_directory(path_dir_src: &Path, path_dir_dst: &Path, spec_cp_ctx: &mut SpecCopyContext) {
    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    let iter_entries = match fs::read_dir(path_dir_src) {
        Ok(iter) => iter,
        Err(e) => {
            spec_cp_ctx.builder_cp_report.add_warning(format!(
                "Failed to read directory {} ({e})",
                path_dir_src.display()
            ));
            return;
        }
    };

    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx.builder_cp_report.add_warning(format!(
                    "Failed to read directory entry under {} ({e})",
                    path_dir_src.display()
                ));
                continue;
            }
        };
        spec_cp_ctx.builder_cp_report.add_scanned();

        let path_entry = entry.path();
        let name_os = entry.file_name();
        let c_name = name_os.to_string_lossy().to_string();
        if spec_cp_ctx.spec_cp_pats.is_excluded(&c_name) {
            tracing::debug!(path = %path_entry.display(), "excluded");
            spec_cp_ctx.builder_cp_report.add_excluded();
            continue;
        }

        let cfg_file_type = match entry.file_type() {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx
                    .builder_cp_report
                    .add_warning(format!("Failed to inspect {} ({e})", path_entry.display()));
                continue;
            }
        };

        if cfg_file_type.is_dir() {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_os,
                name_dir: c_name,
            });
        } else if cfg_file_type.is_file() {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_os,
                name_file: c_name,
            });
        } else if cfg_file_type.is_symlink() {
            // Links to regular files are copied by content; nothing else is followed.
            match fs::metadata(&path_entry) {
                Ok(meta_target) if meta_target.is_file() => l_files.push(SpecFileEntry {
                    path_file_src: path_entry,
                    name_os,
                    name_file: c_name,
                }),
                Ok(meta_target) if meta_target.is_dir() => {
                    spec_cp_ctx.builder_cp_report.add_warning(format!(
                        "Symlinked directory not followed: {}",
                        path_entry.display()
                    ));
                }
                Ok(_) => {
                    spec_cp_ctx.builder_cp_report.add_warning(format!(
                        "Special file target skipped: {}",
                        path_entry.display()
                    ));
                }
                Err(_) => {
                    spec_cp_ctx
                        .builder_cp_report
                        .add_warning(format!("Broken symlink skipped: {}", path_entry.display()));
                }
            }
        } else {
            spec_cp_ctx
                .builder_cp_report
                .add_warning(format!("Special file skipped: {}", path_entry.display()));
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    for _dir_entry in l_dirs {
        if let Some(path_dir_dst_nested) = &spec_cp_ctx.path_dir_dst_nested
            && fs::canonicalize(&_dir_entry.path_dir_src_sub)
                .is_ok_and(|path_resolved| &path_resolved == path_dir_dst_nested)
        {
            spec_cp_ctx.builder_cp_report.add_warning(format!(
                "Destination folder inside source skipped: {}",
                _dir_entry.path_dir_src_sub.display()
            ));
            continue;
        }
        let path_dir_dst_sub = path_dir_dst.join(&_dir_entry.name_os);
        if let Err(e) = fs::create_dir_all(&path_dir_dst_sub) {
            spec_cp_ctx
                .builder_cp_report
                .add_error(path_dir_dst_sub, e.to_string());
            continue;
        }
        spec_cp_ctx.builder_cp_report.add_dir_copied();
        walk_directory(&_dir_entry.path_dir_src_sub, &path_dir_dst_sub, spec_cp_ctx);
    }

    for _file_entry in l_files {
        match copy_file_entry(&_file_entry, path_dir_dst) {
            Ok(()) => {
                tracing::trace!(path = %_file_entry.path_file_src.display(), "copied");
                spec_cp_ctx.builder_cp_report.add_file_copied();
            }
            Err(spec_error) => spec_cp_ctx
                .builder_cp_report
                .add_error(spec_error.path, spec_error.exception),
        }
    }
}

fn copy_file_entry(
    spec_file_entry: &SpecFileEntry,
    path_dir_dst: &Path,
) -> Result<(), SpecCopyError> {
    let path_file_dst = path_dir_dst.join(&spec_file_entry.name_os);
    copy_file_with_metadata(&spec_file_entry.path_file_src, &path_file_dst).map_err(|e| {
        SpecCopyError {
            path: spec_file_entry.path_file_src.clone(),
            exception: e.to_string(),
        }
    })
}
