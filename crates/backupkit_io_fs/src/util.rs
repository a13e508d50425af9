use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use regex::{Regex, RegexBuilder};

use crate::spec::{CopyTreeError, EnumCopyPatternMode};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeCopyPatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

/// Compiled exclude list, matched against basenames only.
#[derive(Debug, Clone)]
pub struct SpecCopyPatterns {
    pub(crate) patterns_exclude: Option<TypeCopyPatternSeq>,
    pub(crate) if_case_insensitive: bool,
}

impl SpecCopyPatterns {
    /// Compile `patterns_exclude` under `rule_pattern`.
    ///
    /// An empty list compiles to a matcher that excludes nothing.
    pub fn from_raw(
        patterns_exclude: &[String],
        rule_pattern: EnumCopyPatternMode,
        if_case_insensitive: bool,
    ) -> Result<Self, CopyTreeError> {
        Ok(Self {
            patterns_exclude: _compile(patterns_exclude, rule_pattern, if_case_insensitive)?,
            if_case_insensitive,
        })
    }

    /// Whether `name` matches at least one exclude pattern.
    pub fn is_excluded(&self, name: &str) -> bool {
        _is_pattern_matching(
            name,
            self.patterns_exclude.as_ref(),
            self.if_case_insensitive,
        )
    }
}

fn _compile(
    patterns: &[String],
    rule_pattern: EnumCopyPatternMode,
    if_case_insensitive: bool,
) -> Result<Option<TypeCopyPatternSeq>, CopyTreeError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumCopyPatternMode::Literal => {
            let l_literal = if if_case_insensitive {
                patterns.iter().map(|p| p.to_lowercase()).collect()
            } else {
                patterns.to_vec()
            };
            Ok(Some(TypeCopyPatternSeq::Literal(l_literal)))
        }
        EnumCopyPatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let matcher = GlobBuilder::new(pattern)
                    .case_insensitive(if_case_insensitive)
                    .build()
                    .map_err(|e| {
                        CopyTreeError::InvalidPattern(format!("Invalid exclude pattern: {e}"))
                    })?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(Some(TypeCopyPatternSeq::Glob(l_glob)))
        }
        EnumCopyPatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(if_case_insensitive)
                    .build()
                    .map_err(|e| {
                        CopyTreeError::InvalidPattern(format!("Invalid exclude pattern: {e}"))
                    })?;
                l_regex.push(regex);
            }
            Ok(Some(TypeCopyPatternSeq::Regex(l_regex)))
        }
    }
}

fn _is_pattern_matching(
    value: &str,
    patterns: Option<&TypeCopyPatternSeq>,
    if_case_insensitive: bool,
) -> bool {
    let Some(patterns) = patterns else {
        return false;
    };

    match patterns {
        TypeCopyPatternSeq::Literal(v) => {
            if if_case_insensitive {
                let value_lower = value.to_lowercase();
                v.iter().any(|p| *p == value_lower)
            } else {
                v.iter().any(|p| p == value)
            }
        }
        TypeCopyPatternSeq::Glob(v) => v.iter().any(|p| p.is_match(value)),
        TypeCopyPatternSeq::Regex(v) => v.iter().any(|p| p.is_match(value)),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _is_relative_to_base(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    // Destination may not exist yet: resolve the nearest existing ancestor.
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && !parent.as_os_str().is_empty()
    {
        return _normalize_path(parent).join(name);
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// `path` equals `path_base` or lies below it, after resolving both.
pub(crate) fn is_path_within(path: &Path, path_base: &Path) -> bool {
    _is_relative_to_base(&_normalize_path(path), &_normalize_path(path_base))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

/// Copy file bytes, then carry over permissions and timestamps.
///
/// An existing destination file is overwritten.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    apply_metadata(path_file_src, path_file_dst)?;
    Ok(())
}

fn apply_metadata(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
