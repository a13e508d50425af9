//! `backupkit_io_fs` v1:
//! Filtered directory-tree copy engine.
//!
//! Modules:
//! - `copy`   : traversal and copy orchestration
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : pattern matching and file-copy helpers

pub mod copy;
pub mod report;
pub mod spec;
mod util;

pub use copy::copy_tree;
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{CopyTreeError, EnumCopyPatternMode, SpecCopyError, SpecCopyOptions};
pub use util::SpecCopyPatterns;
