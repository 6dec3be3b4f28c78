use std::path::PathBuf;

use serde::Serialize;

use crate::buffer::Replacement;

/// Outcome of rewriting one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the walk root
    pub path: PathBuf,
    /// Canonical package path applied to the file, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Whether the rewritten bytes differ from the original
    pub changed: bool,
    /// BLAKE3 checksum before rewriting
    pub checksum_before: String,
    /// BLAKE3 checksum after rewriting
    pub checksum_after: String,
    /// Replacements applied, in source order
    pub replacements: Vec<Replacement>,
}

/// Report of a whole rename run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    /// Unique identifier of this run
    pub run_id: String,
    pub root: PathBuf,
    /// True when no file was written
    pub dry_run: bool,
    /// Files visited, in walk order
    pub files: Vec<FileReport>,
    /// Entries skipped by the exclusion list
    pub skipped: Vec<PathBuf>,
}

impl RenameReport {
    pub fn new(root: PathBuf, dry_run: bool) -> Self {
        Self {
            run_id: generate_run_id(),
            root,
            dry_run,
            files: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of files whose content changed
    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }

    /// Number of files visited but left byte-identical
    pub fn unchanged_count(&self) -> usize {
        self.files.len() - self.changed_count()
    }

    /// Total replacements across all files
    pub fn replacement_count(&self) -> usize {
        self.files.iter().map(|f| f.replacements.len()).sum()
    }
}

/// Generate a unique run ID
pub fn generate_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// JSON response written by the command-line tool
#[derive(Debug, Clone, Serialize)]
pub struct RenameResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RenameReport>,
}

impl RenameResponse {
    pub fn success(report: RenameReport) -> Self {
        Self {
            success: true,
            error: None,
            report: Some(report),
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            report: None,
        }
    }
}
