//! Source tree traversal.
//!
//! Visits every `.go` file under a root in file-name order, skipping
//! excluded paths, and rewrites each one. The walk stops at the first error;
//! files already rewritten stay rewritten.

use std::collections::HashSet;
use std::path::{Component, Path};

use log::{debug, info};
use walkdir::WalkDir;

use crate::config::RenameOpts;
use crate::error::Result;
use crate::json::RenameReport;
use crate::rewrite::rewrite_file;
use crate::rules::FileRules;

/// Extension of the source files that are rewritten
pub const SOURCE_EXTENSION: &str = "go";

/// Decision for one walk entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Excluded directory: skip everything below it
    SkipSubtree,
    /// Excluded file
    SkipFile,
    Visit,
}

/// Relative paths excluded from a walk
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    paths: HashSet<String>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Self {
        let paths = paths
            .iter()
            .map(|p| normalize(Path::new(p.as_ref())))
            .filter(|p| !p.is_empty())
            .collect();
        Self { paths }
    }

    /// Decide what to do with the entry at `relative` (relative to the root)
    pub fn check(&self, relative: &Path, is_dir: bool) -> Visit {
        if !self.paths.contains(&normalize(relative)) {
            Visit::Visit
        } else if is_dir {
            Visit::SkipSubtree
        } else {
            Visit::SkipFile
        }
    }
}

/// Slash-separated form of a relative path, without `.` components
fn normalize(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn is_go_source(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
}

/// Rewrite the package clauses and imports of every Go file under `root`.
///
/// Each file's package path is `opts.package` joined with the file's
/// directory relative to `root`. Returns the report of all visited files,
/// or the first error encountered.
///
/// # Example
/// ```no_run
/// use go_repack::{RenameOpts, rename};
/// let mut opts = RenameOpts::default();
/// opts.package = Some("example.com/newname".to_string());
/// opts.imports.insert("github.com/user/repo".to_string(), "example.com/newname".to_string());
/// opts.exclude.push("vendor".to_string());
/// rename("./path/to/repo", &opts).unwrap();
/// ```
pub fn rename<P: AsRef<Path>>(root: P, opts: &RenameOpts) -> Result<RenameReport> {
    let root = root.as_ref();
    let rules = opts.replacement_rules()?;
    let exclude = opts.exclude_set();
    let mut report = RenameReport::new(root.to_path_buf(), opts.dry_run);

    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();
        let is_dir = entry.file_type().is_dir();

        if entry.depth() > 0 {
            match exclude.check(&relative, is_dir) {
                Visit::SkipSubtree => {
                    debug!("skipping directory {}", relative.display());
                    walker.skip_current_dir();
                    report.skipped.push(relative);
                    continue;
                }
                Visit::SkipFile => {
                    debug!("skipping file {}", relative.display());
                    report.skipped.push(relative);
                    continue;
                }
                Visit::Visit => {}
            }
        }

        if !entry.file_type().is_file() || !is_go_source(entry.path()) {
            continue;
        }

        let package = rules.package_for_dir(relative.parent().unwrap_or(Path::new("")));
        let file_rules = FileRules {
            package: package.as_deref(),
            imports: &rules.imports,
            policy: rules.policy,
        };

        debug!("visiting {}", relative.display());
        let mut file_report = rewrite_file(entry.path(), &file_rules, opts.dry_run)?;
        file_report.path = relative;
        report.files.push(file_report);
    }

    info!(
        "{} file(s) visited, {} changed, {} skipped",
        report.files.len(),
        report.changed_count(),
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_exclude_set_check() {
        let exclude = ExcludeSet::new(&["vendor/", "./util/skip.go", ""]);

        assert_eq!(exclude.check(Path::new("vendor"), true), Visit::SkipSubtree);
        assert_eq!(exclude.check(Path::new("util/skip.go"), false), Visit::SkipFile);
        assert_eq!(exclude.check(Path::new("util/keep.go"), false), Visit::Visit);
        assert_eq!(exclude.check(Path::new("util"), true), Visit::Visit);
        assert_eq!(exclude.check(Path::new("sub/vendor"), true), Visit::Visit);
    }

    #[test]
    fn test_is_go_source() {
        assert!(is_go_source(Path::new("file.go")));
        assert!(is_go_source(Path::new("a/b/file_test.go")));
        assert!(!is_go_source(Path::new("go.mod")));
        assert!(!is_go_source(Path::new("README.md")));
        assert!(!is_go_source(Path::new("go")));
    }

    #[test]
    fn test_rename_skips_excluded_and_non_go_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("vendor/dep")).unwrap();
        fs::create_dir_all(root.join("util")).unwrap();
        fs::write(root.join("main.go"), "package main\n\nimport \"old/x/util\"\n").unwrap();
        fs::write(root.join("util/util.go"), "package util\n").unwrap();
        fs::write(root.join("util/skip.go"), "package util\n").unwrap();
        fs::write(root.join("vendor/dep/dep.go"), "package dep\n\nimport \"old/x\"\n").unwrap();
        fs::write(root.join("notes.txt"), "import \"old/x\"\n").unwrap();

        let mut opts = RenameOpts::default();
        opts.package = Some("new/x".to_string());
        opts.imports.insert("old/x".to_string(), "new/x".to_string());
        opts.exclude = vec!["vendor".to_string(), "util/skip.go".to_string()];

        let report = rename(root, &opts).unwrap();

        let visited: Vec<_> = report.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            visited,
            vec![Path::new("main.go").to_path_buf(), Path::new("util/util.go").to_path_buf()]
        );
        assert_eq!(report.skipped.len(), 2);

        assert_eq!(
            fs::read_to_string(root.join("main.go")).unwrap(),
            "package main\n\nimport \"new/x/util\"\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("util/util.go")).unwrap(),
            "package util // import \"new/x/util\"\n"
        );
        assert_eq!(fs::read_to_string(root.join("util/skip.go")).unwrap(), "package util\n");
        assert_eq!(
            fs::read_to_string(root.join("vendor/dep/dep.go")).unwrap(),
            "package dep\n\nimport \"old/x\"\n"
        );
        assert_eq!(fs::read_to_string(root.join("notes.txt")).unwrap(), "import \"old/x\"\n");
    }

    #[test]
    fn test_rename_stops_at_first_error() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.go"), "package a\n").unwrap();
        fs::write(root.join("b.go"), "package \"b\"\n").unwrap();
        fs::write(root.join("c.go"), "package c\n").unwrap();

        let opts = RenameOpts {
            package: Some("new/x".to_string()),
            ..Default::default()
        };
        let err = rename(root, &opts).unwrap_err();

        assert!(err.to_string().contains("b.go"));
        assert_eq!(
            fs::read_to_string(root.join("a.go")).unwrap(),
            "package a // import \"new/x\"\n"
        );
        assert_eq!(fs::read_to_string(root.join("c.go")).unwrap(), "package c\n");
    }

    #[test]
    fn test_rename_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.go"), "package a\n").unwrap();

        let opts = RenameOpts {
            package: Some("new/x".to_string()),
            dry_run: true,
            ..Default::default()
        };
        let report = rename(root, &opts).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.changed_count(), 1);
        assert_eq!(fs::read_to_string(root.join("a.go")).unwrap(), "package a\n");
    }
}
