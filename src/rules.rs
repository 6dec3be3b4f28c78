use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{RepackError, Result};

/// How the package clause is rewritten when a package path is configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackagePolicy {
    /// Keep the declared name and append a canonical import comment,
    /// `package foo // import "example.com/foo"`. `main` packages are left alone.
    #[default]
    Annotate,
    /// Replace the declared name with the last segment of the package path
    Rename,
}

/// One old-prefix to new-prefix import rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule {
    pub from: String,
    pub to: String,
}

impl PrefixRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self> {
        let from = from.into();
        if from.is_empty() {
            return Err(RepackError::Config(
                "import rule with an empty source prefix".to_string(),
            ));
        }
        Ok(Self { from, to: to.into() })
    }

    /// Rewrite `path` if it is `from` or lies below it
    ///
    /// Matching respects path segments: `old/path` covers `old/path` and
    /// `old/path/sub` but not `old/pathological`. A prefix ending in `/`
    /// matches anything under it.
    pub fn apply(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(self.from.as_str())?;
        if rest.is_empty() || rest.starts_with('/') || self.from.ends_with('/') {
            Some(format!("{}{}", self.to, rest))
        } else {
            None
        }
    }
}

/// Import prefix rules in matching order
///
/// Rules are tried longest prefix first; equal lengths keep input order.
/// The first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRewrites {
    rules: Vec<PrefixRule>,
}

impl ImportRewrites {
    pub fn new(rules: impl IntoIterator<Item = PrefixRule>) -> Self {
        let mut rules: Vec<PrefixRule> = rules.into_iter().collect();
        rules.sort_by(|a, b| b.from.len().cmp(&a.from.len()));
        Self { rules }
    }

    /// Build from `(from, to)` pairs, rejecting empty prefixes
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(from, to)| PrefixRule::new(from, to))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite an unquoted import path with the first matching rule
    pub fn rewrite_path(&self, path: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.apply(path))
    }

    /// Rewrite a quoted import path literal, keeping its delimiters
    ///
    /// Accepts interpreted (`"..."`) and raw (`` `...` ``) literals.
    pub fn rewrite_literal(&self, literal: &str) -> Option<String> {
        let delimiter = literal.chars().next().filter(|c| *c == '"' || *c == '`')?;
        let inner = literal
            .strip_prefix(delimiter)?
            .strip_suffix(delimiter)?;
        let path = self.rewrite_path(inner)?;
        Some(format!("{delimiter}{path}{delimiter}"))
    }
}

/// Rules for rewriting one file
#[derive(Debug, Clone, Copy)]
pub struct FileRules<'a> {
    /// Canonical package path of the file, if package rewriting is enabled
    pub package: Option<&'a str>,
    pub imports: &'a ImportRewrites,
    pub policy: PackagePolicy,
}

/// Run-wide rules shared read-only by every file
#[derive(Debug, Clone, Default)]
pub struct ReplacementRules {
    /// Base path joined with each file's directory to form its package path
    pub package_base: Option<String>,
    pub imports: ImportRewrites,
    pub policy: PackagePolicy,
}

impl ReplacementRules {
    /// Package path for a file living in `relative_dir` under the walk root
    pub fn package_for_dir(&self, relative_dir: &Path) -> Option<String> {
        let base = self.package_base.as_deref()?;
        Some(join_package_path(base, relative_dir))
    }
}

/// Join a slash-separated base path with a relative directory
///
/// `.` components are dropped so files at the root map to `base` itself.
pub fn join_package_path(base: &str, relative_dir: &Path) -> String {
    let mut joined = base.trim_end_matches('/').to_string();
    for component in relative_dir.components() {
        if let Component::Normal(segment) = component {
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(&segment.to_string_lossy());
        }
    }
    joined
}

/// Go identifier derived from the last segment of a package path
///
/// Anything but ASCII letters, digits and `_` becomes `_`, and a leading
/// digit gets a `_` prefix.
pub fn package_name_from_path(package_path: &str) -> String {
    let segment = package_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let mut name: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
