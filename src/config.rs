use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{RepackError, Result};
use crate::rules::{ImportRewrites, PackagePolicy, ReplacementRules};
use crate::walk::ExcludeSet;

/// Options for a rename run
///
/// Deserializable from JSON:
///
/// ```
/// use go_repack::{PackagePolicy, RenameOpts};
/// let opts = RenameOpts::from_json_str(r#"{
///     "package": "example.com/newname",
///     "imports": {"github.com/user/repo": "example.com/newname"},
///     "exclude": ["vendor"]
/// }"#).unwrap();
/// assert_eq!(opts.policy, PackagePolicy::Annotate);
/// assert_eq!(opts.exclude, vec!["vendor".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameOpts {
    /// Base canonical path; each file's package path is this joined with
    /// the file's directory relative to the root. Empty disables package
    /// clause rewriting.
    pub package: Option<String>,
    /// Old import prefix to new import prefix; a prefix may appear only once
    #[serde(deserialize_with = "unique_imports")]
    pub imports: BTreeMap<String, String>,
    /// Paths relative to the root that are not visited
    pub exclude: Vec<String>,
    pub policy: PackagePolicy,
    /// Compute the report without writing any file
    pub dry_run: bool,
}

impl RenameOpts {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| RepackError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Validated run-wide replacement rules
    pub fn replacement_rules(&self) -> Result<ReplacementRules> {
        Ok(ReplacementRules {
            package_base: self.package.clone().filter(|p| !p.is_empty()),
            imports: ImportRewrites::from_pairs(self.imports.clone())?,
            policy: self.policy,
        })
    }

    pub fn exclude_set(&self) -> ExcludeSet {
        ExcludeSet::new(self.exclude.as_slice())
    }
}

/// Collect `(old, new)` import rules, rejecting a prefix given twice
pub fn collect_import_rules<I>(rules: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut imports = BTreeMap::new();
    for (from, to) in rules {
        if imports.contains_key(&from) {
            return Err(RepackError::Config(format!("duplicate import rule for {from:?}")));
        }
        imports.insert(from, to);
    }
    Ok(imports)
}

fn unique_imports<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ImportsVisitor;

    impl<'de> Visitor<'de> for ImportsVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of old import prefix to new import prefix")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::new();
            while let Some(entry) = map.next_entry::<String, String>()? {
                entries.push(entry);
            }
            collect_import_rules(entries).map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_map(ImportsVisitor)
}

/// Parse an `OLD=NEW` import rule
pub fn parse_import_rule(rule: &str) -> std::result::Result<(String, String), String> {
    match rule.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got {rule:?}")),
    }
}
