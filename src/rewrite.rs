//! Per-file rewrite engine.
//!
//! Drives the scanner over one file, hands `package` and `import`
//! declarations to their rewriters and copies everything else verbatim.

use std::path::Path;

use log::{debug, info};

use crate::buffer::{Replacement, SpanBuffer};
use crate::error::{RepackError, Result, RewriteError};
use crate::file::{checksum, read_source, write_in_place};
use crate::imports::rewrite_import_decl;
use crate::json::FileReport;
use crate::package::rewrite_package_clause;
use crate::position::byte_to_position;
use crate::rules::FileRules;
use crate::token::{Scanner, TokenKind};

/// Output of rewriting one source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Rewritten bytes
    pub output: Vec<u8>,
    /// Replacements applied, in source order
    pub replacements: Vec<Replacement>,
}

impl Rewritten {
    pub fn is_unchanged(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// Rewrite the package clause and import paths of one source buffer
///
/// Only the first `package` clause is considered. Every byte outside a
/// replaced span is copied unchanged.
pub fn rewrite_source(source: &[u8], rules: &FileRules<'_>) -> Result<Rewritten, RewriteError> {
    let text = std::str::from_utf8(source)
        .map_err(|e| RewriteError::scan(e.valid_up_to(), "invalid UTF-8 encoding"))?;

    let mut scanner = Scanner::new(text);
    let mut buf = SpanBuffer::new(source);
    let mut seen_package = false;

    loop {
        let token = scanner.next()?;
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Package if !seen_package => {
                seen_package = true;
                rewrite_package_clause(&mut scanner, &mut buf, rules.package, rules.policy)?;
            }
            TokenKind::Import => {
                rewrite_import_decl(&mut scanner, &mut buf, rules.imports)?;
            }
            _ => {}
        }
    }

    let (output, replacements) = buf.finish();
    Ok(Rewritten { output, replacements })
}

/// Rewrite one file in place
///
/// The file is written back with its original permissions unless `dry_run`
/// is set. On any error the file on disk is left untouched.
///
/// # Returns
/// * `Ok(FileReport)` - What was (or would be) changed
/// * `Err(RepackError)` - I/O failure, or a scan/syntax error located by
///   line and column
pub fn rewrite_file(path: &Path, rules: &FileRules<'_>, dry_run: bool) -> Result<FileReport> {
    let file = read_source(path)?;

    let rewritten = rewrite_source(&file.bytes, rules).map_err(|source| RepackError::Rewrite {
        path: path.to_path_buf(),
        position: byte_to_position(&file.bytes, source.offset()),
        source,
    })?;

    let checksum_after = checksum(&rewritten.output);
    if dry_run {
        debug!("dry run, not writing {}", path.display());
    } else {
        write_in_place(path, &rewritten.output, file.permissions.clone())?;
        if !rewritten.is_unchanged() {
            info!(
                "rewrote {} ({} replacement(s))",
                path.display(),
                rewritten.replacements.len()
            );
        }
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        package: rules.package.map(str::to_string),
        changed: checksum_after != file.checksum,
        checksum_before: file.checksum,
        checksum_after,
        replacements: rewritten.replacements,
    })
}
