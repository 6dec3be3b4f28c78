//! Package clause rewriting.
//!
//! Runs right after the `package` keyword has been consumed.

use log::debug;

use crate::buffer::SpanBuffer;
use crate::error::RewriteError;
use crate::rules::{PackagePolicy, package_name_from_path};
use crate::token::{Scanner, Token, TokenKind};

/// Name of the entry-point package, never annotated
pub const MAIN_PACKAGE: &str = "main";

/// Rewrite the package clause whose keyword was just scanned.
///
/// The next token must be the package name. Without a configured
/// `package_path` the clause is left untouched.
pub fn rewrite_package_clause(
    scanner: &mut Scanner<'_>,
    buf: &mut SpanBuffer<'_>,
    package_path: Option<&str>,
    policy: PackagePolicy,
) -> Result<(), RewriteError> {
    let name = scanner.next()?;
    if name.kind != TokenKind::Ident {
        return Err(RewriteError::syntax(
            name.span.byte_start,
            format!("expected package name, got {:?} {:?}", name.kind, name.text),
        ));
    }

    let Some(package_path) = package_path else {
        return Ok(());
    };

    match policy {
        PackagePolicy::Annotate => annotate(scanner, buf, name, package_path),
        PackagePolicy::Rename => {
            let new_name = package_name_from_path(package_path);
            debug!("renaming package {} to {}", name.text, new_name);
            buf.replace(name.span, &new_name);
            Ok(())
        }
    }
}

fn annotate(
    scanner: &mut Scanner<'_>,
    buf: &mut SpanBuffer<'_>,
    name: Token<'_>,
    package_path: &str,
) -> Result<(), RewriteError> {
    if name.text == MAIN_PACKAGE {
        return Ok(());
    }

    // An existing import comment on the same line is replaced, in its own
    // comment style, rather than followed by a second one.
    let next = scanner.peek()?;
    if next.kind == TokenKind::Comment
        && is_import_comment(next.text)
        && on_same_line(buf, name, next)
    {
        let comment = if next.text.starts_with("/*") {
            format!("/* import \"{package_path}\" */")
        } else {
            format!("// import \"{package_path}\"")
        };
        debug!("replacing import comment {:?}", next.text);
        buf.replace(next.span, &comment);
        return Ok(());
    }

    let annotation = if code_follows_on_line(scanner, buf, name)? {
        format!(" /* import \"{package_path}\" */")
    } else {
        format!(" // import \"{package_path}\"")
    };
    debug!("annotating package {} with {}", name.text, package_path);
    buf.insert(name.span.byte_end, &annotation);
    Ok(())
}

/// Whether a line comment appended after `name` would swallow anything
/// other than comments up to the end of its line
///
/// A block comment that spans lines counts as code: cutting it in half
/// leaves its tail outside any comment.
fn code_follows_on_line(
    scanner: &Scanner<'_>,
    buf: &SpanBuffer<'_>,
    name: Token<'_>,
) -> Result<bool, RewriteError> {
    let mut ahead = scanner.clone();
    loop {
        let token = ahead.next()?;
        if !on_same_line(buf, name, token) {
            return Ok(false);
        }
        match token.kind {
            TokenKind::Eof => return Ok(false),
            TokenKind::Comment if token.text.starts_with("//") => return Ok(false),
            TokenKind::Comment if !token.text.contains('\n') => {}
            _ => return Ok(true),
        }
    }
}

fn is_import_comment(text: &str) -> bool {
    let body = text
        .strip_prefix("//")
        .or_else(|| text.strip_prefix("/*").and_then(|t| t.strip_suffix("*/")))
        .unwrap_or(text);
    body.trim_start().starts_with("import \"")
}

fn on_same_line(buf: &SpanBuffer<'_>, name: Token<'_>, comment: Token<'_>) -> bool {
    !buf.source_between(name.span.byte_end, comment.span.byte_start)
        .contains(&b'\n')
}
