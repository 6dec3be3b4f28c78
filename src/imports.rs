//! Import declaration rewriting.
//!
//! Handles the three import forms: `import "path"`, `import alias "path"`
//! and the parenthesized list. Only path literals are ever replaced;
//! aliases, comments and separators are copied verbatim.

use log::debug;

use crate::buffer::SpanBuffer;
use crate::error::RewriteError;
use crate::rules::ImportRewrites;
use crate::token::{Scanner, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportState {
    /// Right after the `import` keyword
    AwaitFirstToken,
    /// After an alias of a single import
    SawAlias,
    /// Inside `( ... )`
    InList,
    Done,
}

/// Rewrite the import declaration whose keyword was just scanned.
///
/// Returns how many path literals were rewritten. Reaching end of file
/// before the declaration is complete is a syntax error.
pub fn rewrite_import_decl(
    scanner: &mut Scanner<'_>,
    buf: &mut SpanBuffer<'_>,
    imports: &ImportRewrites,
) -> Result<usize, RewriteError> {
    use ImportState::*;

    let mut state = AwaitFirstToken;
    let mut rewritten = 0;

    while state != Done {
        let token = scanner.next()?;
        state = match (state, token.kind) {
            (_, TokenKind::Comment) => state,
            (AwaitFirstToken, TokenKind::LParen) => InList,
            (AwaitFirstToken, TokenKind::Ident | TokenKind::Period) => SawAlias,
            (AwaitFirstToken | SawAlias, kind) if kind.is_string() => {
                rewritten += rewrite_path(buf, token, imports);
                Done
            }
            (InList, TokenKind::RParen) => Done,
            (InList, TokenKind::Ident | TokenKind::Period | TokenKind::Semicolon) => InList,
            (InList, kind) if kind.is_string() => {
                rewritten += rewrite_path(buf, token, imports);
                InList
            }
            (InList, TokenKind::Eof) => {
                return Err(RewriteError::syntax(
                    token.span.byte_start,
                    "import list not terminated",
                ));
            }
            (SawAlias, _) => {
                return Err(unexpected(token, "expected import path after alias"));
            }
            (_, _) => return Err(unexpected(token, "expected import path")),
        };
    }

    Ok(rewritten)
}

/// Replace one path literal if a rule matches; returns 1 when replaced
fn rewrite_path(buf: &mut SpanBuffer<'_>, token: Token<'_>, imports: &ImportRewrites) -> usize {
    match imports.rewrite_literal(token.text) {
        Some(replacement) => {
            debug!("rewriting import {} to {}", token.text, replacement);
            buf.replace(token.span, &replacement);
            1
        }
        None => 0,
    }
}

fn unexpected(token: Token<'_>, expected: &str) -> RewriteError {
    let found = match token.kind {
        TokenKind::Eof => "end of file".to_string(),
        _ => format!("{:?} {:?}", token.kind, token.text),
    };
    RewriteError::syntax(token.span.byte_start, format!("{expected}, found {found}"))
}
