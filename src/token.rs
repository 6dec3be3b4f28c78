use logos::{Lexer, Logos};
use serde::Serialize;

use crate::error::RewriteError;
use crate::position::Span;

/// Token kinds the rewriter distinguishes
///
/// Everything the rewriter never inspects (operators, numbers, runes,
/// keywords other than `package` and `import`) collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// `package` keyword
    Package,
    /// `import` keyword
    Import,
    Ident,
    /// Interpreted string literal, `"..."`
    String,
    /// Raw string literal, `` `...` ``
    RawString,
    LParen,
    RParen,
    Semicolon,
    Period,
    /// Line or block comment
    Comment,
    Other,
    Eof,
}

impl TokenKind {
    pub fn is_string(&self) -> bool {
        matches!(self, TokenKind::String | TokenKind::RawString)
    }
}

/// A classified token borrowing its text from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Byte span in the original source
    pub span: Span,
    pub kind: TokenKind,
    /// Literal text, delimiters included for strings and comments
    pub text: &'src str,
}

/// Reasons a token could not be scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanErrorKind {
    #[default]
    UnexpectedCharacter,
    UnterminatedComment,
    UnterminatedString,
    UnterminatedRawString,
    UnterminatedRune,
    EmptyRune,
    MultiCharRune,
    NewlineInLiteral,
    UnknownEscape,
    IllegalEscapeDigit,
    EscapeOutOfRange,
}

impl ScanErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ScanErrorKind::UnexpectedCharacter => "unexpected character",
            ScanErrorKind::UnterminatedComment => "comment not terminated",
            ScanErrorKind::UnterminatedString => "string literal not terminated",
            ScanErrorKind::UnterminatedRawString => "raw string literal not terminated",
            ScanErrorKind::UnterminatedRune => "rune literal not terminated",
            ScanErrorKind::EmptyRune => "empty rune literal or unescaped ' in rune literal",
            ScanErrorKind::NewlineInLiteral => "newline in literal",
            ScanErrorKind::MultiCharRune => "more than one character in rune literal",
            ScanErrorKind::UnknownEscape => "unknown escape sequence",
            ScanErrorKind::IllegalEscapeDigit => "illegal character in escape sequence",
            ScanErrorKind::EscapeOutOfRange => "escape sequence is invalid Unicode code point",
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = ScanErrorKind)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("//", line_comment)]
    #[token("/*", block_comment)]
    Comment,

    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Ident,

    #[token("\"", interpreted_string)]
    String,
    #[token("`", raw_string)]
    RawString,
    #[token("'", rune_literal)]
    Rune,
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Period,
    #[regex(r"[-+*/%&|^<>=!:,~\[\]{}]")]
    Operator,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Comment => TokenKind::Comment,
            RawToken::Package => TokenKind::Package,
            RawToken::Import => TokenKind::Import,
            RawToken::Ident => TokenKind::Ident,
            RawToken::String => TokenKind::String,
            RawToken::RawString => TokenKind::RawString,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Period => TokenKind::Period,
            RawToken::Rune | RawToken::Number | RawToken::Operator => TokenKind::Other,
        }
    }
}

/// `//` comment up to, not including, the newline
fn line_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), ScanErrorKind> {
    let rem = lex.remainder();
    lex.bump(rem.find('\n').unwrap_or(rem.len()));
    Ok(())
}

fn block_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), ScanErrorKind> {
    let rem = lex.remainder();
    match rem.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(ScanErrorKind::UnterminatedComment)
        }
    }
}

fn raw_string(lex: &mut Lexer<'_, RawToken>) -> Result<(), ScanErrorKind> {
    let rem = lex.remainder();
    match rem.find('`') {
        Some(end) => {
            lex.bump(end + 1);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(ScanErrorKind::UnterminatedRawString)
        }
    }
}

fn interpreted_string(lex: &mut Lexer<'_, RawToken>) -> Result<(), ScanErrorKind> {
    quoted_literal(lex, b'"', ScanErrorKind::UnterminatedString).map(|_| ())
}

fn rune_literal(lex: &mut Lexer<'_, RawToken>) -> Result<(), ScanErrorKind> {
    match quoted_literal(lex, b'\'', ScanErrorKind::UnterminatedRune)? {
        0 => Err(ScanErrorKind::EmptyRune),
        1 => Ok(()),
        _ => Err(ScanErrorKind::MultiCharRune),
    }
}

/// Scan the body of a quoted literal whose opening quote was already matched.
///
/// Returns the number of characters in the body, an escape sequence counting
/// as one. Every bump lands right after an ASCII byte, so the lexer always
/// stays on a char boundary.
fn quoted_literal(
    lex: &mut Lexer<'_, RawToken>,
    quote: u8,
    unterminated: ScanErrorKind,
) -> Result<usize, ScanErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut i = 0;
    let mut chars = 0;
    while i < rem.len() {
        match rem[i] {
            b if b == quote => {
                lex.bump(i + 1);
                return Ok(chars);
            }
            b'\n' => {
                lex.bump(i);
                return Err(ScanErrorKind::NewlineInLiteral);
            }
            b'\\' => match rem.get(i + 1) {
                Some(&next) if is_escape(next, quote) => {
                    i = escape_end(rem, i + 1).map_err(|(end, kind)| {
                        lex.bump(end);
                        kind
                    })?;
                    chars += 1;
                }
                Some(b'\n') | None => {
                    lex.bump(i + 1);
                    return Err(unterminated);
                }
                Some(_) => {
                    lex.bump(i + 1);
                    return Err(ScanErrorKind::UnknownEscape);
                }
            },
            b => {
                // UTF-8 continuation bytes belong to the preceding char
                if b & 0xC0 != 0x80 {
                    chars += 1;
                }
                i += 1;
            }
        }
    }
    lex.bump(rem.len());
    Err(unterminated)
}

fn is_escape(b: u8, quote: u8) -> bool {
    b == quote || matches!(b, b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' | b'x' | b'u' | b'U' | b'0'..=b'7')
}

fn is_octal_digit(b: &u8) -> bool {
    matches!(*b, b'0'..=b'7')
}

/// Validate the escape whose letter (or first octal digit) is at `at`.
///
/// Returns the offset just past the escape, or the offset to stop the lexer
/// at together with the error.
fn escape_end(rem: &[u8], at: usize) -> Result<usize, (usize, ScanErrorKind)> {
    let (start, count, radix, max, is_digit): (usize, usize, u32, u32, fn(&u8) -> bool) =
        match rem[at] {
            b'x' => (at + 1, 2, 16, 0xFF, u8::is_ascii_hexdigit),
            b'u' => (at + 1, 4, 16, char::MAX as u32, u8::is_ascii_hexdigit),
            b'U' => (at + 1, 8, 16, char::MAX as u32, u8::is_ascii_hexdigit),
            b'0'..=b'7' => (at, 3, 8, 0xFF, is_octal_digit),
            _ => return Ok(at + 1),
        };

    let digits = rem.get(start..).unwrap_or_default();
    let valid = digits.iter().take(count).take_while(|&b| is_digit(b)).count();
    if valid < count {
        return Err((start + valid, ScanErrorKind::IllegalEscapeDigit));
    }

    let value = digits[..count].iter().fold(0u64, |acc, &d| {
        acc * u64::from(radix) + u64::from((d as char).to_digit(radix).unwrap_or(0))
    });
    let in_range = match rem[at] {
        b'u' | b'U' => u32::try_from(value).ok().and_then(char::from_u32).is_some(),
        _ => value <= u64::from(max),
    };
    if !in_range {
        return Err((start + count, ScanErrorKind::EscapeOutOfRange));
    }
    Ok(start + count)
}

/// Token classifier over one source file
///
/// Yields tokens, comments included, until `Eof`; calling `next` after
/// `Eof` keeps returning `Eof`. A leading byte-order mark is skipped but
/// spans stay relative to the full source. Cloning gives an independent
/// lookahead cursor.
#[derive(Clone)]
pub struct Scanner<'src> {
    lexer: Lexer<'src, RawToken>,
    base: usize,
    len: usize,
    peeked: Option<Token<'src>>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        let body = source.strip_prefix('\u{FEFF}').unwrap_or(source);
        Self {
            lexer: RawToken::lexer(body),
            base: source.len() - body.len(),
            len: source.len(),
            peeked: None,
        }
    }

    /// Next token, or a scan error at the offending offset
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Token<'src>, RewriteError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    /// Look at the next token without consuming it
    pub fn peek(&mut self) -> Result<Token<'src>, RewriteError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        Ok(*self.peeked.insert(token))
    }

    fn scan(&mut self) -> Result<Token<'src>, RewriteError> {
        let Some(result) = self.lexer.next() else {
            return Ok(Token {
                span: Span::at(self.len),
                kind: TokenKind::Eof,
                text: "",
            });
        };

        let range = self.lexer.span();
        let span = Span::new(range.start, range.end).offset_by(self.base);
        match result {
            Ok(raw) => Ok(Token {
                span,
                kind: raw.into(),
                text: self.lexer.slice(),
            }),
            Err(kind) => Err(RewriteError::scan(span.byte_start, kind.message())),
        }
    }
}
