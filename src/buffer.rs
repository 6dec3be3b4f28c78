use serde::Serialize;

use crate::position::Span;

/// A replacement applied by a `SpanBuffer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    /// Span of the original source that was replaced
    pub span: Span,
    /// Original text of the span
    pub original: String,
    /// Text written in its place
    pub replacement: String,
}

/// Append-only output accumulator over a borrowed source
///
/// Bytes outside replaced spans are copied verbatim. The cursor (last copied
/// offset) never moves backwards: replacing a span that starts before it is
/// a caller bug and panics.
#[derive(Debug)]
pub struct SpanBuffer<'src> {
    source: &'src [u8],
    output: Vec<u8>,
    cursor: usize,
    replacements: Vec<Replacement>,
}

impl<'src> SpanBuffer<'src> {
    pub fn new(source: &'src [u8]) -> Self {
        Self {
            source,
            output: Vec::with_capacity(source.len()),
            cursor: 0,
            replacements: Vec::new(),
        }
    }

    /// Last copied offset
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Original bytes in `start..end`, regardless of the cursor
    pub fn source_between(&self, start: usize, end: usize) -> &'src [u8] {
        &self.source[start..end]
    }

    /// Copy `source[cursor..pos]` verbatim and move the cursor to `pos`
    pub fn copy_to(&mut self, pos: usize) {
        assert!(
            pos >= self.cursor && pos <= self.source.len(),
            "copy to {} out of order (cursor {}, source length {})",
            pos,
            self.cursor,
            self.source.len()
        );
        self.output.extend_from_slice(&self.source[self.cursor..pos]);
        self.cursor = pos;
    }

    /// Replace `span` with `replacement`
    ///
    /// # Panics
    /// If the span starts before the cursor, ends before it starts, or ends
    /// past the source.
    pub fn replace(&mut self, span: Span, replacement: &str) {
        assert!(
            span.byte_start <= span.byte_end,
            "invalid span {}..{}",
            span.byte_start,
            span.byte_end
        );
        assert!(
            span.byte_end <= self.source.len(),
            "span {}..{} out of bounds (source length {})",
            span.byte_start,
            span.byte_end,
            self.source.len()
        );
        self.copy_to(span.byte_start);

        let original = &self.source[span.byte_start..span.byte_end];
        self.replacements.push(Replacement {
            span,
            original: String::from_utf8_lossy(original).into_owned(),
            replacement: replacement.to_string(),
        });

        self.output.extend_from_slice(replacement.as_bytes());
        self.cursor = span.byte_end;
    }

    /// Insert `text` at `offset` without removing anything
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.replace(Span::at(offset), text);
    }

    /// Replacements applied so far, in source order
    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Copy the remaining source and return the output with its replacements
    pub fn finish(mut self) -> (Vec<u8>, Vec<Replacement>) {
        self.copy_to(self.source.len());
        (self.output, self.replacements)
    }
}
