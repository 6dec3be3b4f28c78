use serde::Serialize;

/// Position in a source file (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in bytes)
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte span in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Starting byte offset
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
}

impl Span {
    pub fn new(byte_start: usize, byte_end: usize) -> Self {
        Self { byte_start, byte_end }
    }

    /// Empty span at `offset`, used for insertions
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.byte_end - self.byte_start
    }

    pub fn is_empty(&self) -> bool {
        self.byte_end == self.byte_start
    }

    /// Shift both ends by `base` bytes
    pub fn offset_by(self, base: usize) -> Self {
        Self::new(self.byte_start + base, self.byte_end + base)
    }
}

/// Convert a byte offset to line and column position
///
/// Works on raw bytes so it can locate errors in files that are not
/// valid UTF-8. Offsets past the end are clamped to the end of the content.
///
/// # Arguments
/// * `content` - The file content
/// * `byte_offset` - The byte offset to convert
///
/// # Returns
/// * `Position` with line and column (both 1-indexed)
pub fn byte_to_position(content: &[u8], byte_offset: usize) -> Position {
    let offset = byte_offset.min(content.len());
    let before = &content[..offset];

    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|nl| nl + 1)
        .unwrap_or(0);

    Position {
        line,
        column: offset - line_start + 1,
    }
}
