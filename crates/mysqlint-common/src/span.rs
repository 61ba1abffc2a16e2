//! Source spans and line/column mapping.

use serde::Serialize;

/// A half-open byte range `[start, end)` into a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

/// A zero-based line/column source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// The zero-based line interval `[start_line, end_line]` a span touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start_line: u32,
    pub end_line: u32,
}

/// Precomputed byte offsets of line starts, for offset -> line/column queries.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// Zero-based line containing the byte offset.
    #[must_use]
    pub fn line_of(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(insert) => insert as u32 - 1,
        }
    }

    /// Zero-based line/column of the byte offset.
    #[must_use]
    pub fn position(&self, offset: u32) -> Position {
        let line = self.line_of(offset);
        let column = offset - self.line_starts[line as usize];
        Position { line, column }
    }

    /// Line interval covered by a span. Used to correlate diagnostics that
    /// must sit on the same source line.
    #[must_use]
    pub fn line_range(&self, span: Span) -> LineRange {
        LineRange {
            start_line: self.line_of(span.start),
            end_line: self.line_of(span.end.saturating_sub(1).max(span.start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_map_positions() {
        let map = LineMap::new("ab\ncd\n\nefg");
        assert_eq!(map.position(0), Position { line: 0, column: 0 });
        assert_eq!(map.position(1), Position { line: 0, column: 1 });
        assert_eq!(map.position(3), Position { line: 1, column: 0 });
        assert_eq!(map.position(6), Position { line: 2, column: 0 });
        assert_eq!(map.position(9), Position { line: 3, column: 2 });
    }

    #[test]
    fn line_range_single_line() {
        let map = LineMap::new("ab\ncdef\ng");
        let range = map.line_range(Span::new(3, 7));
        assert_eq!(range, LineRange { start_line: 1, end_line: 1 });
    }

    #[test]
    fn line_range_multi_line() {
        let map = LineMap::new("ab\ncdef\ng");
        let range = map.line_range(Span::new(0, 9));
        assert_eq!(range, LineRange { start_line: 0, end_line: 2 });
    }

    #[test]
    fn span_merge() {
        let merged = Span::new(4, 8).merge(Span::new(2, 6));
        assert_eq!(merged, Span::new(2, 8));
    }
}
