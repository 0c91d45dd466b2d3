//! Source location tracking for tokens, parse tree nodes, and diagnostics.

use std::fmt;

/// A span of source code.
///
/// Tracks the starting byte offset plus the 1-indexed line:column where the
/// span begins, so diagnostics can be rendered without re-scanning the source
/// and editor layers can map spans straight to byte ranges.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte covered by this span.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(start: u32, len: u32, line: u32, col: u32) -> Self {
        Self {
            start,
            len,
            line,
            col,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(start: u32, line: u32, col: u32) -> Self {
        Self {
            start,
            len: 0,
            line,
            col,
        }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Byte offset one past the last byte covered by this span.
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Whether `other` lies entirely within this span.
    #[inline]
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    /// Merge two spans into the smallest span covering both.
    ///
    /// Works across lines because the merge is computed on byte offsets; the
    /// resulting line:column is taken from whichever span starts first.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span {
            start,
            len: end - start,
            line: first.line,
            col: first.col,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(4, 10, 1, 5);
        assert_eq!(span.len(), 10);
        assert_eq!(span.end(), 14);
        assert!(!span.is_empty());

        let empty = Span::point(4, 1, 5);
        assert!(empty.is_empty());
    }

    #[test]
    fn span_display() {
        let span = Span::new(30, 5, 3, 15);
        assert_eq!(format!("{}", span), "3:15");
    }

    #[test]
    fn span_merge_same_line() {
        let span1 = Span::new(4, 3, 1, 5); // "foo" at 1:5
        let span2 = Span::new(9, 3, 1, 10); // "bar" at 1:10
        let merged = span1.merge(span2);

        assert_eq!(merged.start, 4);
        assert_eq!(merged.len, 8); // 4 to 12
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 5);
    }

    #[test]
    fn span_merge_overlapping() {
        let span1 = Span::new(4, 5, 1, 5); // bytes 4-9
        let span2 = Span::new(7, 4, 1, 8); // bytes 7-11
        let merged = span1.merge(span2);

        assert_eq!(merged.start, 4);
        assert_eq!(merged.len, 7); // 4 to 11
    }

    #[test]
    fn span_merge_reverse_order() {
        let span1 = Span::new(9, 3, 1, 10);
        let span2 = Span::new(4, 3, 1, 5);
        let merged = span1.merge(span2);

        assert_eq!(merged.start, 4);
        assert_eq!(merged.len, 8);
        assert_eq!(merged.col, 5); // Uses earliest span's position
    }

    #[test]
    fn span_merge_across_lines() {
        let span1 = Span::new(0, 5, 1, 1);
        let span2 = Span::new(20, 4, 3, 2);
        let merged = span1.merge(span2);

        assert_eq!(merged.start, 0);
        assert_eq!(merged.end(), 24);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 1);
    }

    #[test]
    fn span_merge_with_point() {
        let span = Span::new(4, 10, 1, 5);
        let point = Span::point(7, 1, 8);
        let merged = span.merge(point);

        assert_eq!(merged.start, 4);
        assert_eq!(merged.len, 10); // Point doesn't extend the span
    }

    #[test]
    fn span_contains() {
        let outer = Span::new(0, 20, 1, 1);
        let inner = Span::new(5, 5, 1, 6);
        assert!(outer.contains(inner));
        assert!(!inner.contains(outer));
        assert!(outer.contains(outer));
    }
}
