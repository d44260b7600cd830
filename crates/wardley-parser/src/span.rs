//! Byte ranges into the original map source.

use std::{fmt, ops::Range};

/// A half-open byte range `start..end` into the original source text.
///
/// Spans always refer to the text as the user wrote it, before comment
/// stripping, so they can be handed directly to a report renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self::new(self.start.min(other.start)..self.end.max(other.end))
    }

    /// A sub-span addressed relative to this span's start.
    ///
    /// The result never extends past this span.
    pub fn sub(&self, range: Range<usize>) -> Span {
        let start = (self.start + range.start).min(self.end);
        let end = (self.start + range.end).min(self.end);
        Self::new(start..end)
    }

    /// The same span moved `offset` bytes to the right.
    pub fn shifted(&self, offset: usize) -> Span {
        Self::new(self.start + offset..self.end + offset)
    }

    /// The span as a plain range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union() {
        let a = Span::new(4..10);
        let b = Span::new(8..20);
        assert_eq!(a.union(b), Span::new(4..20));
        assert_eq!(b.union(a), Span::new(4..20));
    }

    #[test]
    fn test_sub_is_relative_and_bounded() {
        let line = Span::new(100..120);
        assert_eq!(line.sub(2..5), Span::new(102..105));
        assert_eq!(line.sub(15..40), Span::new(115..120));
        assert_eq!(line.sub(30..40), Span::new(120..120));
    }

    #[test]
    fn test_shifted() {
        assert_eq!(Span::new(2..5).shifted(10), Span::new(12..15));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let (start, end) = (7, 3);
        let span = Span::new(start..end);
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }
}
