//! Span module - Source location tracking.
//!
//! Offsets are measured in code units of whatever encoding the producer
//! works in (bytes for UTF-8 input). Lines are counted from the line number
//! the producer was configured with, usually 1.
//!
//! # Examples
//!
//! ```
//! use lexm_util::span::Span;
//!
//! let span = Span::new(10, 20, 1, 5);
//! assert_eq!(span.len(), 10);
//! ```

mod lines;

pub use lines::LineTable;

use serde::Serialize;
use std::fmt;

/// Source location span
///
/// A `Span` covers the half-open range `start..end` of source offsets and
/// remembers the line and column (1-based) where it begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start offset in source
    pub start: usize,
    /// End offset in source (exclusive)
    pub end: usize,
    /// Line number of `start`
    pub line: u32,
    /// Column number of `start` (1-based)
    pub column: u32,
}

impl Span {
    /// Dummy span for testing
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
    };

    /// Create a new span
    ///
    /// # Examples
    ///
    /// ```
    /// use lexm_util::span::Span;
    ///
    /// let span = Span::new(10, 20, 1, 5);
    /// assert_eq!(span.start, 10);
    /// assert_eq!(span.end, 20);
    /// ```
    #[inline]
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Returns true if this span is empty (start == end)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the length of the span in code units
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if this span contains an offset
    ///
    /// # Examples
    ///
    /// ```
    /// use lexm_util::span::Span;
    ///
    /// let span = Span::new(10, 20, 1, 5);
    /// assert!(span.contains(15));
    /// assert!(!span.contains(20));
    /// ```
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Build a span from a 0-based offset within the line, as tokenizers
    /// track it.
    ///
    /// ```
    /// use lexm_util::span::Span;
    ///
    /// let span = Span::at_line_offset(12, 15, 2, 4);
    /// assert_eq!(span.column, 5);
    /// ```
    #[inline]
    pub fn at_line_offset(start: usize, end: usize, line: u32, line_offset: usize) -> Self {
        let column = u32::try_from(line_offset).map_or(u32::MAX, |c| c.saturating_add(1));
        Self::new(start, end, line, column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
