//! Incrementally built table of line start offsets.
//!
//! A streaming producer cannot precompute line starts the way a whole-file
//! source map does, so the table grows as lines are discovered and can be
//! cut back when the producer seeks backwards.

/// Line start offsets discovered so far, in increasing order.
///
/// # Examples
///
/// ```
/// use lexm_util::span::LineTable;
///
/// let mut lines = LineTable::new(1, 0);
/// lines.push(6);
/// lines.push(12);
/// assert_eq!(lines.lookup(3), (1, 0));
/// assert_eq!(lines.lookup(12), (3, 12));
///
/// lines.truncate_after(7);
/// assert_eq!(lines.current(), (2, 6));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineTable {
    first_line: u32,
    starts: Vec<usize>,
}

impl LineTable {
    /// Create a table whose first line is `first_line`, starting at `start`
    pub fn new(first_line: u32, start: usize) -> Self {
        Self {
            first_line,
            starts: vec![start],
        }
    }

    /// Record the start of the next line
    ///
    /// Offsets must be pushed in increasing order.
    pub fn push(&mut self, start: usize) {
        debug_assert!(
            self.starts.last().map_or(true, |&last| last < start),
            "line start {start} pushed out of order"
        );
        self.starts.push(start);
    }

    /// Find the line containing `offset`, returning `(line, line_start)`
    ///
    /// Offsets before the first recorded start map to the first line.
    pub fn lookup(&self, offset: usize) -> (u32, usize) {
        let idx = self.index_of(offset);
        (self.first_line + idx as u32, self.starts[idx])
    }

    /// Forget every line that starts after `offset`
    pub fn truncate_after(&mut self, offset: usize) {
        let keep = self.index_of(offset) + 1;
        self.starts.truncate(keep);
    }

    /// The most recently discovered line and its start
    pub fn current(&self) -> (u32, usize) {
        let idx = self.starts.len() - 1;
        (self.first_line + idx as u32, self.starts[idx])
    }

    /// The line number of the first entry
    pub fn first_line(&self) -> u32 {
        self.first_line
    }

    /// All recorded line starts
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    fn index_of(&self, offset: usize) -> usize {
        // starts is never empty, so at least index 0 is valid
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }
}
