//! Offset translation between snippet and host coordinates
//!
//! A query is never a whole document: it is a substring of a string literal,
//! an annotation argument or a property value. Lexers and parsers work in
//! the snippet's own coordinate space (byte offsets from the first character
//! of the query, 1-based lines, 0-based columns). Everything handed to the
//! editor is in the host document's space.
//!
//! # Translation rules
//!
//! - A token-anchored position translates by adding the snippet's host start
//!   offset: `host = host_start + local`.
//! - A `(line, column)` position, as reported by lexers when no token could
//!   be formed, first resolves against a [`LineIndex`] of the snippet text
//!   and is then shifted like a token offset.
//! - Nested snippets compose: a SpEL span at local offset `K` inside a query
//!   starting at `H` is analysed with start offset `H + K`, so its own local
//!   offsets translate in one step.
//!
//! ```rust,ignore
//! let index = LineIndex::new("SELECT o\nFROM Owner o");
//! assert_eq!(index.offset(2, 5), Some(14));
//! assert_eq!(to_host(100, 14), 114);
//! ```

/// Shifts a snippet-local offset into host coordinates.
#[inline]
pub fn to_host(host_start: usize, local: usize) -> usize {
    host_start + local
}

/// Byte offsets at which each line of a text begins.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts, len: text.len() }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offset of `column` on the 1-based `line`, clamped to the end of that
    /// line. `None` for a line outside the text.
    pub fn offset(&self, line: u32, column: u32) -> Option<usize> {
        let row = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(row)?;
        Some((start + column as usize).min(self.line_end(row)))
    }

    /// Exclusive end of the 0-based `row`, excluding its line break.
    fn line_end(&self, row: usize) -> usize {
        match self.line_starts.get(row + 1) {
            Some(next) => next - 1,
            None => self.len,
        }
    }

    /// End of the line containing `offset`.
    pub fn end_of_line(&self, offset: usize) -> usize {
        let row = self.line_starts.partition_point(|&start| start <= offset).saturating_sub(1);
        self.line_end(row).max(offset)
    }

    /// 0-based `(row, column)` of `offset`.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let row = self.line_starts.partition_point(|&start| start <= offset).saturating_sub(1);
        (row, offset - self.line_starts[row])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_offsets_by_line_and_column() {
        let index = LineIndex::new("SELECT o\nFROM Owner o\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.offset(1, 0), Some(0));
        assert_eq!(index.offset(2, 5), Some(14));
        assert_eq!(index.offset(2, 99), Some(21), "Column clamps to end of line");
        assert_eq!(index.offset(4, 0), None);
        assert_eq!(index.offset(0, 0), None);
    }

    #[test]
    fn test_end_of_line() {
        let index = LineIndex::new("ab\ncde");
        assert_eq!(index.end_of_line(0), 2);
        assert_eq!(index.end_of_line(3), 6);
        assert_eq!(index.position(4), (1, 1));
    }

    quickcheck! {
        fn prop_translation_composes(outer: u16, inner: u16, local: u16) -> bool {
            let (outer, inner, local) = (outer as usize, inner as usize, local as usize);
            to_host(to_host(outer, inner), local) == to_host(outer, inner + local)
        }

        fn prop_position_round_trips(text: String, pick: usize) -> bool {
            let index = LineIndex::new(&text);
            let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
            if boundaries.is_empty() {
                return true;
            }
            let offset = boundaries[pick % boundaries.len()];
            let (row, column) = index.position(offset);
            index.offset(row as u32 + 1, column as u32) == Some(offset)
        }
    }
}
