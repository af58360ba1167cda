//! Byte offset to line/column conversion.

/// Line start offsets of a text, for mapping byte offsets to `(line, column)`.
///
/// Columns count characters, not bytes, so multi-byte identifiers in model
/// names still produce the columns a user sees.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    /// 0-indexed line and character column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.text.get(start..offset).map_or(0, |s| s.chars().count());
        (line, column)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
