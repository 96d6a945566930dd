/// Maps byte offsets in a source buffer to 1-based line numbers.
///
/// The index records the offset at which every line begins. Line 1 starts at
/// offset 0, and every `\n` starts a new line right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Returns the line containing `offset`. Offsets past the end of the
    /// buffer resolve to the last line.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> usize {
        // Number of line starts <= offset; never zero since line 1 starts at 0.
        self.line_starts.partition_point(|&start| start <= offset)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A line lookup anchored at some offset of the indexed buffer.
///
/// Handed to context resolvers, which only see the text following a comment:
/// offsets they pass in are relative to that text.
#[derive(Debug, Clone, Copy)]
pub struct LineLookup<'a> {
    index: &'a LineIndex,
    anchor: usize,
}

impl<'a> LineLookup<'a> {
    pub fn new(index: &'a LineIndex, anchor: usize) -> Self {
        Self { index, anchor }
    }

    #[must_use]
    pub fn line_at(&self, offset: usize) -> usize {
        self.index.line_at(self.anchor.saturating_add(offset))
    }
}
