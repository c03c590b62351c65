// String index for scanned documents
//
// Produced by the scan driver, consumed by later stages.
// Positions use u32 (4 GB cap, halves memory vs usize on 64-bit).

use std::ops::Range;

/// One quoted string: both delimiter positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSpan {
    /// Byte position of the opening quote.
    pub start: u32,
    /// Byte position of the closing quote.
    pub end: u32,
}

impl StringSpan {
    /// Range of the string's content, delimiters excluded. Empty for `""`.
    #[inline]
    pub fn content(&self) -> Range<usize> {
        self.start as usize + 1..self.end as usize
    }

    /// Range covering the string including both delimiter quotes.
    #[inline]
    pub fn with_quotes(&self) -> Range<usize> {
        self.start as usize..self.end as usize + 1
    }
}

/// String index: spans of every quoted string, in position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringIndex {
    /// All strings found. Sorted by position; spans never overlap.
    pub spans: Vec<StringSpan>,
    /// Total input length.
    pub input_len: u32,
}

impl StringIndex {
    #[inline]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// True when `pos` lies inside a string, delimiter quotes included.
    ///
    /// Binary search over the sorted spans.
    #[inline]
    pub fn contains(&self, pos: u32) -> bool {
        // First span whose closing quote is at or past pos
        let i = self.spans.partition_point(|s| s.end < pos);
        self.spans.get(i).is_some_and(|s| s.start <= pos)
    }

    /// Iterate string contents as subslices of `input` (the same bytes the
    /// scan ran over), delimiters excluded.
    #[inline]
    pub fn contents<'a>(&'a self, input: &'a [u8]) -> ContentIter<'a> {
        debug_assert_eq!(
            input.len(),
            self.input_len as usize,
            "index belongs to a different input"
        );
        ContentIter {
            index: self,
            input,
            span_idx: 0,
        }
    }
}

/// Iterator over string contents in a `StringIndex`.
pub struct ContentIter<'a> {
    index: &'a StringIndex,
    input: &'a [u8],
    span_idx: usize,
}

impl<'a> Iterator for ContentIter<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let span = self.index.spans.get(self.span_idx)?;
        self.span_idx += 1;
        Some(&self.input[span.content()])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.index.spans.len().saturating_sub(self.span_idx);
        (remaining, Some(remaining))
    }
}
