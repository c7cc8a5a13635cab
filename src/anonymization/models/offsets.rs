//! Codepoint offset bookkeeping
//!
//! Spans are exchanged as codepoint offsets (what the remote analyzer and most
//! clients use), while Rust slices by byte. [`CharIndex`] converts between the two.

/// Byte position of every codepoint boundary in a string
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    boundaries: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    /// Index `text`
    pub fn new(text: &'a str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, boundaries }
    }

    /// Length of the text in codepoints
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Codepoint offset of a byte offset, if it falls on a boundary
    pub fn char_offset(&self, byte: usize) -> Option<usize> {
        self.boundaries.binary_search(&byte).ok()
    }

    /// Byte offset of a codepoint offset
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.boundaries.get(char_offset).copied()
    }

    /// Substring between two codepoint offsets
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let from = self.byte_offset(start)?;
        let to = self.byte_offset(end)?;
        self.text.get(from..to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_offsets_match_bytes() {
        let index = CharIndex::new("John Doe");
        assert_eq!(index.char_len(), 8);
        assert_eq!(index.char_offset(5), Some(5));
        assert_eq!(index.slice(5, 8), Some("Doe"));
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "Grüße an José";
        let index = CharIndex::new(text);
        assert_eq!(index.char_len(), 13);

        let byte = text.find("José").unwrap();
        let start = index.char_offset(byte).unwrap();
        assert_eq!(start, 9);
        assert_eq!(index.slice(start, start + 4), Some("José"));
    }

    #[test]
    fn test_out_of_range() {
        let index = CharIndex::new("abc");
        assert_eq!(index.slice(1, 4), None);
        assert_eq!(index.slice(2, 1), None);
        assert_eq!(index.byte_offset(3), Some(3));
        assert_eq!(index.char_offset(7), None);
    }

    #[test]
    fn test_empty_text() {
        let index = CharIndex::new("");
        assert_eq!(index.char_len(), 0);
        assert_eq!(index.slice(0, 0), Some(""));
    }
}
