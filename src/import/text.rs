//! Flattened-Text Accumulator
//!
//! Append-only buffer of a document's character content. Offsets count
//! chars, not bytes, so they stay meaningful for any script. A checkpoint is
//! kept per appended chunk so char offsets can be mapped back to byte
//! positions without rescanning the whole buffer.

/// Append-only text buffer addressed by char offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedText {
    buf: String,
    chars: usize,
    /// (char offset, byte offset) where each appended chunk begins
    chunks: Vec<(usize, usize)>,
}

impl FlattenedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk unless it is empty or consists only of whitespace.
    ///
    /// Returns whether the chunk was kept.
    pub fn push(&mut self, chunk: &str) -> bool {
        if is_blank(chunk) {
            return false;
        }
        self.chunks.push((self.chars, self.buf.len()));
        self.buf.push_str(chunk);
        self.chars += chunk.chars().count();
        true
    }

    /// Length of the buffer in chars
    #[inline]
    pub fn current_offset(&self) -> usize {
        self.chars
    }

    #[inline]
    pub fn final_text(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Text between two char offsets
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end > self.chars {
            return None;
        }
        let from = self.byte_offset(start);
        let to = self.byte_offset(end);
        Some(&self.buf[from..to])
    }

    fn byte_offset(&self, offset: usize) -> usize {
        if offset == self.chars {
            return self.buf.len();
        }
        // Last chunk starting at or before `offset`
        let idx = self.chunks.partition_point(|&(c, _)| c <= offset) - 1;
        let (chunk_chars, chunk_bytes) = self.chunks[idx];
        self.buf[chunk_bytes..]
            .char_indices()
            .nth(offset - chunk_chars)
            .map_or(self.buf.len(), |(i, _)| chunk_bytes + i)
    }
}

/// Empty, or whitespace all the way through
#[inline]
pub fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(char::is_whitespace)
}
