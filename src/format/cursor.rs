use crate::format::{FormatError, LONG_WORD_SIZE};

/// Forward-only reader over a Hunk byte stream.
///
/// Every read is bounds-checked and moves the position by whole long words, so
/// the position stays long-word aligned for the lifetime of the cursor.
#[derive(Debug)]
pub struct LongWordCursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> LongWordCursor<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.pos)
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Reads one big-endian long word.
    ///
    /// # Errors
    /// Returns `FormatError::OutOfBounds` when fewer than 4 bytes remain.
    pub fn read_long_word(&mut self) -> Result<u32, FormatError> {
        self.read_long_word_bytes().map(u32::from_be_bytes)
    }

    /// Reads one long word as its raw bytes.
    ///
    /// # Errors
    /// Returns `FormatError::OutOfBounds` when fewer than 4 bytes remain.
    pub fn read_long_word_bytes(&mut self) -> Result<[u8; 4], FormatError> {
        let bytes = self.take(LONG_WORD_SIZE)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Skips `len` bytes without interpreting them.
    ///
    /// # Errors
    /// Returns `FormatError::Misaligned` when `len` is not a whole number of
    /// long words and `FormatError::OutOfBounds` when it runs past the input.
    pub fn advance(&mut self, len: usize) -> Result<(), FormatError> {
        if len % LONG_WORD_SIZE != 0 {
            return Err(FormatError::Misaligned {
                offset: self.pos,
                len,
            });
        }
        self.take(len).map(|_| ())
    }

    /// Skips `count` long words.
    ///
    /// # Errors
    /// Returns `FormatError::OutOfBounds` when the skip runs past the input.
    pub fn skip_long_words(&mut self, count: u32) -> Result<(), FormatError> {
        let len = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(LONG_WORD_SIZE))
            .ok_or(FormatError::OutOfBounds {
                offset: self.pos,
                needed: usize::MAX,
                available: self.remaining(),
            })?;
        self.advance(len)
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8], FormatError> {
        if size > self.remaining() {
            return Err(FormatError::OutOfBounds {
                offset: self.pos,
                needed: size,
                available: self.remaining(),
            });
        }
        let begin = self.pos;
        self.pos += size;
        Ok(&self.input[begin..self.pos])
    }
}
