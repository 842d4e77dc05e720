//! InputBuffer - raw value and cursor of one secure field.
//!
//! Offsets count characters, not bytes, so multi-byte letters like `ñ` move
//! the cursor by one. Every operation returns a new buffer; the field keeps
//! only the latest one.

use std::fmt;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    /// Empty buffer with the cursor at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor clamped into `[0, len]`.
    pub fn from_parts(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            cursor: cursor.min(len),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert `key` at the cursor and move the cursor past it.
    pub fn insert(&self, key: &str) -> Self {
        let at = self.byte_offset(self.cursor);
        let mut text = String::with_capacity(self.text.len() + key.len());
        text.push_str(&self.text[..at]);
        text.push_str(key);
        text.push_str(&self.text[at..]);
        Self::from_parts(text, self.cursor + key.chars().count())
    }

    /// Remove the character before the cursor. No-op at offset 0.
    pub fn delete(&self) -> Self {
        if self.cursor == 0 {
            return self.clone();
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        let mut text = self.text.clone();
        text.replace_range(start..end, "");
        Self::from_parts(text, self.cursor - 1)
    }

    /// Same text, cursor moved to `offset` (clamped).
    pub fn with_cursor(&self, offset: usize) -> Self {
        Self::from_parts(self.text.clone(), offset)
    }

    /// Same text, cursor at the end.
    pub fn at_end(&self) -> Self {
        self.with_cursor(usize::MAX)
    }

    /// Wipe the value in place.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

// The raw value is a secret; never let it reach logs through `{:?}`.
impl fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBuffer")
            .field("len", &self.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
