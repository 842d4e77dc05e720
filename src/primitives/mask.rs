//! MaskingTransform - raw buffer to on-screen text.
//!
//! Each raw character becomes the mask glyph (or itself when revealed), and
//! the synthetic cursor glyph is spliced in at the cursor offset while it is
//! in its visible blink phase. Because the glyph shifts everything after it by
//! one cell, the transform also returns an [`OffsetMapping`] between raw and
//! display coordinates.
//!
//! Pure function of its inputs; recompute on every redraw.

use super::buffer::InputBuffer;
use crate::config::Glyphs;

// =============================================================================
// OFFSET MAPPING
// =============================================================================

/// Translates offsets between the raw buffer and the display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetMapping {
    /// Raw cursor offset when the glyph is drawn.
    cursor: Option<usize>,
    len: usize,
    /// Map every display offset past the glyph onto the end of the text.
    collapse_trailing: bool,
}

impl OffsetMapping {
    pub fn raw_to_display(&self, raw: usize) -> usize {
        match self.cursor {
            Some(cursor) if cursor < raw => raw + 1,
            _ => raw,
        }
    }

    pub fn display_to_raw(&self, display: usize) -> usize {
        let Some(cursor) = self.cursor else {
            return display.min(self.len);
        };
        if display <= cursor {
            display
        } else if display == cursor + 1 {
            cursor
        } else if self.collapse_trailing {
            self.len
        } else {
            (display - 1).min(self.len)
        }
    }
}

// =============================================================================
// MASKED DISPLAY
// =============================================================================

/// Display string plus the mapping back to the raw buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedDisplay {
    text: String,
    mapping: OffsetMapping,
}

impl MaskedDisplay {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mapping(&self) -> &OffsetMapping {
        &self.mapping
    }

    /// Display offset of the cursor glyph, if drawn.
    pub fn cursor_position(&self) -> Option<usize> {
        self.mapping.cursor
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// =============================================================================
// TRANSFORM
// =============================================================================

/// Masking settings shared by every field of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskingTransform {
    pub glyphs: Glyphs,
    /// True while the cursor is pinned to the end of the value; display
    /// offsets past the glyph then all resolve to the end.
    pub collapse_trailing: bool,
}

impl Default for MaskingTransform {
    fn default() -> Self {
        Self {
            glyphs: Glyphs::default(),
            collapse_trailing: true,
        }
    }
}

impl MaskingTransform {
    pub fn new(glyphs: Glyphs, collapse_trailing: bool) -> Self {
        Self {
            glyphs,
            collapse_trailing,
        }
    }

    pub fn apply(
        &self,
        buffer: &InputBuffer,
        cursor_visible: bool,
        password_visible: bool,
    ) -> MaskedDisplay {
        let cursor = buffer.cursor();
        let mut text = String::with_capacity(buffer.text().len() + self.glyphs.cursor.len_utf8());

        for (index, ch) in buffer.text().chars().enumerate() {
            if cursor_visible && index == cursor {
                text.push(self.glyphs.cursor);
            }
            text.push(if password_visible { ch } else { self.glyphs.mask });
        }
        if cursor_visible && cursor == buffer.len() {
            text.push(self.glyphs.cursor);
        }

        MaskedDisplay {
            text,
            mapping: OffsetMapping {
                cursor: cursor_visible.then_some(cursor),
                len: buffer.len(),
                collapse_trailing: self.collapse_trailing,
            },
        }
    }
}

/// Mask `buffer` with the default glyphs and a pinned cursor.
pub fn transform(
    buffer: &InputBuffer,
    cursor_visible: bool,
    password_visible: bool,
) -> MaskedDisplay {
    MaskingTransform::default().apply(buffer, cursor_visible, password_visible)
}
