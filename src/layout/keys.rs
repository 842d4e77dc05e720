//! Key and KeyLayout - what the rendering surface draws.

use crate::state::KeyToken;
use crate::types::LayoutType;

// =============================================================================
// KEY
// =============================================================================

/// One cell of the keyboard grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable key; the label is inserted as-is (or upper-cased under shift).
    Char(String),
    Shift,
    Backspace,
    Enter,
    Space,
    /// Empty cell, drawn as padding and never tappable.
    Blank,
}

impl Key {
    pub fn char(label: impl Into<String>) -> Self {
        Self::Char(label.into())
    }

    /// Control keys hold fixed positions in every layout.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Shift | Self::Backspace | Self::Enter | Self::Space)
    }

    /// Label of a printable key.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Char(label) => Some(label),
            _ => None,
        }
    }

    /// Text to draw on the key, honoring shift for single letters.
    pub fn caption(&self, shift: bool) -> String {
        match self {
            Self::Char(label) if shift && is_single_letter(label) => label.to_uppercase(),
            Self::Char(label) => label.clone(),
            Self::Shift => "⇧".to_string(),
            Self::Backspace => "⌫".to_string(),
            Self::Enter => "⏎".to_string(),
            Self::Space => "␣".to_string(),
            Self::Blank => String::new(),
        }
    }

    /// Token the router receives when this key is tapped.
    ///
    /// Blank cells produce no token.
    pub fn token(&self) -> Option<KeyToken> {
        match self {
            Self::Char(label) => Some(KeyToken::Label(label.clone())),
            Self::Shift => Some(KeyToken::Shift),
            Self::Backspace => Some(KeyToken::Backspace),
            Self::Enter => Some(KeyToken::Enter),
            Self::Space => Some(KeyToken::Space),
            Self::Blank => None,
        }
    }
}

/// True for labels made of exactly one alphabetic character.
pub fn is_single_letter(label: &str) -> bool {
    let mut chars = label.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

// =============================================================================
// KEY LAYOUT
// =============================================================================

/// A concrete arrangement of keys for one presentation of the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    layout_type: LayoutType,
    rows: Vec<Vec<Key>>,
}

impl KeyLayout {
    pub fn new(layout_type: LayoutType, rows: Vec<Vec<Key>>) -> Self {
        Self { layout_type, rows }
    }

    pub fn layout_type(&self) -> LayoutType {
        self.layout_type
    }

    pub fn rows(&self) -> &[Vec<Key>] {
        &self.rows
    }

    /// All keys in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flatten()
    }

    pub fn key_at(&self, row: usize, col: usize) -> Option<&Key> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Row/column of the first cell holding `key`.
    pub fn position_of(&self, key: &Key) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter().position(|k| k == key).map(|c| (r, c))
        })
    }

    /// Labels of the printable keys in row-major order.
    pub fn char_labels(&self) -> Vec<&str> {
        self.keys().filter_map(Key::label).collect()
    }

    /// Whether `label` is a printable key of this layout.
    ///
    /// Letters match regardless of case, since shift only changes what is
    /// inserted, not which key was pressed.
    pub fn contains_label(&self, label: &str) -> bool {
        let wanted = label.to_lowercase();
        self.keys()
            .filter_map(Key::label)
            .any(|l| l == label || l.to_lowercase() == wanted)
    }

    /// Cells holding control keys, in row-major order.
    pub fn control_positions(&self) -> Vec<((usize, usize), Key)> {
        let mut out = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, key) in row.iter().enumerate() {
                if key.is_control() {
                    out.push(((r, c), key.clone()));
                }
            }
        }
        out
    }
}
