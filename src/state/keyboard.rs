//! Keyboard Module - key tokens and routing
//!
//! The rendering surface reports taps as [`KeyToken`]s. [`resolve`] checks a
//! token against the presented [`KeyLayout`] and turns it into a
//! [`KeyAction`]; the session applies the action to the active field and
//! reports a [`KeyOutcome`].
//!
//! # Routing
//!
//! | Token          | Action                                   |
//! |----------------|------------------------------------------|
//! | `Label(s)`     | insert `s` (single letters honor shift)  |
//! | `Space`        | insert `" "`                             |
//! | `Backspace`    | delete before cursor                     |
//! | `Enter`        | dismiss keyboard                         |
//! | `Shift`        | toggle shift                             |
//! | `SwitchLayout` | toggle Numeric/Alphanumeric              |
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::state::{resolve, KeyAction, KeyToken};
//!
//! let token = KeyToken::parse("backspace")?;
//! assert_eq!(resolve(&token, &layout, false)?, KeyAction::Delete);
//! ```

use std::fmt;

use crate::error::{Result, SafeKeyboardError};
use crate::layout::{is_single_letter, Key, KeyLayout};
use crate::types::LayoutType;

// =============================================================================
// TYPES
// =============================================================================

/// A key event as reported by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// A printable key, by its label.
    Label(String),
    Space,
    Backspace,
    Enter,
    Shift,
    /// The layout-switch key (abc/123).
    SwitchLayout,
}

impl KeyToken {
    /// Parse a surface token. Control names are matched case-insensitively;
    /// anything else non-empty is a label.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(SafeKeyboardError::UnrecognizedKey(String::new()));
        }
        if raw == " " {
            return Ok(Self::Space);
        }
        let token = match raw.to_ascii_lowercase().as_str() {
            "space" => Self::Space,
            "backspace" => Self::Backspace,
            "enter" => Self::Enter,
            "shift" => Self::Shift,
            "layout" => Self::SwitchLayout,
            _ => Self::Label(raw.to_string()),
        };
        Ok(token)
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Space => f.write_str("space"),
            Self::Backspace => f.write_str("backspace"),
            Self::Enter => f.write_str("enter"),
            Self::Shift => f.write_str("shift"),
            Self::SwitchLayout => f.write_str("layout"),
        }
    }
}

/// What a token does to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Insert(String),
    Delete,
    Dismiss,
    ToggleShift,
    SwitchLayout,
}

/// Result of routing one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Inserted,
    Deleted,
    /// Delete with the cursor at the start.
    Unchanged,
    Dismissed,
    ShiftToggled(bool),
    LayoutSwitched(LayoutType),
}

// =============================================================================
// ROUTING
// =============================================================================

/// Resolve `token` against the presented `layout`.
///
/// Labels must name a character key of `layout` (case-insensitive), and
/// space/shift are only accepted when `layout` has those keys. A single
/// letter is inserted upper-cased when `shift` is engaged and lower-cased
/// otherwise; other labels are inserted verbatim.
pub fn resolve(token: &KeyToken, layout: &KeyLayout, shift: bool) -> Result<KeyAction> {
    let action = match token {
        KeyToken::Label(label) => {
            if !layout.contains_label(label) {
                return Err(SafeKeyboardError::UnrecognizedKey(label.clone()));
            }
            let text = if is_single_letter(label) {
                if shift {
                    label.to_uppercase()
                } else {
                    label.to_lowercase()
                }
            } else {
                label.clone()
            };
            KeyAction::Insert(text)
        }
        KeyToken::Space => {
            require_key(layout, &Key::Space, token)?;
            KeyAction::Insert(" ".to_string())
        }
        KeyToken::Backspace => KeyAction::Delete,
        KeyToken::Enter => KeyAction::Dismiss,
        KeyToken::Shift => {
            require_key(layout, &Key::Shift, token)?;
            KeyAction::ToggleShift
        }
        KeyToken::SwitchLayout => KeyAction::SwitchLayout,
    };
    Ok(action)
}

fn require_key(layout: &KeyLayout, key: &Key, token: &KeyToken) -> Result<()> {
    match layout.position_of(key) {
        Some(_) => Ok(()),
        None => Err(SafeKeyboardError::UnrecognizedKey(token.to_string())),
    }
}
