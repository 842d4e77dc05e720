//! Session configuration.
//!
//! One `SessionConfig` replaces the family of near-identical screens: field
//! count, shuffle policy, keyboard positioning and the behavioral switches
//! are all plain data.
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::{SessionConfig, FieldSpec, LayoutType, ShufflePolicy};
//!
//! let config = SessionConfig {
//!     fields: vec![FieldSpec::new(0).with_layout(LayoutType::Numeric)],
//!     shuffle: ShufflePolicy::NUMERIC_PAD,
//!     max_length: Some(6),
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

use crate::types::{FieldId, KeyboardPositionMode, LayoutType, ShufflePolicy};

// =============================================================================
// GLYPHS
// =============================================================================

/// Default mask glyph drawn in place of each hidden character.
pub const DEFAULT_MASK_GLYPH: char = '•';
/// Default synthetic cursor glyph.
pub const DEFAULT_CURSOR_GLYPH: char = '|';

/// Characters used when building the masked display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub mask: char,
    pub cursor: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            mask: DEFAULT_MASK_GLYPH,
            cursor: DEFAULT_CURSOR_GLYPH,
        }
    }
}

// =============================================================================
// BLINK
// =============================================================================

/// Timing for the synthetic cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkConfig {
    /// Time without edits before the cursor starts blinking (default: 500ms)
    pub idle_threshold: Duration,
    /// Time between blink ticks (default: 500ms)
    pub interval: Duration,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            idle_threshold: Duration::from_millis(500),
            interval: Duration::from_millis(500),
        }
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Declaration of one secure field owned by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    /// Layout to present when this field gains focus. `None` keeps whatever
    /// layout type the keyboard currently has.
    pub layout: Option<LayoutType>,
}

impl FieldSpec {
    pub fn new(id: u32) -> Self {
        Self {
            id: FieldId(id),
            layout: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutType) -> Self {
        self.layout = Some(layout);
        self
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Everything a screen session needs to know up front.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fields on the screen, in focus-cycling order.
    pub fields: Vec<FieldSpec>,
    /// Layout type before any field asks for one (default: Numeric)
    pub initial_layout: LayoutType,
    /// Which key groups get shuffled per presentation.
    pub shuffle: ShufflePolicy,
    /// How the screen keeps the focused content above the keyboard.
    pub position_mode: KeyboardPositionMode,
    /// Delay before scrolling the focused field into view (default: 300ms)
    pub follow_delay: Duration,
    pub blink: BlinkConfig,
    pub glyphs: Glyphs,
    /// Keep shift engaged when switching Numeric/Alphanumeric (default: false)
    pub persist_shift_on_layout_toggle: bool,
    /// Keep shift engaged across a dismiss/reopen cycle (default: false)
    pub persist_shift_on_dismiss: bool,
    /// Maximum characters per field (default: None = unlimited)
    pub max_length: Option<usize>,
    /// Let the host move the cursor inside the text. When false the cursor is
    /// pinned to the end of the value.
    pub allow_cursor_placement: bool,
    /// Panic on tokens the presented layout doesn't know instead of returning
    /// an error (default: on in debug builds)
    pub strict_tokens: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fields: vec![FieldSpec::new(0)],
            initial_layout: LayoutType::Numeric,
            shuffle: ShufflePolicy::default(),
            position_mode: KeyboardPositionMode::default(),
            follow_delay: Duration::from_millis(300),
            blink: BlinkConfig::default(),
            glyphs: Glyphs::default(),
            persist_shift_on_layout_toggle: false,
            persist_shift_on_dismiss: false,
            max_length: None,
            allow_cursor_placement: false,
            strict_tokens: cfg!(debug_assertions),
        }
    }
}

impl SessionConfig {
    /// Config for a screen with `count` fields, ids `0..count`.
    pub fn with_field_count(count: u32) -> Self {
        Self {
            fields: (0..count).map(FieldSpec::new).collect(),
            ..Default::default()
        }
    }

    pub fn with_shuffle(mut self, shuffle: ShufflePolicy) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_position_mode(mut self, mode: KeyboardPositionMode) -> Self {
        self.position_mode = mode;
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_behavior() {
        let config = SessionConfig::default();
        assert_eq!(config.fields, vec![FieldSpec::new(0)]);
        assert_eq!(config.initial_layout, LayoutType::Numeric);
        assert_eq!(config.follow_delay, Duration::from_millis(300));
        assert_eq!(config.blink.idle_threshold, Duration::from_millis(500));
        assert_eq!(config.blink.interval, Duration::from_millis(500));
        assert_eq!(config.glyphs.mask, '•');
        assert_eq!(config.glyphs.cursor, '|');
        assert!(!config.persist_shift_on_layout_toggle);
        assert!(!config.persist_shift_on_dismiss);
        assert!(config.max_length.is_none());
        assert!(!config.allow_cursor_placement);
    }

    #[test]
    fn test_field_count_builder() {
        let config = SessionConfig::with_field_count(3)
            .with_shuffle(ShufflePolicy::NUMERIC_PAD)
            .with_max_length(8);

        let ids: Vec<FieldId> = config.fields.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FieldId(0), FieldId(1), FieldId(2)]);
        assert_eq!(config.shuffle, ShufflePolicy::NUMERIC_PAD);
        assert_eq!(config.max_length, Some(8));
    }

    #[test]
    fn test_field_spec_layout() {
        let spec = FieldSpec::new(2).with_layout(LayoutType::Alphanumeric);
        assert_eq!(spec.id, FieldId(2));
        assert_eq!(spec.layout, Some(LayoutType::Alphanumeric));
    }
}
