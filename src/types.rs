//! Core types for safe-keyboard.
//!
//! These types define the vocabulary shared by every layer: field identity,
//! which keyboard is presented, how the screen positions it, and the flags
//! controlling which key groups get shuffled.

use std::fmt;

// =============================================================================
// Field identity
// =============================================================================

/// Identifier of one logical secure field on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

// =============================================================================
// Layout type
// =============================================================================

/// Which character set the keyboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutType {
    /// Digits plus decimal separators.
    #[default]
    Numeric,
    /// Digit row plus the full alphabet and control keys.
    Alphanumeric,
}

impl LayoutType {
    /// The other layout type.
    pub fn toggled(self) -> Self {
        match self {
            Self::Numeric => Self::Alphanumeric,
            Self::Alphanumeric => Self::Numeric,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.write_str("numeric"),
            Self::Alphanumeric => f.write_str("alphanumeric"),
        }
    }
}

// =============================================================================
// Keyboard positioning
// =============================================================================

/// How the screen keeps content visible above the on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardPositionMode {
    /// Scroll the focused field into view shortly after the keyboard opens.
    #[default]
    FollowFocusedField,
    /// Scroll to the end of the content as soon as the keyboard opens.
    FixedToBottomOfContent,
}

/// What the host should scroll into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Field(FieldId),
    ContentEnd,
}

// =============================================================================
// Shuffle policy (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Key groups that get randomly permuted on each presentation.
    ///
    /// Control keys (shift, backspace, enter, space) are never shuffled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShufflePolicy: u8 {
        /// The ten digits.
        const DIGITS = 1 << 0;
        /// The `,` and `.` keys of the numeric pad.
        const SEPARATORS = 1 << 1;
        /// The 27 letters of the alphabetic layout.
        const LETTERS = 1 << 2;

        /// Full numeric pad: digits and separators permuted together.
        const NUMERIC_PAD = Self::DIGITS.bits() | Self::SEPARATORS.bits();
    }
}

impl Default for ShufflePolicy {
    fn default() -> Self {
        Self::DIGITS | Self::LETTERS
    }
}
