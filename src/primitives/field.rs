//! SecureField - one masked field.
//!
//! Bundles the raw buffer, the reveal flag and, while focused, the cursor
//! blink scheduler. The scheduler is created on focus and dropped on blur,
//! so an unfocused field can never tick.

use std::time::Instant;

use super::buffer::InputBuffer;
use super::mask::{MaskedDisplay, MaskingTransform};
use crate::config::{BlinkConfig, FieldSpec};
use crate::error::{Result, SafeKeyboardError};
use crate::state::CursorBlink;
use crate::types::{FieldId, LayoutType};

#[derive(Debug)]
pub struct SecureField {
    spec: FieldSpec,
    buffer: InputBuffer,
    revealed: bool,
    blink: Option<CursorBlink>,
}

impl SecureField {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            buffer: InputBuffer::new(),
            revealed: false,
            blink: None,
        }
    }

    pub fn id(&self) -> FieldId {
        self.spec.id
    }

    /// Layout this field asks for when it gains focus.
    pub fn preferred_layout(&self) -> Option<LayoutType> {
        self.spec.layout
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn value(&self) -> &str {
        self.buffer.text()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_focused(&self) -> bool {
        self.blink.is_some()
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Start the blink scheduler. With `pin_cursor` the cursor jumps to the
    /// end of the value.
    pub fn focus(&mut self, blink: BlinkConfig, now: Instant, pin_cursor: bool) {
        if pin_cursor {
            self.buffer = self.buffer.at_end();
        }
        self.blink = Some(CursorBlink::start(blink, now));
    }

    /// Cancel the blink scheduler.
    pub fn blur(&mut self) {
        self.blink = None;
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Insert `key` at the cursor. Fails without touching the buffer if the
    /// result would hold more than `max_length` characters.
    pub fn insert(&mut self, key: &str, max_length: Option<usize>, now: Instant) -> Result<()> {
        if let Some(max) = max_length {
            if self.buffer.len() + key.chars().count() > max {
                return Err(SafeKeyboardError::MaxLengthExceeded { max });
            }
        }
        self.buffer = self.buffer.insert(key);
        self.note_edit(now);
        Ok(())
    }

    /// Delete before the cursor. Returns false when the cursor was at 0.
    pub fn delete(&mut self, now: Instant) -> bool {
        if self.buffer.cursor() == 0 {
            return false;
        }
        self.buffer = self.buffer.delete();
        self.note_edit(now);
        true
    }

    /// Move the cursor to raw `offset` (clamped).
    pub fn place_cursor(&mut self, offset: usize) {
        self.buffer = self.buffer.with_cursor(offset);
    }

    /// Flip the reveal flag; returns the new value.
    pub fn toggle_reveal(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.revealed
    }

    /// Wipe the value. The reveal flag goes back to hidden.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.revealed = false;
    }

    fn note_edit(&mut self, now: Instant) {
        if let Some(blink) = self.blink.as_mut() {
            blink.note_edit(now);
        }
    }

    // -------------------------------------------------------------------------
    // Display
    // -------------------------------------------------------------------------

    pub fn cursor_visible(&self) -> bool {
        self.blink.as_ref().is_some_and(CursorBlink::is_visible)
    }

    pub fn display(&self, mask: &MaskingTransform) -> MaskedDisplay {
        mask.apply(&self.buffer, self.cursor_visible(), self.revealed)
    }

    /// Advance the blink scheduler. Returns true when the display changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.blink.as_mut().is_some_and(|blink| blink.tick(now))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.blink.as_ref().map(CursorBlink::next_deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn setup() -> (SecureField, Instant) {
        let now = Instant::now();
        let mut field = SecureField::new(FieldSpec::new(0));
        field.focus(BlinkConfig::default(), now, true);
        (field, now)
    }

    #[test]
    fn test_unfocused_field_has_no_cursor() {
        let field = SecureField::new(FieldSpec::new(1));
        assert!(!field.is_focused());
        assert!(!field.cursor_visible());
        assert_eq!(field.next_deadline(), None);
        assert_eq!(field.display(&MaskingTransform::default()).text(), "");
    }

    #[test]
    fn test_type_and_delete() {
        let (mut field, now) = setup();
        field.insert("5", None, now).unwrap();
        field.insert("3", None, now).unwrap();
        assert!(field.delete(now));

        let mask = MaskingTransform::default();
        assert_eq!(field.value(), "5");
        assert_eq!(field.display(&mask).text(), "•|");
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let (mut field, now) = setup();
        assert!(!field.delete(now));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_max_length_rejects_without_mutation() {
        let (mut field, now) = setup();
        for digit in ["1", "2", "3", "4"] {
            field.insert(digit, Some(4), now).unwrap();
        }
        assert_eq!(
            field.insert("5", Some(4), now),
            Err(SafeKeyboardError::MaxLengthExceeded { max: 4 })
        );
        assert_eq!(field.value(), "1234");
        assert_eq!(field.buffer().cursor(), 4);
    }

    #[test]
    fn test_reveal_toggle() {
        let (mut field, now) = setup();
        field.insert("7", None, now).unwrap();
        assert!(field.toggle_reveal());

        let mask = MaskingTransform::default();
        assert_eq!(field.display(&mask).text(), "7|");
        assert!(!field.toggle_reveal());
        assert_eq!(field.display(&mask).text(), "•|");
    }

    #[test]
    fn test_blur_cancels_blink() {
        let (mut field, now) = setup();
        field.blur();
        assert!(!field.is_focused());
        assert!(!field.tick(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_focus_pins_cursor_to_end() {
        let (mut field, now) = setup();
        field.insert("12", None, now).unwrap();
        field.place_cursor(0);
        field.blur();

        field.focus(BlinkConfig::default(), now, true);
        assert_eq!(field.buffer().cursor(), 2);

        field.place_cursor(1);
        field.blur();
        field.focus(BlinkConfig::default(), now, false);
        assert_eq!(field.buffer().cursor(), 1);
    }

    #[test]
    fn test_edit_keeps_cursor_solid() {
        let (mut field, now) = setup();
        // Idle long enough to start blinking.
        field.tick(now + Duration::from_millis(600));
        assert!(!field.cursor_visible());

        field.insert("1", None, now + Duration::from_millis(650)).unwrap();
        assert!(field.cursor_visible());
    }

    #[test]
    fn test_clear_hides_value() {
        let (mut field, now) = setup();
        field.insert("9", None, now).unwrap();
        field.toggle_reveal();
        field.clear();
        assert_eq!(field.value(), "");
        assert!(!field.is_revealed());
    }
}
