//! Focus System - which field owns the custom keyboard
//!
//! Two states:
//! - **Idle** - no field focused, keyboard hidden
//! - **FieldActive** - exactly one field focused, keyboard visible
//!
//! The coordinator also carries the keyboard-wide modifiers that follow the
//! keyboard rather than a field: the layout type and shift.
//!
//! Transitions return a [`FocusTransition`] instead of firing callbacks; the
//! session reacts to it (regenerate layout, start/stop the blink scheduler,
//! toggle the secure window).
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::state::{FocusCoordinator, FocusTransition};
//! use safe_keyboard::{FieldId, LayoutType};
//!
//! let mut focus = FocusCoordinator::new(LayoutType::Numeric);
//! match focus.field_gained_focus(FieldId(0)) {
//!     FocusTransition::Activated { field, previous } => { /* present keyboard */ }
//!     _ => {}
//! }
//! ```

use spark_signals::{signal, Signal};

use crate::types::{FieldId, LayoutType};

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Result of a focus event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTransition {
    /// `field` now owns the keyboard; `previous` lost it in the same step.
    Activated {
        field: FieldId,
        previous: Option<FieldId>,
    },
    /// `field` released the keyboard and the keyboard is hidden.
    Deactivated { field: FieldId },
    /// Nothing changed (re-focus of the active field, stale blur, dismiss
    /// while idle).
    Unchanged,
}

// =============================================================================
// REACTIVE STATE
// =============================================================================

/// Reactive mirrors of the focus state for the rendering surface.
#[derive(Clone)]
pub struct FocusSignals {
    pub active_field: Signal<Option<FieldId>>,
    pub keyboard_visible: Signal<bool>,
    pub layout_type: Signal<LayoutType>,
    pub shift_engaged: Signal<bool>,
}

impl FocusSignals {
    fn new(layout_type: LayoutType) -> Self {
        Self {
            active_field: signal(None),
            keyboard_visible: signal(false),
            layout_type: signal(layout_type),
            shift_engaged: signal(false),
        }
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

pub struct FocusCoordinator {
    active: Option<FieldId>,
    keyboard_visible: bool,
    layout_type: LayoutType,
    shift_engaged: bool,
    persist_shift_on_layout_toggle: bool,
    persist_shift_on_dismiss: bool,
    signals: FocusSignals,
}

impl FocusCoordinator {
    /// Idle coordinator presenting `layout_type` on first focus.
    pub fn new(layout_type: LayoutType) -> Self {
        Self {
            active: None,
            keyboard_visible: false,
            layout_type,
            shift_engaged: false,
            persist_shift_on_layout_toggle: false,
            persist_shift_on_dismiss: false,
            signals: FocusSignals::new(layout_type),
        }
    }

    /// Choose whether shift survives a layout toggle and a dismiss.
    pub fn with_shift_persistence(mut self, on_layout_toggle: bool, on_dismiss: bool) -> Self {
        self.persist_shift_on_layout_toggle = on_layout_toggle;
        self.persist_shift_on_dismiss = on_dismiss;
        self
    }

    pub fn active(&self) -> Option<FieldId> {
        self.active
    }

    pub fn is_active(&self, field: FieldId) -> bool {
        self.active == Some(field)
    }

    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    pub fn layout_type(&self) -> LayoutType {
        self.layout_type
    }

    pub fn shift_engaged(&self) -> bool {
        self.shift_engaged
    }

    pub fn signals(&self) -> &FocusSignals {
        &self.signals
    }

    // -------------------------------------------------------------------------
    // Focus events
    // -------------------------------------------------------------------------

    /// `field` gained focus. Always leaves the coordinator in FieldActive.
    pub fn field_gained_focus(&mut self, field: FieldId) -> FocusTransition {
        if self.active == Some(field) {
            return FocusTransition::Unchanged;
        }
        let previous = self.active.replace(field);
        self.keyboard_visible = true;
        tracing::debug!(%field, ?previous, "field activated");
        self.publish();
        FocusTransition::Activated { field, previous }
    }

    /// `field` lost focus. Only the active field can deactivate; a late blur
    /// from a field that was already superseded is ignored.
    pub fn field_lost_focus(&mut self, field: FieldId) -> FocusTransition {
        if self.active != Some(field) {
            tracing::trace!(%field, active = ?self.active, "ignoring stale focus loss");
            return FocusTransition::Unchanged;
        }
        self.deactivate()
    }

    /// Tap outside the keyboard or the confirm key: hide unconditionally.
    pub fn dismiss_requested(&mut self) -> FocusTransition {
        if self.active.is_none() {
            return FocusTransition::Unchanged;
        }
        self.deactivate()
    }

    fn deactivate(&mut self) -> FocusTransition {
        let Some(field) = self.active.take() else {
            return FocusTransition::Unchanged;
        };
        self.keyboard_visible = false;
        if !self.persist_shift_on_dismiss {
            self.shift_engaged = false;
        }
        tracing::debug!(%field, "keyboard dismissed");
        self.publish();
        FocusTransition::Deactivated { field }
    }

    // -------------------------------------------------------------------------
    // Keyboard modifiers
    // -------------------------------------------------------------------------

    /// Flip Numeric/Alphanumeric. Valid in any state; never touches focus.
    pub fn toggle_layout_type(&mut self) -> LayoutType {
        self.set_layout_type(self.layout_type.toggled());
        self.layout_type
    }

    /// Switch to `layout_type`. Returns true if it differed.
    pub fn set_layout_type(&mut self, layout_type: LayoutType) -> bool {
        if self.layout_type == layout_type {
            return false;
        }
        self.layout_type = layout_type;
        if !self.persist_shift_on_layout_toggle {
            self.shift_engaged = false;
        }
        tracing::debug!(%layout_type, "layout type changed");
        self.publish();
        true
    }

    /// Toggle shift; returns the new state.
    pub fn toggle_shift(&mut self) -> bool {
        self.shift_engaged = !self.shift_engaged;
        self.publish();
        self.shift_engaged
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Field reached by stepping `direction` (+1/-1) through `order` from
    /// the active field, wrapping at either end. With no active field, +1
    /// picks the first and -1 the last.
    pub fn neighbor(&self, order: &[FieldId], direction: i32) -> Option<FieldId> {
        if order.is_empty() {
            return None;
        }
        let current = self.active.and_then(|a| order.iter().position(|&f| f == a));
        match current {
            None => {
                if direction >= 0 {
                    order.first().copied()
                } else {
                    order.last().copied()
                }
            }
            Some(pos) => {
                let len = order.len() as i32;
                let next = ((pos as i32 + direction) % len + len) % len;
                order.get(next as usize).copied()
            }
        }
    }

    fn publish(&self) {
        debug_assert!(!self.keyboard_visible || self.active.is_some());
        self.signals.active_field.set(self.active);
        self.signals.keyboard_visible.set(self.keyboard_visible);
        self.signals.layout_type.set(self.layout_type);
        self.signals.shift_engaged.set(self.shift_engaged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: FieldId = FieldId(0);
    const B: FieldId = FieldId(1);
    const C: FieldId = FieldId(2);

    fn setup() -> FocusCoordinator {
        FocusCoordinator::new(LayoutType::Numeric)
    }

    #[test]
    fn test_initial_state() {
        let focus = setup();
        assert_eq!(focus.active(), None);
        assert!(!focus.keyboard_visible());
        assert_eq!(focus.layout_type(), LayoutType::Numeric);
        assert!(!focus.shift_engaged());
    }

    #[test]
    fn test_gain_focus_from_idle() {
        let mut focus = setup();
        assert_eq!(
            focus.field_gained_focus(A),
            FocusTransition::Activated { field: A, previous: None }
        );
        assert_eq!(focus.active(), Some(A));
        assert!(focus.keyboard_visible());
        assert!(focus.is_active(A));
    }

    #[test]
    fn test_focus_handoff() {
        let mut focus = setup();
        focus.field_gained_focus(A);
        assert_eq!(
            focus.field_gained_focus(B),
            FocusTransition::Activated { field: B, previous: Some(A) }
        );
        assert_eq!(focus.active(), Some(B));
        assert!(focus.keyboard_visible());
    }

    #[test]
    fn test_refocus_active_field_is_unchanged() {
        let mut focus = setup();
        focus.field_gained_focus(A);
        assert_eq!(focus.field_gained_focus(A), FocusTransition::Unchanged);
    }

    #[test]
    fn test_stale_focus_loss_is_ignored() {
        let mut focus = setup();
        focus.field_gained_focus(A);
        focus.field_gained_focus(B);

        // A's blur arrives after B already took over.
        assert_eq!(focus.field_lost_focus(A), FocusTransition::Unchanged);
        assert_eq!(focus.active(), Some(B));
        assert!(focus.keyboard_visible());
    }

    #[test]
    fn test_focus_loss_of_active_field_hides_keyboard() {
        let mut focus = setup();
        focus.field_gained_focus(A);
        assert_eq!(focus.field_lost_focus(A), FocusTransition::Deactivated { field: A });
        assert_eq!(focus.active(), None);
        assert!(!focus.keyboard_visible());
    }

    #[test]
    fn test_dismiss() {
        let mut focus = setup();
        assert_eq!(focus.dismiss_requested(), FocusTransition::Unchanged);

        focus.field_gained_focus(C);
        assert_eq!(focus.dismiss_requested(), FocusTransition::Deactivated { field: C });
        assert!(!focus.keyboard_visible());
    }

    #[test]
    fn test_toggle_layout_keeps_focus_and_visibility() {
        let mut focus = setup();
        assert_eq!(focus.toggle_layout_type(), LayoutType::Alphanumeric);
        assert!(!focus.keyboard_visible());

        focus.field_gained_focus(A);
        assert_eq!(focus.toggle_layout_type(), LayoutType::Numeric);
        assert_eq!(focus.active(), Some(A));
        assert!(focus.keyboard_visible());
    }

    #[test]
    fn test_shift_resets_by_default() {
        let mut focus = setup();
        focus.field_gained_focus(A);

        assert!(focus.toggle_shift());
        focus.toggle_layout_type();
        assert!(!focus.shift_engaged());

        assert!(focus.toggle_shift());
        focus.dismiss_requested();
        assert!(!focus.shift_engaged());
    }

    #[test]
    fn test_shift_persistence_flags() {
        let mut focus = setup().with_shift_persistence(true, true);
        focus.field_gained_focus(A);
        focus.toggle_shift();

        focus.toggle_layout_type();
        assert!(focus.shift_engaged());

        focus.dismiss_requested();
        focus.field_gained_focus(A);
        assert!(focus.shift_engaged());
    }

    #[test]
    fn test_set_same_layout_keeps_shift() {
        let mut focus = setup();
        focus.toggle_shift();
        assert!(!focus.set_layout_type(LayoutType::Numeric));
        assert!(focus.shift_engaged());
    }

    #[test]
    fn test_neighbor_wraps() {
        let order = [A, B, C];
        let mut focus = setup();
        assert_eq!(focus.neighbor(&order, 1), Some(A));
        assert_eq!(focus.neighbor(&order, -1), Some(C));

        focus.field_gained_focus(C);
        assert_eq!(focus.neighbor(&order, 1), Some(A));
        assert_eq!(focus.neighbor(&order, -1), Some(B));

        assert_eq!(focus.neighbor(&[], 1), None);
    }

    #[test]
    fn test_signals_mirror_state() {
        let mut focus = setup();
        let signals = focus.signals().clone();

        focus.field_gained_focus(B);
        assert_eq!(signals.active_field.get(), Some(B));
        assert!(signals.keyboard_visible.get());

        focus.toggle_layout_type();
        assert_eq!(signals.layout_type.get(), LayoutType::Alphanumeric);

        focus.toggle_shift();
        assert!(signals.shift_engaged.get());

        focus.dismiss_requested();
        assert_eq!(signals.active_field.get(), None);
        assert!(!signals.keyboard_visible.get());
    }
}
