//! Session - one screen's worth of secure fields and their keyboard.
//!
//! [`SecureInputSession`] is the single entry point for everything the
//! rendering surface reports: focus changes, key taps, reveal toggles and
//! timer ticks. It owns the fields, the focus coordinator and the presented
//! layout, and calls the [`SurfaceHost`] for platform side effects.
//!
//! # Lifecycle
//!
//! ```text
//! on_focus_gained ──▶ layout generated, blink started, secure window on
//! on_key_event    ──▶ routed to the active field
//! on_tick         ──▶ cursor blink, delayed scroll-into-view
//! on_dismiss      ──▶ blink cancelled, layout dropped, secure window off
//! ```
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::{KeyToken, SecureInputSession, SessionConfig, FieldId};
//! use std::time::Instant;
//!
//! let mut session = SecureInputSession::new(SessionConfig::default())?;
//! session.on_focus_gained(FieldId(0), Instant::now())?;
//! session.on_key_event(KeyToken::label("5"), Instant::now())?;
//! let shown = session.masked_display(FieldId(0))?;
//! ```

mod host;

pub use host::*;

use std::collections::HashSet;
use std::time::Instant;

use crate::config::SessionConfig;
use crate::error::{Result, SafeKeyboardError};
use crate::layout::{Key, KeyLayout, LayoutGenerator};
use crate::primitives::{MaskedDisplay, MaskingTransform, SecureField};
use crate::state::{
    resolve, FocusCoordinator, FocusSignals, FocusTransition, KeyAction, KeyOutcome, KeyToken,
};
use crate::types::{FieldId, KeyboardPositionMode, LayoutType, ScrollTarget};

/// Gap kept between the content and the top of the keyboard.
pub const KEYBOARD_PADDING_GAP: u16 = 8;

// =============================================================================
// SESSION
// =============================================================================

pub struct SecureInputSession<H: SurfaceHost = NoopHost> {
    config: SessionConfig,
    generator: LayoutGenerator,
    mask: MaskingTransform,
    focus: FocusCoordinator,
    fields: Vec<SecureField>,
    order: Vec<FieldId>,
    layout: Option<KeyLayout>,
    pending_scroll: Option<(Instant, ScrollTarget)>,
    keyboard_height: u16,
    host: H,
}

impl SecureInputSession<NoopHost> {
    /// Session without platform hooks.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_host(config, NoopHost)
    }
}

impl<H: SurfaceHost> SecureInputSession<H> {
    /// Session calling `host` for platform side effects.
    ///
    /// Fails if `config` declares no fields or the same id twice.
    pub fn with_host(config: SessionConfig, host: H) -> Result<Self> {
        if config.fields.is_empty() {
            return Err(SafeKeyboardError::EmptySession);
        }
        let mut seen = HashSet::new();
        for spec in &config.fields {
            if !seen.insert(spec.id) {
                return Err(SafeKeyboardError::DuplicateField(spec.id));
            }
        }

        let focus = FocusCoordinator::new(config.initial_layout).with_shift_persistence(
            config.persist_shift_on_layout_toggle,
            config.persist_shift_on_dismiss,
        );
        let fields: Vec<SecureField> =
            config.fields.iter().cloned().map(SecureField::new).collect();
        let order = fields.iter().map(SecureField::id).collect();

        tracing::debug!(
            fields = fields.len(),
            shuffle = ?config.shuffle,
            "secure input session created"
        );

        Ok(Self {
            generator: LayoutGenerator::new(config.shuffle),
            mask: MaskingTransform::new(config.glyphs, !config.allow_cursor_placement),
            focus,
            fields,
            order,
            layout: None,
            pending_scroll: None,
            keyboard_height: 0,
            host,
            config,
        })
    }

    // -------------------------------------------------------------------------
    // Focus events
    // -------------------------------------------------------------------------

    /// `field` gained focus on the rendering surface.
    pub fn on_focus_gained(&mut self, field: FieldId, now: Instant) -> Result<FocusTransition> {
        let index = self.index_of(field)?;
        let transition = self.focus.field_gained_focus(field);
        let FocusTransition::Activated { previous, .. } = transition else {
            return Ok(transition);
        };

        if let Some(previous) = previous {
            if let Ok(prev) = self.index_of(previous) {
                self.fields[prev].blur();
            }
        }
        if let Some(layout_type) = self.fields[index].preferred_layout() {
            self.focus.set_layout_type(layout_type);
        }
        self.fields[index].focus(self.config.blink, now, !self.config.allow_cursor_placement);
        self.regenerate_layout();

        self.host.suppress_native_keyboard(field);
        if previous.is_none() {
            self.host.set_secure_window(true);
        }
        match self.config.position_mode {
            KeyboardPositionMode::FollowFocusedField => {
                let deadline = now + self.config.follow_delay;
                self.pending_scroll = Some((deadline, ScrollTarget::Field(field)));
            }
            KeyboardPositionMode::FixedToBottomOfContent => {
                self.pending_scroll = None;
                self.host.bring_into_view(ScrollTarget::ContentEnd);
            }
        }
        Ok(transition)
    }

    /// `field` lost focus on the rendering surface. Ignored unless it is the
    /// active field.
    pub fn on_focus_lost(&mut self, field: FieldId) -> Result<FocusTransition> {
        self.index_of(field)?;
        let transition = self.focus.field_lost_focus(field);
        if let FocusTransition::Deactivated { field } = transition {
            self.hide(field);
        }
        Ok(transition)
    }

    /// Tap outside the keyboard.
    pub fn on_dismiss(&mut self) -> FocusTransition {
        let transition = self.focus.dismiss_requested();
        if let FocusTransition::Deactivated { field } = transition {
            self.hide(field);
        }
        transition
    }

    /// Move focus to the next field in declaration order, wrapping.
    pub fn focus_next(&mut self, now: Instant) -> Result<FocusTransition> {
        self.focus_step(1, now)
    }

    /// Move focus to the previous field in declaration order, wrapping.
    pub fn focus_previous(&mut self, now: Instant) -> Result<FocusTransition> {
        self.focus_step(-1, now)
    }

    fn focus_step(&mut self, direction: i32, now: Instant) -> Result<FocusTransition> {
        match self.focus.neighbor(&self.order, direction) {
            Some(field) => self.on_focus_gained(field, now),
            None => Ok(FocusTransition::Unchanged),
        }
    }

    fn hide(&mut self, field: FieldId) {
        if let Ok(index) = self.index_of(field) {
            self.fields[index].blur();
        }
        self.layout = None;
        self.pending_scroll = None;
        self.host.set_secure_window(false);
    }

    // -------------------------------------------------------------------------
    // Key events
    // -------------------------------------------------------------------------

    /// Route one key event to the active field.
    ///
    /// # Panics
    ///
    /// With `strict_tokens` set, panics on a label the presented layout does
    /// not contain.
    pub fn on_key_event(&mut self, token: KeyToken, now: Instant) -> Result<KeyOutcome> {
        let active = self.focus.active().ok_or(SafeKeyboardError::NoActiveField)?;
        let resolved = {
            let layout = self.layout.as_ref().ok_or(SafeKeyboardError::NoActiveField)?;
            resolve(&token, layout, self.focus.shift_engaged())
        };
        let action = match resolved {
            Ok(action) => action,
            Err(err) => {
                tracing::error!(
                    field = %active,
                    layout = %self.focus.layout_type(),
                    "key not on presented layout"
                );
                if self.config.strict_tokens {
                    panic!("{err} on {} layout", self.focus.layout_type());
                }
                return Err(err);
            }
        };

        let index = self.index_of(active)?;
        match action {
            KeyAction::Insert(text) => {
                if let Err(err) = self.fields[index].insert(&text, self.config.max_length, now) {
                    let len = self.fields[index].buffer().len();
                    tracing::warn!(field = %active, len, "insert rejected");
                    return Err(err);
                }
                Ok(KeyOutcome::Inserted)
            }
            KeyAction::Delete => {
                if self.fields[index].delete(now) {
                    Ok(KeyOutcome::Deleted)
                } else {
                    Ok(KeyOutcome::Unchanged)
                }
            }
            KeyAction::Dismiss => {
                self.on_dismiss();
                Ok(KeyOutcome::Dismissed)
            }
            KeyAction::ToggleShift => Ok(KeyOutcome::ShiftToggled(self.focus.toggle_shift())),
            KeyAction::SwitchLayout => Ok(KeyOutcome::LayoutSwitched(self.on_toggle_layout_type())),
        }
    }

    /// Route a tapped key of the presented layout. Blank cells do nothing.
    pub fn on_key_pressed(&mut self, key: &Key, now: Instant) -> Result<KeyOutcome> {
        match key.token() {
            Some(token) => self.on_key_event(token, now),
            None => Ok(KeyOutcome::Unchanged),
        }
    }

    /// Flip Numeric/Alphanumeric. A visible keyboard gets a fresh layout.
    pub fn on_toggle_layout_type(&mut self) -> LayoutType {
        let layout_type = self.focus.toggle_layout_type();
        if self.focus.keyboard_visible() {
            self.regenerate_layout();
        }
        layout_type
    }

    /// Flip the reveal flag of `field`; returns the new value.
    pub fn on_toggle_reveal(&mut self, field: FieldId) -> Result<bool> {
        let index = self.index_of(field)?;
        Ok(self.fields[index].toggle_reveal())
    }

    /// The user tapped inside `field`'s text at `display_offset`.
    ///
    /// Only honored with `allow_cursor_placement`; otherwise the cursor stays
    /// pinned to the end. Returns the raw cursor offset afterwards.
    pub fn on_cursor_placed(&mut self, field: FieldId, display_offset: usize) -> Result<usize> {
        let index = self.index_of(field)?;
        if !self.config.allow_cursor_placement {
            tracing::trace!(%field, "cursor placement disabled");
            return Ok(self.fields[index].buffer().cursor());
        }
        let raw = self.fields[index].display(&self.mask).mapping().display_to_raw(display_offset);
        self.fields[index].place_cursor(raw);
        Ok(self.fields[index].buffer().cursor())
    }

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------

    /// Drive blink and delayed scroll. Returns true when the active field's
    /// display changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if let Some((due, target)) = self.pending_scroll {
            if now >= due {
                self.pending_scroll = None;
                self.host.bring_into_view(target);
            }
        }
        self.fields.iter_mut().fold(false, |changed, field| field.tick(now) || changed)
    }

    /// Earliest instant `on_tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let blink = self.fields.iter().filter_map(SecureField::next_deadline).min();
        let scroll = self.pending_scroll.map(|(due, _)| due);
        match (blink, scroll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Blink schedulers currently alive. Never more than one.
    pub fn running_blinkers(&self) -> usize {
        self.fields.iter().filter(|f| f.is_focused()).count()
    }

    // -------------------------------------------------------------------------
    // Keyboard geometry
    // -------------------------------------------------------------------------

    /// Measured height of the custom keyboard.
    pub fn set_keyboard_height(&mut self, height: u16) {
        self.keyboard_height = height;
    }

    /// Bottom padding the content needs so nothing hides behind the keyboard.
    pub fn content_bottom_padding(&self) -> u16 {
        if self.focus.keyboard_visible() {
            self.keyboard_height.saturating_add(KEYBOARD_PADDING_GAP)
        } else {
            0
        }
    }

    // -------------------------------------------------------------------------
    // Outbound state
    // -------------------------------------------------------------------------

    /// Layout on screen, if the keyboard is visible.
    pub fn key_layout(&self) -> Option<&KeyLayout> {
        self.layout.as_ref()
    }

    pub fn masked_display(&self, field: FieldId) -> Result<MaskedDisplay> {
        let index = self.index_of(field)?;
        Ok(self.fields[index].display(&self.mask))
    }

    /// Raw value of `field`, for submission.
    pub fn value(&self, field: FieldId) -> Result<&str> {
        let index = self.index_of(field)?;
        Ok(self.fields[index].value())
    }

    /// Wipe `field`'s value.
    pub fn clear(&mut self, field: FieldId) -> Result<()> {
        let index = self.index_of(field)?;
        self.fields[index].clear();
        Ok(())
    }

    pub fn field(&self, field: FieldId) -> Option<&SecureField> {
        self.fields.iter().find(|f| f.id() == field)
    }

    pub fn keyboard_visible(&self) -> bool {
        self.focus.keyboard_visible()
    }

    pub fn layout_type(&self) -> LayoutType {
        self.focus.layout_type()
    }

    pub fn shift_engaged(&self) -> bool {
        self.focus.shift_engaged()
    }

    pub fn active_field(&self) -> Option<FieldId> {
        self.focus.active()
    }

    /// Reactive handles to the focus state.
    pub fn signals(&self) -> &FocusSignals {
        self.focus.signals()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn index_of(&self, field: FieldId) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.id() == field)
            .ok_or(SafeKeyboardError::UnknownField(field))
    }

    fn regenerate_layout(&mut self) {
        let layout_type = self.focus.layout_type();
        self.layout = Some(self.generator.generate(layout_type));
        tracing::debug!(%layout_type, "layout regenerated");
    }
}

impl<H: SurfaceHost> Drop for SecureInputSession<H> {
    fn drop(&mut self) {
        if self.focus.keyboard_visible() {
            self.host.set_secure_window(false);
        }
        for field in &mut self.fields {
            field.blur();
            field.clear();
        }
    }
}
