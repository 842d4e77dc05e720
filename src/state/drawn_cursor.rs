//! Drawn Cursor - blink scheduling for the synthetic cursor
//!
//! Secure fields never receive native text input, so the caret is a glyph the
//! masking transform splices into the display string. This module decides
//! when that glyph is drawn.
//!
//! # States
//!
//! - **Solid** - cursor forced visible. Entered on start and on every edit.
//! - **Blinking** - visibility flips on each tick. Entered on a tick that finds
//!   no edit within the idle threshold.
//!
//! # Pattern
//!
//! There is no timer thread. The host asks [`CursorBlink::next_deadline`]
//! when to wake up and calls [`CursorBlink::tick`] from its own event loop, so
//! every state change happens on the UI thread. A scheduler only exists while
//! its field is focused; dropping it is the cancellation.
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::state::CursorBlink;
//! use std::time::Instant;
//!
//! let mut blink = CursorBlink::start(Default::default(), Instant::now());
//! // event loop
//! if blink.tick(Instant::now()) {
//!     // redraw the masked text
//! }
//! ```

use std::time::Instant;

use crate::config::BlinkConfig;

/// Blink state of a focused field's cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Solid,
    Blinking,
}

/// Cursor blink state machine for one focused field.
#[derive(Debug, Clone)]
pub struct CursorBlink {
    config: BlinkConfig,
    phase: BlinkPhase,
    visible: bool,
    last_edit: Instant,
    next_tick: Instant,
}

impl CursorBlink {
    /// Start in Solid with the cursor visible; first tick one interval out.
    pub fn start(config: BlinkConfig, now: Instant) -> Self {
        Self {
            config,
            phase: BlinkPhase::Solid,
            visible: true,
            last_edit: now,
            next_tick: now + config.interval,
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// When the next tick is due.
    pub fn next_deadline(&self) -> Instant {
        self.next_tick
    }

    /// An edit happened: force the cursor solid and restart the idle timer.
    pub fn note_edit(&mut self, now: Instant) {
        self.phase = BlinkPhase::Solid;
        self.visible = true;
        self.last_edit = now;
    }

    /// Advance the scheduler. Returns true when cursor visibility changed.
    ///
    /// Calls before the deadline do nothing, so the host may call this on
    /// every loop iteration.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_tick {
            return false;
        }
        self.next_tick = now + self.config.interval;

        let was_visible = self.visible;
        if now.saturating_duration_since(self.last_edit) > self.config.idle_threshold {
            self.phase = BlinkPhase::Blinking;
            self.visible = !self.visible;
        } else {
            self.phase = BlinkPhase::Solid;
            self.visible = true;
        }
        tracing::trace!(phase = ?self.phase, visible = self.visible, "cursor tick");
        was_visible != self.visible
    }
}
