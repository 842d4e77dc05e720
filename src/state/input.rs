//! Input Module - terminal event bridge
//!
//! Lets a terminal act as the rendering surface: crossterm key and mouse
//! events become [`SurfaceEvent`]s, and [`route_event`] feeds them to a
//! [`SecureInputSession`].
//!
//! # Key map
//!
//! | Terminal key     | Surface event            |
//! |------------------|--------------------------|
//! | printable char   | `Key(Label)` (`' '` → `Key(Space)`) |
//! | Backspace        | `Key(Backspace)`         |
//! | Enter            | `Key(Enter)`             |
//! | Tab / BackTab    | `FocusNext` / `FocusPrevious` |
//! | Esc              | `Dismiss`                |
//! | F2               | `Key(SwitchLayout)`      |
//! | F3               | `ToggleReveal`           |
//! | F4               | `Key(Shift)`             |
//! | Ctrl+C           | `Quit`                   |
//! | left click       | `Tap { column, row }`    |
//!
//! Key releases are ignored.
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::state::input::{poll_event, route_event, SurfaceEvent};
//! use std::time::{Duration, Instant};
//!
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(50))? {
//!         if event == SurfaceEvent::Quit {
//!             break;
//!         }
//!         route_event(&mut session, event, Instant::now())?;
//!     }
//!     session.on_tick(Instant::now());
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode, KeyEventKind, KeyModifiers,
    KeyEvent as CrosstermKeyEvent,
    MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
    poll, read,
    EnableMouseCapture, DisableMouseCapture,
};
use crossterm::execute;
use std::io::stdout;
use std::time::{Duration, Instant};

use super::keyboard::KeyToken;
use crate::error::{Result, SafeKeyboardError};
use crate::session::{SecureInputSession, SurfaceHost};

// =============================================================================
// SURFACE EVENT ENUM
// =============================================================================

/// What the terminal surface reports to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A keyboard key was pressed.
    Key(KeyToken),
    /// Left click at a terminal cell; the renderer resolves it to a key.
    Tap { column: u16, row: u16 },
    FocusNext,
    FocusPrevious,
    /// Reveal toggle of the active field.
    ToggleReveal,
    /// Tap outside the keyboard.
    Dismiss,
    /// Terminal resized (width, height).
    Resize(u16, u16),
    Quit,
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm KeyEvent to a surface event.
pub fn convert_key_event(event: CrosstermKeyEvent) -> SurfaceEvent {
    if event.kind == KeyEventKind::Release {
        return SurfaceEvent::None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => SurfaceEvent::Quit,
            _ => SurfaceEvent::None,
        };
    }

    match event.code {
        KeyCode::Char(' ') => SurfaceEvent::Key(KeyToken::Space),
        KeyCode::Char(c) => SurfaceEvent::Key(KeyToken::Label(c.to_string())),
        KeyCode::Backspace => SurfaceEvent::Key(KeyToken::Backspace),
        KeyCode::Enter => SurfaceEvent::Key(KeyToken::Enter),
        KeyCode::Tab => SurfaceEvent::FocusNext,
        KeyCode::BackTab => SurfaceEvent::FocusPrevious,
        KeyCode::Esc => SurfaceEvent::Dismiss,
        KeyCode::F(2) => SurfaceEvent::Key(KeyToken::SwitchLayout),
        KeyCode::F(3) => SurfaceEvent::ToggleReveal,
        KeyCode::F(4) => SurfaceEvent::Key(KeyToken::Shift),
        _ => SurfaceEvent::None,
    }
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm MouseEvent; only left presses are taps.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> SurfaceEvent {
    match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => SurfaceEvent::Tap {
            column: event.column,
            row: event.row,
        },
        _ => SurfaceEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<SurfaceEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<SurfaceEvent> {
    match read()? {
        CrosstermEvent::Key(key) => Ok(convert_key_event(key)),
        CrosstermEvent::Mouse(mouse) => Ok(convert_mouse_event(mouse)),
        CrosstermEvent::Resize(w, h) => Ok(SurfaceEvent::Resize(w, h)),
        _ => Ok(SurfaceEvent::None),
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Feed `event` to `session`. Returns true if the session handled it.
///
/// Taps, resizes and quit belong to the renderer and return false.
pub fn route_event<H: SurfaceHost>(
    session: &mut SecureInputSession<H>,
    event: SurfaceEvent,
    now: Instant,
) -> Result<bool> {
    match event {
        SurfaceEvent::Key(token) => session.on_key_event(token, now).map(|_| true),
        SurfaceEvent::FocusNext => session.focus_next(now).map(|_| true),
        SurfaceEvent::FocusPrevious => session.focus_previous(now).map(|_| true),
        SurfaceEvent::ToggleReveal => {
            let field = session.active_field().ok_or(SafeKeyboardError::NoActiveField)?;
            session.on_toggle_reveal(field).map(|_| true)
        }
        SurfaceEvent::Dismiss => {
            session.on_dismiss();
            Ok(true)
        }
        SurfaceEvent::Tap { .. }
        | SurfaceEvent::Resize(..)
        | SurfaceEvent::Quit
        | SurfaceEvent::None => Ok(false),
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::types::FieldId;

    fn key(code: KeyCode) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn setup() -> (SecureInputSession, Instant) {
        let mut config = SessionConfig::with_field_count(2);
        config.strict_tokens = false;
        (SecureInputSession::new(config).unwrap(), Instant::now())
    }

    #[test]
    fn test_convert_key_char() {
        assert_eq!(
            convert_key_event(key(KeyCode::Char('7'))),
            SurfaceEvent::Key(KeyToken::label("7"))
        );
        assert_eq!(
            convert_key_event(key(KeyCode::Char('ñ'))),
            SurfaceEvent::Key(KeyToken::label("ñ"))
        );
        assert_eq!(convert_key_event(key(KeyCode::Char(' '))), SurfaceEvent::Key(KeyToken::Space));
    }

    #[test]
    fn test_convert_key_special() {
        let specials = [
            (KeyCode::Backspace, SurfaceEvent::Key(KeyToken::Backspace)),
            (KeyCode::Enter, SurfaceEvent::Key(KeyToken::Enter)),
            (KeyCode::Tab, SurfaceEvent::FocusNext),
            (KeyCode::BackTab, SurfaceEvent::FocusPrevious),
            (KeyCode::Esc, SurfaceEvent::Dismiss),
            (KeyCode::F(2), SurfaceEvent::Key(KeyToken::SwitchLayout)),
            (KeyCode::F(3), SurfaceEvent::ToggleReveal),
            (KeyCode::F(4), SurfaceEvent::Key(KeyToken::Shift)),
            (KeyCode::Up, SurfaceEvent::None),
            (KeyCode::F(9), SurfaceEvent::None),
        ];

        for (code, expected) in specials {
            assert_eq!(convert_key_event(key(code)), expected);
        }
    }

    #[test]
    fn test_convert_key_release_ignored() {
        let mut event = key(KeyCode::Char('1'));
        event.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(event), SurfaceEvent::None);

        event.kind = KeyEventKind::Repeat;
        assert_eq!(convert_key_event(event), SurfaceEvent::Key(KeyToken::label("1")));
    }

    #[test]
    fn test_convert_key_with_ctrl() {
        let mut event = key(KeyCode::Char('c'));
        event.modifiers = KeyModifiers::CONTROL;
        assert_eq!(convert_key_event(event), SurfaceEvent::Quit);

        event.code = KeyCode::Char('v');
        assert_eq!(convert_key_event(event), SurfaceEvent::None);
    }

    #[test]
    fn test_convert_mouse() {
        let down = CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Left),
            column: 10,
            row: 5,
            modifiers: KeyModifiers::empty(),
        };
        assert_eq!(convert_mouse_event(down), SurfaceEvent::Tap { column: 10, row: 5 });

        let right = CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Right),
            ..down
        };
        assert_eq!(convert_mouse_event(right), SurfaceEvent::None);

        let moved = CrosstermMouseEvent {
            kind: MouseEventKind::Moved,
            ..down
        };
        assert_eq!(convert_mouse_event(moved), SurfaceEvent::None);
    }

    #[test]
    fn test_route_typing() {
        let (mut session, now) = setup();
        assert!(route_event(&mut session, SurfaceEvent::FocusNext, now).unwrap());
        assert_eq!(session.active_field(), Some(FieldId(0)));

        route_event(&mut session, SurfaceEvent::Key(KeyToken::label("4")), now).unwrap();
        route_event(&mut session, SurfaceEvent::Key(KeyToken::label("2")), now).unwrap();
        assert_eq!(session.value(FieldId(0)), Ok("42"));

        assert!(route_event(&mut session, SurfaceEvent::ToggleReveal, now).unwrap());
        assert_eq!(session.masked_display(FieldId(0)).unwrap().text(), "42|");
    }

    #[test]
    fn test_route_focus_cycle_and_dismiss() {
        let (mut session, now) = setup();
        route_event(&mut session, SurfaceEvent::FocusPrevious, now).unwrap();
        assert_eq!(session.active_field(), Some(FieldId(1)));

        route_event(&mut session, SurfaceEvent::FocusNext, now).unwrap();
        assert_eq!(session.active_field(), Some(FieldId(0)));

        route_event(&mut session, SurfaceEvent::Dismiss, now).unwrap();
        assert!(!session.keyboard_visible());
    }

    #[test]
    fn test_route_renderer_events_unhandled() {
        let (mut session, now) = setup();
        for event in [
            SurfaceEvent::Tap { column: 1, row: 1 },
            SurfaceEvent::Resize(80, 24),
            SurfaceEvent::Quit,
            SurfaceEvent::None,
        ] {
            assert!(!route_event(&mut session, event, now).unwrap());
        }
    }

    #[test]
    fn test_route_while_idle() {
        let (mut session, now) = setup();
        assert_eq!(
            route_event(&mut session, SurfaceEvent::ToggleReveal, now),
            Err(SafeKeyboardError::NoActiveField)
        );
        assert_eq!(
            route_event(&mut session, SurfaceEvent::Key(KeyToken::label("1")), now),
            Err(SafeKeyboardError::NoActiveField)
        );
    }
}
