//! Secure PIN Example - terminal as the rendering surface
//!
//! Two masked fields (a numeric PIN and an alphanumeric password) with a
//! shuffled keyboard drawn below them:
//! - Click a key, or type its character
//! - Tab / Shift+Tab to move between fields
//! - F2 switches layout, F3 reveals, F4 shift
//! - Esc hides the keyboard
//!
//! Run with: cargo run --example secure_pin

use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use safe_keyboard::state::input::{
    disable_mouse, enable_mouse, poll_event, route_event, SurfaceEvent,
};
use safe_keyboard::{
    FieldId, FieldSpec, LayoutType, RecordingHost, SecureInputSession, SessionConfig, ShufflePolicy,
};

const PIN: FieldId = FieldId(0);
const PASSWORD: FieldId = FieldId(1);

const KEYBOARD_TOP: u16 = 6;
const KEY_WIDTH: u16 = 4;

fn main() -> io::Result<()> {
    let config = SessionConfig {
        fields: vec![
            FieldSpec::new(0).with_layout(LayoutType::Numeric),
            FieldSpec::new(1).with_layout(LayoutType::Alphanumeric),
        ],
        shuffle: ShufflePolicy::NUMERIC_PAD | ShufflePolicy::LETTERS,
        max_length: Some(12),
        strict_tokens: false,
        ..Default::default()
    };
    let mut session = match SecureInputSession::with_host(config, RecordingHost::new()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to start session: {}", e);
            return Ok(());
        }
    };

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;
    enable_mouse()?;

    let result = run(&mut session);

    disable_mouse()?;
    execute!(stdout(), Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

fn run(session: &mut SecureInputSession<RecordingHost>) -> io::Result<()> {
    let mut status = String::from("Click or type keys, Ctrl+C quits");
    if let Err(e) = session.focus_next(Instant::now()) {
        status = e.to_string();
    }
    draw(session, &status)?;

    loop {
        let now = Instant::now();
        let timeout = session
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::from_millis(250));

        if let Some(event) = poll_event(timeout)? {
            let now = Instant::now();
            match event {
                SurfaceEvent::Quit => break,
                SurfaceEvent::Tap { column, row } => {
                    if let Some(key) = key_at(session, column, row) {
                        status = describe(session.on_key_pressed(&key, now));
                    }
                }
                event => {
                    if let Err(e) = route_event(session, event, now) {
                        status = e.to_string();
                    }
                }
            }
        }
        session.on_tick(Instant::now());
        for call in session.host_mut().take() {
            status = format!("host: {:?}", call);
        }
        draw(session, &status)?;
    }
    Ok(())
}

fn describe<T: std::fmt::Debug>(result: safe_keyboard::Result<T>) -> String {
    match result {
        Ok(outcome) => format!("{:?}", outcome),
        Err(e) => e.to_string(),
    }
}

/// Key drawn at a terminal cell.
fn key_at(
    session: &SecureInputSession<RecordingHost>,
    column: u16,
    row: u16,
) -> Option<safe_keyboard::Key> {
    let layout = session.key_layout()?;
    let r = row.checked_sub(KEYBOARD_TOP)? as usize;
    let c = (column / KEY_WIDTH) as usize;
    layout.key_at(r, c).cloned()
}

fn draw(session: &SecureInputSession<RecordingHost>, status: &str) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All))?;

    let fields = [(PIN, "PIN     "), (PASSWORD, "Password")];
    for (row, (field, name)) in fields.into_iter().enumerate() {
        let marker = if session.active_field() == Some(field) { ">" } else { " " };
        let shown = session
            .masked_display(field)
            .map(|d| d.text().to_string())
            .unwrap_or_default();
        queue!(out, MoveTo(0, row as u16 + 1), Print(format!("{marker} {name} [{shown}]")))?;
    }

    if let Some(layout) = session.key_layout() {
        for (r, keys) in layout.rows().iter().enumerate() {
            for (c, key) in keys.iter().enumerate() {
                let caption = key.caption(session.shift_engaged());
                queue!(
                    out,
                    MoveTo(c as u16 * KEY_WIDTH, KEYBOARD_TOP + r as u16),
                    Print(format!("[{:^2}]", caption))
                )?;
            }
        }
    }

    queue!(out, MoveTo(0, KEYBOARD_TOP + 7), Print(status))?;
    out.flush()
}
