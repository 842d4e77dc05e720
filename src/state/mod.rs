//! State Module - Runtime state machines
//!
//! - **Focus** - which field owns the keyboard, layout type, shift
//! - **Keyboard** - key tokens, routing table, outcomes
//! - **Drawn cursor** - blink scheduling for the synthetic cursor
//! - **Input** - crossterm bridge for terminal surfaces

mod drawn_cursor;
mod focus;
pub mod input;
mod keyboard;

pub use drawn_cursor::*;
pub use focus::*;
pub use keyboard::*;
