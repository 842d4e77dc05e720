//! # safe-keyboard
//!
//! Secure input core for a custom on-screen keypad.
//!
//! Sensitive fields (PINs, passwords, amounts) never see the platform soft
//! keyboard. Instead the rendering surface draws a keyboard whose character
//! keys are shuffled on every presentation, reports taps back as key tokens,
//! and draws the masked text plus a synthetic blinking cursor that this crate
//! computes.
//!
//! ## Architecture
//!
//! One owned [`SecureInputSession`] per screen. Everything the surface
//! reports goes in through it; everything the surface draws comes out of it:
//! ```text
//! focus / key / tick events → SecureInputSession → FocusCoordinator
//!                                                → SecureField (buffer, blink)
//!                                                → LayoutGenerator
//!                             KeyLayout, MaskedDisplay, Signals ←┘
//! ```
//!
//! Platform side effects (secure window flag, native keyboard suppression,
//! scroll into view) go through the [`SurfaceHost`] trait.
//!
//! ## Modules
//!
//! - [`types`] - Field ids, layout type, positioning mode, shuffle policy
//! - [`config`] - Session, blink and glyph configuration
//! - [`layout`] - Keys, layouts and the randomized generator
//! - [`primitives`] - Input buffer, masking transform, secure field
//! - [`state`] - Focus coordinator, key routing, cursor blink, terminal bridge
//! - [`session`] - The session and its host seam

pub mod config;
pub mod error;
pub mod layout;
pub mod primitives;
pub mod session;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{BlinkConfig, FieldSpec, Glyphs, SessionConfig};

pub use error::{Result, SafeKeyboardError};

pub use layout::{Key, KeyLayout, LayoutGenerator};

pub use primitives::{
    transform, InputBuffer, MaskedDisplay, MaskingTransform, OffsetMapping, SecureField,
};

pub use session::{HostCall, NoopHost, RecordingHost, SecureInputSession, SurfaceHost};

pub use state::{
    // Focus
    FocusCoordinator, FocusSignals, FocusTransition,
    // Keyboard
    KeyAction, KeyOutcome, KeyToken,
    // Cursor
    BlinkPhase, CursorBlink,
};
