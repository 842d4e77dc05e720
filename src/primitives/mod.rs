//! Secure field primitives.
//!
//! - [`InputBuffer`] - raw value plus cursor, pure insert/delete
//! - [`MaskingTransform`] - buffer to masked display string with offset mapping
//! - [`SecureField`] - a buffer with its reveal flag and blink scheduler
//!
//! Nothing here knows about focus or the keyboard; the session wires them.

mod buffer;
mod field;
mod mask;

pub use buffer::InputBuffer;
pub use field::SecureField;
pub use mask::{transform, MaskedDisplay, MaskingTransform, OffsetMapping};
