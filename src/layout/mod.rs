//! Layout Module - Randomized key arrangements
//!
//! Produces the grid of keys the rendering surface draws. Character keys are
//! permuted per presentation to resist shoulder-surfing; control keys always
//! sit in the same cells so muscle memory for backspace/enter survives.
//!
//! # Grids
//!
//! Numeric (4x4): the twelve characters `0-9 , .` fill the first three
//! columns row by row; the fourth column is `[_, ⌫, ⏎, _]`.
//!
//! Alphanumeric (5 rows):
//!
//! ```text
//! d d d d d d d d d d
//! l l l l l l l l l l
//! l l l l l l l l l l
//! ⇧ l l l l l l l ⌫
//! ␣ ⏎
//! ```
//!
//! # Example
//!
//! ```ignore
//! use safe_keyboard::layout::LayoutGenerator;
//! use safe_keyboard::{LayoutType, ShufflePolicy};
//!
//! let generator = LayoutGenerator::new(ShufflePolicy::NUMERIC_PAD);
//! let layout = generator.generate(LayoutType::Numeric);
//! for row in layout.rows() {
//!     // draw row
//! }
//! ```

mod generator;
mod keys;

pub use generator::*;
pub use keys::*;
