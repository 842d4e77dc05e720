//! LayoutGenerator - fresh key permutation per presentation.
//!
//! The shuffle is an anti-shoulder-surfing measure, not a cryptographic
//! control: a uniform Fisher-Yates over an RNG reseeded from OS entropy on
//! every call is enough. Nothing is cached between calls.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::keys::{Key, KeyLayout};
use crate::types::{LayoutType, ShufflePolicy};

// =============================================================================
// KEY SETS
// =============================================================================

/// Digits in unshuffled pad order.
pub const DIGITS: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

/// Decimal separators of the numeric pad.
pub const SEPARATORS: [&str; 2] = [",", "."];

/// Alphabet including the regional `ñ`, in unshuffled QWERTY order.
#[rustfmt::skip]
pub const LETTERS: [&str; 27] = [
    "q", "w", "e", "r", "t", "y", "u", "i", "o", "p",
    "a", "s", "d", "f", "g", "h", "j", "k", "l", "ñ",
    "z", "x", "c", "v", "b", "n", "m",
];

/// Columns of character keys per numeric row.
const NUMERIC_COLUMNS: usize = 3;
/// Letters per full alphabetic row.
const LETTER_ROW: usize = 10;

// =============================================================================
// GENERATOR
// =============================================================================

/// Builds randomized layouts according to a shuffle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutGenerator {
    policy: ShufflePolicy,
}

impl LayoutGenerator {
    pub fn new(policy: ShufflePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ShufflePolicy {
        self.policy
    }

    /// Generate a layout from a freshly seeded RNG.
    pub fn generate(&self, layout_type: LayoutType) -> KeyLayout {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(layout_type, &mut rng)
    }

    /// Generate a layout drawing randomness from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        layout_type: LayoutType,
        rng: &mut R,
    ) -> KeyLayout {
        let layout = match layout_type {
            LayoutType::Numeric => self.numeric(rng),
            LayoutType::Alphanumeric => self.alphanumeric(rng),
        };
        tracing::trace!(%layout_type, policy = ?self.policy, "generated key layout");
        layout
    }

    fn numeric<R: Rng + ?Sized>(&self, rng: &mut R) -> KeyLayout {
        let mut chars: Vec<&str> = DIGITS.to_vec();
        if self.policy.contains(ShufflePolicy::NUMERIC_PAD) {
            chars.extend(SEPARATORS);
            chars.shuffle(rng);
        } else {
            if self.policy.contains(ShufflePolicy::DIGITS) {
                chars.shuffle(rng);
            }
            let mut separators = SEPARATORS;
            if self.policy.contains(ShufflePolicy::SEPARATORS) {
                separators.shuffle(rng);
            }
            chars.extend(separators);
        }

        let side = [Key::Blank, Key::Backspace, Key::Enter, Key::Blank];
        let rows = chars
            .chunks(NUMERIC_COLUMNS)
            .zip(side)
            .map(|(chunk, control)| {
                let mut row: Vec<Key> = chunk.iter().map(|&c| Key::char(c)).collect();
                row.push(control);
                row
            })
            .collect();

        KeyLayout::new(LayoutType::Numeric, rows)
    }

    fn alphanumeric<R: Rng + ?Sized>(&self, rng: &mut R) -> KeyLayout {
        let mut digits = DIGITS;
        if self.policy.contains(ShufflePolicy::DIGITS) {
            digits.shuffle(rng);
        }
        let mut letters = LETTERS;
        if self.policy.contains(ShufflePolicy::LETTERS) {
            letters.shuffle(rng);
        }

        let to_keys = |labels: &[&str]| labels.iter().map(|&l| Key::char(l)).collect::<Vec<_>>();

        let mut bottom_letters = vec![Key::Shift];
        bottom_letters.extend(to_keys(&letters[2 * LETTER_ROW..]));
        bottom_letters.push(Key::Backspace);

        let rows = vec![
            to_keys(&digits),
            to_keys(&letters[..LETTER_ROW]),
            to_keys(&letters[LETTER_ROW..2 * LETTER_ROW]),
            bottom_letters,
            vec![Key::Space, Key::Enter],
        ];

        KeyLayout::new(LayoutType::Alphanumeric, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn sorted(mut labels: Vec<&str>) -> Vec<&str> {
        labels.sort_unstable();
        labels
    }

    #[test]
    fn test_numeric_grid_shape() {
        let layout =
            LayoutGenerator::default().generate_with_rng(LayoutType::Numeric, &mut seeded(1));
        assert_eq!(layout.layout_type(), LayoutType::Numeric);
        assert_eq!(layout.rows().len(), 4);
        assert!(layout.rows().iter().all(|row| row.len() == 4));
        assert_eq!(layout.key_at(0, 3), Some(&Key::Blank));
        assert_eq!(layout.key_at(1, 3), Some(&Key::Backspace));
        assert_eq!(layout.key_at(2, 3), Some(&Key::Enter));
        assert_eq!(layout.key_at(3, 3), Some(&Key::Blank));
    }

    #[test]
    fn test_numeric_contains_every_character_once() {
        for policy in [ShufflePolicy::empty(), ShufflePolicy::DIGITS, ShufflePolicy::NUMERIC_PAD] {
            let layout =
                LayoutGenerator::new(policy).generate_with_rng(LayoutType::Numeric, &mut seeded(9));
            let mut expected: Vec<&str> = DIGITS.to_vec();
            expected.extend(SEPARATORS);
            assert_eq!(sorted(layout.char_labels()), sorted(expected));
        }
    }

    #[test]
    fn test_digits_policy_keeps_separators_fixed() {
        let generator = LayoutGenerator::new(ShufflePolicy::DIGITS);
        for seed in 0..50 {
            let layout = generator.generate_with_rng(LayoutType::Numeric, &mut seeded(seed));
            assert_eq!(layout.key_at(3, 1), Some(&Key::char(",")));
            assert_eq!(layout.key_at(3, 2), Some(&Key::char(".")));
        }
    }

    #[test]
    fn test_numeric_pad_policy_moves_separators() {
        let generator = LayoutGenerator::new(ShufflePolicy::NUMERIC_PAD);
        let moved = (0..50).any(|seed| {
            let layout = generator.generate_with_rng(LayoutType::Numeric, &mut seeded(seed));
            layout.key_at(3, 1) != Some(&Key::char(","))
        });
        assert!(moved);
    }

    #[test]
    fn test_empty_policy_is_deterministic() {
        let generator = LayoutGenerator::new(ShufflePolicy::empty());
        let a = generator.generate_with_rng(LayoutType::Alphanumeric, &mut seeded(1));
        let b = generator.generate_with_rng(LayoutType::Alphanumeric, &mut seeded(2));
        assert_eq!(a, b);
        assert_eq!(a.key_at(1, 0), Some(&Key::char("q")));
        assert_eq!(a.key_at(2, 9), Some(&Key::char("ñ")));
        assert_eq!(a.key_at(0, 9), Some(&Key::char("0")));
    }

    #[test]
    fn test_alphanumeric_grid_shape() {
        let layout =
            LayoutGenerator::default().generate_with_rng(LayoutType::Alphanumeric, &mut seeded(3));
        let widths: Vec<usize> = layout.rows().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![10, 10, 10, 9, 2]);

        let mut expected: Vec<&str> = DIGITS.to_vec();
        expected.extend(LETTERS);
        assert_eq!(sorted(layout.char_labels()), sorted(expected));
    }

    #[test]
    fn test_alphanumeric_controls_never_move() {
        let generator = LayoutGenerator::new(ShufflePolicy::all());
        let reference = generator
            .generate_with_rng(LayoutType::Alphanumeric, &mut seeded(0))
            .control_positions();
        assert_eq!(
            reference,
            vec![
                ((3, 0), Key::Shift),
                ((3, 8), Key::Backspace),
                ((4, 0), Key::Space),
                ((4, 1), Key::Enter),
            ]
        );

        for seed in 1..200 {
            let layout = generator.generate_with_rng(LayoutType::Alphanumeric, &mut seeded(seed));
            assert_eq!(layout.control_positions(), reference);
        }
    }

    #[test]
    fn test_digit_positions_are_uniform() {
        // Each digit should land in each of the ten digit cells about 1/10 of
        // the time; a biased shuffle would pile up on its start position.
        let generator = LayoutGenerator::new(ShufflePolicy::DIGITS);
        let mut rng = seeded(42);
        let runs = 5000;
        let mut counts: HashMap<(String, usize), usize> = HashMap::new();
        let mut fixed_points = 0;

        for _ in 0..runs {
            let layout = generator.generate_with_rng(LayoutType::Numeric, &mut rng);
            for (pos, label) in layout.char_labels().into_iter().take(10).enumerate() {
                *counts.entry((label.to_string(), pos)).or_default() += 1;
                if DIGITS[pos] == label {
                    fixed_points += 1;
                }
            }
        }

        assert_eq!(counts.len(), 100);
        for count in counts.values() {
            assert!((350..=650).contains(count), "skewed cell count {count}");
        }
        // Expected one fixed point per permutation on average.
        let mean = fixed_points as f64 / runs as f64;
        assert!((0.85..=1.15).contains(&mean), "fixed point mean {mean}");
    }

    #[test]
    fn test_generate_reseeds_every_call() {
        let generator = LayoutGenerator::new(ShufflePolicy::all());
        let first = generator.generate(LayoutType::Alphanumeric);
        let second = generator.generate(LayoutType::Alphanumeric);
        assert_ne!(first, second);
    }
}
