//! Roll-number ordering.
//!
//! Roll numbers arrive as text ("9", "10", "21CS009"). Sorting them as plain
//! strings puts "10" before "9", so every ordering in the engine goes through
//! [`RollKey`], which compares by length first and then by text.

use std::cmp::Ordering;

/// Compare two roll numbers: shorter first, then lexicographic.
pub fn compare_rolls(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort key wrapping a roll number.
///
/// Implements `Ord` so it can be used with `sort_by_key`, `min_by_key` and
/// ordered collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RollKey<'a>(pub &'a str);

impl Ord for RollKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_rolls(self.0, other.0)
    }
}

impl PartialOrd for RollKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rolls_sort_by_value() {
        let mut rolls = vec!["10", "9", "101", "100"];
        rolls.sort_by_key(|r| RollKey(*r));
        assert_eq!(rolls, vec!["9", "10", "100", "101"]);
    }

    #[test]
    fn test_alphanumeric_rolls() {
        assert_eq!(compare_rolls("21CS009", "21CS010"), Ordering::Less);
        assert_eq!(compare_rolls("21CS010", "21CS010"), Ordering::Equal);
        assert_eq!(compare_rolls("21EC001", "21CS999"), Ordering::Greater);
    }

    #[test]
    fn test_min_max_by_key() {
        let rolls = ["105", "101", "103"];
        assert_eq!(rolls.iter().min_by_key(|r| RollKey(**r)), Some(&"101"));
        assert_eq!(rolls.iter().max_by_key(|r| RollKey(**r)), Some(&"105"));
    }
}
