//! # Label Hashing
//!
//! Box identity is a keyed hash of the label, seeded by the parent's key.
//! The same label under two different parents yields two different keys.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

/// Hashes a label with a seed.
///
/// Deterministic across runs and platforms. `seed` is normally the parent
/// box's key, or 0 for a box with no parent.
///
/// # Example
///
/// ```rust
/// use arbor_core::hash_label;
///
/// let root = hash_label("root", 0);
/// assert_eq!(root, hash_label("root", 0));
/// assert_ne!(hash_label("item", root), hash_label("item", 0));
/// ```
#[must_use]
pub fn hash_label(label: &str, seed: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(seed, 0);
    hasher.write(label.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_label("button", 7), hash_label("button", 7));
    }

    #[test]
    fn test_seed_changes_key() {
        assert_ne!(hash_label("button", 1), hash_label("button", 2));
    }

    #[test]
    fn test_label_changes_key() {
        assert_ne!(hash_label("a", 0), hash_label("b", 0));
        assert_ne!(hash_label("", 0), hash_label(" ", 0));
    }
}
