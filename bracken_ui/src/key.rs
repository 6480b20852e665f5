// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity: hierarchical string keys hashed to 64 bits.
//!
//! A node's label is a combined display/hash string: everything before the
//! `"##"` separator is shown, everything after it feeds the hash. Without a
//! separator the whole label does both jobs. The hash is salted with the
//! parent's key so same-named siblings under different parents stay
//! distinct; identity-less nodes are salted with a per-frame random value
//! instead.

use core::hash::Hasher;

use rustc_hash::FxHasher;

/// The display/hash separator inside a node label.
pub const LABEL_SEPARATOR: &str = "##";

/// A node's 64-bit identity hash.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey(u64);

impl NodeKey {
    /// The raw hash value, used as the store key.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Split a label into its display part and its hash-source part.
pub(crate) fn split_label(label: &str) -> (&str, &str) {
    match label.split_once(LABEL_SEPARATOR) {
        Some((display, hash_src)) => (display, hash_src),
        None => (label, label),
    }
}

/// Hash a key string under a salt (parent key or per-frame random).
pub(crate) fn hash_key(salt: u64, hash_src: &str) -> NodeKey {
    let mut hasher = FxHasher::default();
    hasher.write_u64(salt);
    hasher.write(hash_src.as_bytes());
    NodeKey(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_without_separator_is_both_parts() {
        assert_eq!(split_label("Save"), ("Save", "Save"));
    }

    #[test]
    fn separator_splits_display_from_hash() {
        assert_eq!(split_label("3 items##item_count"), ("3 items", "item_count"));
        // Changing the display part must not change identity.
        let a = hash_key(0, split_label("3 items##item_count").1);
        let b = hash_key(0, split_label("4 items##item_count").1);
        assert_eq!(a, b);
    }

    #[test]
    fn hashing_is_deterministic_and_salted() {
        assert_eq!(hash_key(1, "button"), hash_key(1, "button"));
        assert_ne!(hash_key(1, "button"), hash_key(2, "button"));
        assert_ne!(hash_key(1, "button"), hash_key(1, "slider"));
    }
}
