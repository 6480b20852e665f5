// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Store: a stable-identity, hash-bucketed slot store.
//!
//! [`KeyedStore`] maps caller-computed 64-bit keys to values held in slots
//! whose indices never move. It is the backing table for a persistent UI node
//! graph: nodes are looked up by hierarchical string hashes every frame,
//! handles stay valid across insertions, and stale entries can be swept with
//! [`KeyedStore::retain`] mid-frame without skipping or revisiting live ones.
//!
//! - Values live in a free-listed slot arena; a [`SlotId`] is a generational
//!   handle, so a reused slot never aliases an old handle.
//! - Lookup goes through fixed-count buckets (`key % bucket_count`), each
//!   holding a small inline list of slot indices resolved by linear scan.
//! - Removal during iteration is expressed as [`KeyedStore::retain`], which
//!   visits every live entry exactly once.
//!
//! ## Example
//!
//! ```rust
//! use bracken_store::KeyedStore;
//!
//! let mut store: KeyedStore<&'static str> = KeyedStore::new();
//! let (a, found) = store.get_or_insert_with(0xBEEF, || "hello");
//! assert!(!found);
//! let (b, found) = store.get_or_insert_with(0xBEEF, || "other");
//! assert!(found);
//! assert_eq!(a, b);
//! assert_eq!(store.value(a), Some(&"hello"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use smallvec::SmallVec;

/// Generational handle to a slot in a [`KeyedStore`].
///
/// A `SlotId` stays valid for as long as the entry it points to is live; once
/// the entry is removed the handle goes stale and all accessors return `None`
/// for it, even if the underlying slot index is later reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotId(u32, u32);

impl SlotId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "SlotId uses 32-bit indices by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Slot<V> {
    generation: u32,
    key: u64,
    value: V,
}

/// Default number of hash buckets.
///
/// Buckets only accelerate key lookup; the count does not bound the number of
/// entries, it only trades memory for shorter per-bucket scans.
pub const DEFAULT_BUCKET_COUNT: usize = 256;

/// A hash-keyed slot store with stable identities.
///
/// Keys are caller-computed 64-bit hashes; two distinct keys are always two
/// distinct entries, while inserting an existing key yields the existing
/// entry. Slot indices are never reused while an entry is live and never
/// relocated by growth, so a [`SlotId`] taken at insertion time can be held
/// across arbitrarily many later insertions.
#[derive(Clone, Debug)]
pub struct KeyedStore<V> {
    slots: Vec<Option<Slot<V>>>,
    /// Last generation per slot (persists across frees).
    generations: Vec<u32>,
    free_list: Vec<usize>,
    buckets: Vec<SmallVec<[u32; 4]>>,
    len: usize,
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KeyedStore<V> {
    /// Create an empty store with [`DEFAULT_BUCKET_COUNT`] buckets.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Create an empty store with an explicit bucket count.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero.
    pub fn with_buckets(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "bucket count must be non-zero");
        let mut buckets = Vec::new();
        buckets.resize_with(bucket_count, SmallVec::new);
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            buckets,
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, key: u64) -> usize {
        (key % self.buckets.len() as u64) as usize
    }

    /// Look up the slot holding `key`, if present.
    pub fn slot_of(&self, key: u64) -> Option<SlotId> {
        let bucket = self.bucket_of(key);
        for &idx in &self.buckets[bucket] {
            if let Some(slot) = &self.slots[idx as usize]
                && slot.key == key
            {
                return Some(SlotId(idx, slot.generation));
            }
        }
        None
    }

    /// Whether an entry for `key` is present.
    pub fn contains(&self, key: u64) -> bool {
        self.slot_of(key).is_some()
    }

    /// Get the entry for `key`, inserting a fresh value from `init` if absent.
    ///
    /// Returns the entry's [`SlotId`] and whether an existing entry was found
    /// (`true` means `init` was not called). The returned id is stable: later
    /// insertions never invalidate it.
    pub fn get_or_insert_with(&mut self, key: u64, init: impl FnOnce() -> V) -> (SlotId, bool) {
        if let Some(id) = self.slot_of(key) {
            return (id, true);
        }
        let value = init();
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot {
                generation,
                key,
                value,
            });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Slot {
                generation,
                key,
                value,
            }));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        let id = SlotId::new(idx, generation);
        let bucket = self.bucket_of(key);
        self.buckets[bucket].push(id.0);
        self.len += 1;
        (id, false)
    }

    /// Get the value for `key`, if present.
    pub fn get(&self, key: u64) -> Option<&V> {
        self.slot_of(key).and_then(|id| self.value(id))
    }

    /// Get the value for `key` mutably, if present.
    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        let id = self.slot_of(key)?;
        self.value_mut(id)
    }

    /// Whether `id` refers to a live entry.
    pub fn is_alive(&self, id: SlotId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.1)
    }

    /// The key stored at `id`, or `None` for stale handles.
    pub fn key_of(&self, id: SlotId) -> Option<u64> {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .filter(|s| s.generation == id.1)
            .map(|s| s.key)
    }

    /// The value stored at `id`, or `None` for stale handles.
    pub fn value(&self, id: SlotId) -> Option<&V> {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .filter(|s| s.generation == id.1)
            .map(|s| &s.value)
    }

    /// The value stored at `id` mutably, or `None` for stale handles.
    pub fn value_mut(&mut self, id: SlotId) -> Option<&mut V> {
        self.slots
            .get_mut(id.idx())
            .and_then(|s| s.as_mut())
            .filter(|s| s.generation == id.1)
            .map(|s| &mut s.value)
    }

    /// Remove the entry for `key`, returning its value.
    pub fn remove(&mut self, key: u64) -> Option<V> {
        let id = self.slot_of(key)?;
        let bucket = self.bucket_of(key);
        self.buckets[bucket].retain(|&mut idx| idx != id.0);
        let slot = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        self.len -= 1;
        Some(slot.value)
    }

    /// Keep only the entries for which `keep` returns `true`.
    ///
    /// This is the removal-during-iteration surface: every live entry is
    /// visited exactly once, in slot order, and entries rejected by `keep`
    /// are freed immediately. Handles to removed entries go stale.
    pub fn retain(&mut self, mut keep: impl FnMut(u64, &mut V) -> bool) {
        for idx in 0..self.slots.len() {
            let remove = match &mut self.slots[idx] {
                Some(slot) => !keep(slot.key, &mut slot.value),
                None => continue,
            };
            if remove {
                let key = self.slots[idx].as_ref().map(|s| s.key);
                if let Some(key) = key {
                    let bucket = self.bucket_of(key);
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "SlotId uses 32-bit indices by design."
                    )]
                    self.buckets[bucket].retain(|&mut i| i != idx as u32);
                }
                self.slots[idx] = None;
                self.free_list.push(idx);
                self.len -= 1;
            }
        }
    }

    /// Iterate live entries as `(key, id, &value)`.
    ///
    /// Iteration order is slot order, which reflects insertion and reuse
    /// history; callers must not rely on it for anything user-visible.
    pub fn iter(&self) -> impl Iterator<Item = (u64, SlotId, &V)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()
                .map(|s| (s.key, SlotId::new(idx, s.generation), &s.value))
        })
    }
}
