//! Stacking order of overlapping drawing elements.
//!
//! # Overview
//!
//! [`ZOrderMap`] keeps one permanent integer index per item. Indices are
//! unique, so sorting by index gives the paint order. Moves renumber only the
//! items between the old and the new position.
//!
//! An item can additionally be *elevated* while the user drags it. An
//! elevated item reports [`Z_ELEVATED`] from [`ZOrderMap::z_index`] and paints
//! above everything else, but its permanent index is kept and is the only
//! value ever returned by [`ZOrderMap::persistent_index`] or stored in a
//! [`ZOrderSnapshot`].
//!
//! # Examples
//!
//! ```
//! # use topolink::zorder::{ZOrderMap, Z_ELEVATED};
//! let mut order = ZOrderMap::new();
//! order.add('a', None);
//! order.add('b', None);
//! order.add('c', None);
//!
//! order.move_to_top('a');
//! assert_eq!(order.ordered(), vec!['b', 'c', 'a']);
//!
//! order.bring_to_top('b');
//! assert_eq!(order.z_index('b'), Some(Z_ELEVATED));
//! assert_eq!(order.persistent_index('b'), Some(0));
//! ```

use std::{cmp::Ordering, fmt, hash::Hash};

use indexmap::IndexMap;
use log::trace;

/// Sentinel reported for elevated items. Never persisted.
pub const Z_ELEVATED: i64 = i64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZEntry {
    index: i64,
    elevated: bool,
}

/// Permanent indices of every item, captured for undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZOrderSnapshot<K>(Vec<(K, i64)>);

impl<K: Copy> ZOrderSnapshot<K> {
    pub fn entries(&self) -> impl Iterator<Item = (K, i64)> + '_ {
        self.0.iter().copied()
    }
}

/// Ordered index over stacked items.
#[derive(Debug, Clone)]
pub struct ZOrderMap<K> {
    entries: IndexMap<K, ZEntry>,
}

impl<K> Default for ZOrderMap<K> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> PartialEq for ZOrderMap<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K> ZOrderMap<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    /// Adds an item and returns its permanent index.
    ///
    /// Without an explicit index the item goes one past the current maximum.
    /// An explicit index already taken pushes that item and everything above
    /// it up by one. Re-adding a present item only returns its index.
    pub fn add(&mut self, key: K, index: Option<i64>) -> i64 {
        if let Some(entry) = self.entries.get(&key) {
            return entry.index;
        }
        let index = match index {
            Some(index) => {
                if self.entries.values().any(|entry| entry.index == index) {
                    for entry in self.entries.values_mut() {
                        if entry.index >= index {
                            entry.index += 1;
                        }
                    }
                }
                index
            }
            None => self.max_index().map_or(0, |max| max + 1),
        };
        trace!(key:?, index; "Adding item to z-order");
        self.entries.insert(
            key,
            ZEntry {
                index,
                elevated: false,
            },
        );
        index
    }

    /// Removes an item, returning its permanent index.
    pub fn remove(&mut self, key: K) -> Option<i64> {
        self.entries.shift_remove(&key).map(|entry| entry.index)
    }

    /// Effective index: [`Z_ELEVATED`] while elevated, else the permanent one.
    pub fn z_index(&self, key: K) -> Option<i64> {
        self.entries.get(&key).map(|entry| {
            if entry.elevated {
                Z_ELEVATED
            } else {
                entry.index
            }
        })
    }

    /// Permanent index, ignoring elevation.
    pub fn persistent_index(&self, key: K) -> Option<i64> {
        self.entries.get(&key).map(|entry| entry.index)
    }

    pub fn is_elevated(&self, key: K) -> bool {
        self.entries.get(&key).is_some_and(|entry| entry.elevated)
    }

    /// Items sorted by permanent index, lowest first.
    pub fn ordered(&self) -> Vec<K> {
        let mut items: Vec<(K, i64)> = self
            .entries
            .iter()
            .map(|(key, entry)| (*key, entry.index))
            .collect();
        items.sort_by_key(|(_, index)| *index);
        items.into_iter().map(|(key, _)| key).collect()
    }

    /// Items in the order they are painted: elevated items come last.
    pub fn paint_order(&self) -> Vec<K> {
        let mut items: Vec<(K, ZEntry)> = self
            .entries
            .iter()
            .map(|(key, entry)| (*key, *entry))
            .collect();
        items.sort_by(|(_, a), (_, b)| match a.elevated.cmp(&b.elevated) {
            Ordering::Equal => a.index.cmp(&b.index),
            other => other,
        });
        items.into_iter().map(|(key, _)| key).collect()
    }

    /// Swaps the item with the next higher one. Returns `false` at the top.
    pub fn move_up(&mut self, key: K) -> bool {
        self.swap_with_neighbor(key, 1)
    }

    /// Swaps the item with the next lower one. Returns `false` at the bottom.
    pub fn move_down(&mut self, key: K) -> bool {
        self.swap_with_neighbor(key, -1)
    }

    /// Gives the item the highest index, shifting the items above it down.
    pub fn move_to_top(&mut self, key: K) -> bool {
        let Some(current) = self.persistent_index(key) else {
            return false;
        };
        let Some(max) = self.max_index() else {
            return false;
        };
        if current == max {
            return false;
        }
        for (other, entry) in self.entries.iter_mut() {
            if *other != key && entry.index > current && entry.index <= max {
                entry.index -= 1;
            }
        }
        self.set_index(key, max);
        true
    }

    /// Gives the item the lowest index, shifting the items below it up.
    pub fn move_to_bottom(&mut self, key: K) -> bool {
        let Some(current) = self.persistent_index(key) else {
            return false;
        };
        let Some(min) = self.min_index() else {
            return false;
        };
        if current == min {
            return false;
        }
        for (other, entry) in self.entries.iter_mut() {
            if *other != key && entry.index >= min && entry.index < current {
                entry.index += 1;
            }
        }
        self.set_index(key, min);
        true
    }

    /// Steps the item up or down until it reaches `target` or cannot pass
    /// the next neighbour without overshooting.
    pub fn move_to(&mut self, key: K, target: i64) -> bool {
        let mut moved = false;
        loop {
            let Some(current) = self.persistent_index(key) else {
                return moved;
            };
            let step = match current.cmp(&target) {
                Ordering::Less => self
                    .neighbor_index(key, 1)
                    .filter(|next| *next <= target)
                    .map(|_| 1),
                Ordering::Greater => self
                    .neighbor_index(key, -1)
                    .filter(|prev| *prev >= target)
                    .map(|_| -1),
                Ordering::Equal => None,
            };
            match step {
                Some(step) => moved |= self.swap_with_neighbor(key, step),
                None => return moved,
            }
        }
    }

    /// Elevates the item above everything. Idempotent.
    pub fn bring_to_top(&mut self, key: K) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) if !entry.elevated => {
                entry.elevated = true;
                true
            }
            _ => false,
        }
    }

    /// Drops the elevation and returns to the permanent index. Idempotent.
    pub fn return_from_top(&mut self, key: K) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) if entry.elevated => {
                entry.elevated = false;
                true
            }
            _ => false,
        }
    }

    /// Captures the permanent indices.
    pub fn snapshot(&self) -> ZOrderSnapshot<K> {
        ZOrderSnapshot(
            self.entries
                .iter()
                .map(|(key, entry)| (*key, entry.index))
                .collect(),
        )
    }

    /// Restores permanent indices from a snapshot. Elevation is left as is
    /// and items missing from the map are ignored.
    pub fn restore(&mut self, snapshot: &ZOrderSnapshot<K>) {
        for (key, index) in snapshot.entries() {
            self.set_index(key, index);
        }
    }

    fn set_index(&mut self, key: K, index: i64) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.index = index;
        }
    }

    fn max_index(&self) -> Option<i64> {
        self.entries.values().map(|entry| entry.index).max()
    }

    fn min_index(&self) -> Option<i64> {
        self.entries.values().map(|entry| entry.index).min()
    }

    /// Index of the nearest item above (`step > 0`) or below.
    fn neighbor_index(&self, key: K, step: i64) -> Option<i64> {
        self.neighbor(key, step).map(|(_, index)| index)
    }

    fn neighbor(&self, key: K, step: i64) -> Option<(K, i64)> {
        let current = self.persistent_index(key)?;
        let candidates = self
            .entries
            .iter()
            .filter(|(other, _)| **other != key)
            .map(|(other, entry)| (*other, entry.index));
        if step > 0 {
            candidates
                .filter(|(_, index)| *index > current)
                .min_by_key(|(_, index)| *index)
        } else {
            candidates
                .filter(|(_, index)| *index < current)
                .max_by_key(|(_, index)| *index)
        }
    }

    fn swap_with_neighbor(&mut self, key: K, step: i64) -> bool {
        let Some(current) = self.persistent_index(key) else {
            return false;
        };
        let Some((other, other_index)) = self.neighbor(key, step) else {
            return false;
        };
        self.set_index(other, current);
        self.set_index(key, other_index);
        true
    }
}
