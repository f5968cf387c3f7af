// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

/// Latest value seen from each combined source, one slot per source index.
///
/// Snapshots are immutable: [`with_slot`](Self::with_slot) copies the slots into a
/// new state, so a snapshot already handed downstream never changes underneath
/// its holder. Cloning a snapshot is cheap.
#[derive(Debug)]
pub struct CombinedState<T> {
    slots: Arc<[Option<T>]>,
    present: usize,
}

impl<T> Clone for CombinedState<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            present: self.present,
        }
    }
}

impl<T: Clone> CombinedState<T> {
    /// Creates a state with `len` empty slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            present: 0,
        }
    }

    /// Returns a new snapshot with slot `index` set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn with_slot(&self, index: usize, value: T) -> Self {
        let mut slots = self.slots.to_vec();
        let present = if slots[index].is_none() {
            self.present + 1
        } else {
            self.present
        };
        slots[index] = Some(value);

        Self {
            slots: slots.into(),
            present,
        }
    }

    /// Clones the slot values in source order, or `None` while any slot is empty.
    pub fn values(&self) -> Option<Vec<T>> {
        self.slots.iter().cloned().collect()
    }
}

impl<T> CombinedState<T> {
    /// Number of slots, i.e. the number of combined sources.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` once every source has contributed a value. Never reverts.
    pub fn is_complete(&self) -> bool {
        self.present == self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }
}
