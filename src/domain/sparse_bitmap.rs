//! Sparse set of interned ids, used as the backing representation for
//! [`super::points_to_set::PointsToSet`].
//!
//! Grounded on the teacher's `SparseBitmap` (sorted-vector set with a
//! deferred-insert buffer): points-to sets at whole-program scale are small
//! relative to the universe of interned object ids, so a sorted `Vec<u32>`
//! beats a dense bitvec on memory, and beats a generic hash set on
//! iteration order (needed for §5's deterministic iteration) and on the
//! cache-friendliness of repeated unions during fixpoint iteration.

use serde::{Deserialize, Serialize};

/// Consolidate pending inserts once they exceed this many entries, so
/// `contains`/`iter` never see an arbitrarily long unsorted tail.
const PENDING_THRESHOLD: usize = 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseBitmap {
    elements: Vec<u32>,
    #[serde(skip)]
    pending: Vec<u32>,
}

impl SparseBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(element: u32) -> Self {
        Self {
            elements: vec![element],
            pending: Vec::new(),
        }
    }

    /// Insert `element`. Returns `true` if it was not already present.
    pub fn insert(&mut self, element: u32) -> bool {
        if self.elements.binary_search(&element).is_ok() {
            return false;
        }
        if self.pending.contains(&element) {
            return false;
        }
        self.pending.push(element);
        if self.pending.len() > PENDING_THRESHOLD {
            self.consolidate();
        }
        true
    }

    fn consolidate(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.elements.append(&mut self.pending);
        self.elements.sort_unstable();
        self.elements.dedup();
    }

    pub fn contains(&self, element: u32) -> bool {
        self.elements.binary_search(&element).is_ok() || self.pending.contains(&element)
    }

    pub fn len(&mut self) -> usize {
        self.consolidate();
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.pending.is_empty()
    }

    /// Deterministic ascending iteration, as required by §5's ordering
    /// guarantees.
    pub fn iter(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.consolidate();
        self.elements.iter().copied()
    }

    /// In-place union. Returns `true` if at least one new member was added
    /// — this is the `changed?` flag the stores (§4.4) rely on.
    pub fn union_with(&mut self, other: &SparseBitmap) -> bool {
        let mut changed = false;
        for &e in &other.elements {
            changed |= self.insert(e);
        }
        for &e in &other.pending {
            changed |= self.insert(e);
        }
        changed
    }

    pub fn is_subset_of(&self, other: &SparseBitmap) -> bool {
        let mut me = self.clone();
        let mut them = other.clone();
        me.consolidate();
        them.consolidate();
        me.elements.iter().all(|e| them.elements.binary_search(e).is_ok())
    }
}

impl PartialEq for SparseBitmap {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.consolidate();
        b.consolidate();
        a.elements == b.elements
    }
}
impl Eq for SparseBitmap {}
