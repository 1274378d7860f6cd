//! Points-to sets (§3, §4.1): finite, immutable-after-construction sets of
//! abstract objects, backed by a [`SparseBitmap`] over interned object ids.

use super::object::ObjectId;
use super::sparse_bitmap::SparseBitmap;
use std::hash::{Hash, Hasher};

/// A finite set of abstract objects. Supports monotone union, membership,
/// size, and deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsToSet {
    members: SparseBitmap,
}

impl PointsToSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(obj: ObjectId) -> Self {
        Self {
            members: SparseBitmap::singleton(obj.0),
        }
    }

    pub fn contains(&self, obj: ObjectId) -> bool {
        self.members.contains(obj.0)
    }

    pub fn len(&mut self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert a single member in place. Returns `true` if it was new.
    pub fn insert(&mut self, obj: ObjectId) -> bool {
        self.members.insert(obj.0)
    }

    /// Monotone join: union `other` into `self` in place, returning
    /// whether any new member was added. This is the `changed?` signal the
    /// stores (§4.4) use to decide whether to re-enqueue dependents.
    pub fn join(&mut self, other: &PointsToSet) -> bool {
        self.members.union_with(&other.members)
    }

    /// Deterministic ascending iteration over member object ids.
    pub fn iter(&mut self) -> impl Iterator<Item = ObjectId> + '_ {
        self.members.iter().map(ObjectId)
    }

    pub fn is_subset_of(&self, other: &PointsToSet) -> bool {
        self.members.is_subset_of(&other.members)
    }
}

impl Hash for PointsToSet {
    /// XOR/commutative combination of member hashes, so the hash does not
    /// depend on insertion order (§4.1).
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut snapshot = self.members.clone();
        let acc = snapshot
            .iter()
            .fold(0u64, |acc, member| acc ^ (member as u64).wrapping_mul(0x9E3779B97F4A7C15));
        state.write_u64(acc);
    }
}
