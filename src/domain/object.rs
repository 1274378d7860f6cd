//! Abstract objects and receiver fingerprints (§3, §4.2).

use super::alloc_site::AllocSiteId;
use super::context::ContextId;
use super::intern::{InternId, Interner};

/// An interned, depth-limited digest of a receiver's points-to set.
///
/// `⊥` (bottom) and "the fingerprint built from an empty member list" are
/// the same value: both the depth-0 base case and the edge case of an
/// unresolved (empty) receiver points-to set fall out of interning the
/// empty member vector, so there is exactly one bottom id per
/// [`FingerprintTable`] rather than a special-cased variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerprintId(pub InternId);

/// Interns fingerprints: ordered `(receiver object, its own truncated
/// fingerprint)` member lists.
#[derive(Debug)]
pub struct FingerprintTable {
    entries: Interner<Vec<(ObjectId, FingerprintId)>>,
    bottom: FingerprintId,
}

impl Default for FingerprintTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintTable {
    pub fn new() -> Self {
        let mut entries = Interner::new();
        let bottom = FingerprintId(entries.intern(Vec::new()));
        Self { entries, bottom }
    }

    pub fn bottom(&self) -> FingerprintId {
        self.bottom
    }

    /// Intern a fingerprint from its (already deterministically sorted)
    /// member list.
    pub fn build(&mut self, members: Vec<(ObjectId, FingerprintId)>) -> FingerprintId {
        if members.is_empty() {
            return self.bottom;
        }
        FingerprintId(self.entries.intern(members))
    }

    pub fn members(&self, fp: FingerprintId) -> &[(ObjectId, FingerprintId)] {
        self.entries.resolve(fp.0)
    }
}

/// An interned abstract object: `(alloc_site, alloc_context,
/// receiver_fingerprint)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub InternId);

/// Interns abstract objects.
#[derive(Debug, Default)]
pub struct AbstractObjectTable {
    objects: Interner<(AllocSiteId, ContextId, FingerprintId)>,
}

impl AbstractObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(
        &mut self,
        alloc_site: AllocSiteId,
        context: ContextId,
        fingerprint: FingerprintId,
    ) -> ObjectId {
        ObjectId(self.objects.intern((alloc_site, context, fingerprint)))
    }

    pub fn alloc_site(&self, obj: ObjectId) -> AllocSiteId {
        self.objects.resolve(obj.0).0
    }

    pub fn context(&self, obj: ObjectId) -> ContextId {
        self.objects.resolve(obj.0).1
    }

    pub fn fingerprint(&self, obj: ObjectId) -> FingerprintId {
        self.objects.resolve(obj.0).2
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
