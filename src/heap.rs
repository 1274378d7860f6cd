//! Heap model (§4.2): constructing the unique abstract object for an
//! allocation under the configured object-sensitivity depth.

use crate::domain::{ContextId, FingerprintId, Interners, ObjectId, PointsToSet};
use crate::domain::AllocSiteId;

/// Build (or look up) the abstract object for an allocation at `alloc_site`
/// in `context`, given the receiver's points-to set (`None` for
/// non-method allocations, e.g. a bare `A()` call at module scope).
///
/// Depth-0 object-sensitivity, an absent receiver, and an unresolved
/// (empty) receiver points-to set all collapse to the same `⊥`
/// fingerprint — the object is then distinguished only by
/// `(alloc_site, context)`, which is sound: it may merge allocations
/// across receivers that a deeper analysis would keep apart.
pub fn construct_object(
    interners: &mut Interners,
    alloc_site: AllocSiteId,
    context: ContextId,
    receiver: Option<PointsToSet>,
    obj_depth: usize,
) -> ObjectId {
    let fingerprint = match receiver {
        Some(mut ptset) if obj_depth > 0 && !ptset.is_empty() => {
            build_fingerprint(&mut ptset, obj_depth, interners)
        }
        _ => interners.fingerprints.bottom(),
    };
    interners.objects.intern(alloc_site, context, fingerprint)
}

/// Build the depth-`depth` fingerprint of a receiver points-to set: the
/// ordered tuple of receiver object ids (ascending — [`PointsToSet::iter`]
/// already yields them in that order) paired with each receiver's own
/// fingerprint, truncated to `depth - 1`.
fn build_fingerprint(
    receiver: &mut PointsToSet,
    depth: usize,
    interners: &mut Interners,
) -> FingerprintId {
    if depth == 0 {
        return interners.fingerprints.bottom();
    }
    let members: Vec<ObjectId> = receiver.iter().collect();
    let mut entries = Vec::with_capacity(members.len());
    for obj in members {
        let own_fp = interners.objects.fingerprint(obj);
        let truncated = truncate_fingerprint(own_fp, depth - 1, interners);
        entries.push((obj, truncated));
    }
    interners.fingerprints.build(entries)
}

/// Re-intern `fp` with its nesting capped at `depth`: at `depth == 0` every
/// member is dropped (the fingerprint collapses to `⊥`); otherwise each
/// member's own sub-fingerprint is recursively truncated to `depth - 1`.
fn truncate_fingerprint(
    fp: FingerprintId,
    depth: usize,
    interners: &mut Interners,
) -> FingerprintId {
    if depth == 0 {
        return interners.fingerprints.bottom();
    }
    let members = interners.fingerprints.members(fp).to_vec();
    if members.is_empty() {
        return fp;
    }
    let mut truncated = Vec::with_capacity(members.len());
    for (obj, sub_fp) in members {
        truncated.push((obj, truncate_fingerprint(sub_fp, depth - 1, interners)));
    }
    interners.fingerprints.build(truncated)
}
