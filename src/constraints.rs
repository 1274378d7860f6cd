//! Constraint data model (§4.6).
//!
//! A constraint is a concrete, already-context-bound fact: "this cell must
//! contain at least what that cell contains". Constraints are held in an
//! arena (`Vec`, indexed by [`ConstraintId`]) rather than behind pointers,
//! per the cycle-avoidance note in §9 — the constraint graph is inherently
//! cyclic, so ownership is index-based, never a graph of `Rc`/`RefCell`.

use crate::domain::{AttrNameId, CallSiteId, ContextId, FieldKey, ObjectId};
use crate::ir::VarId;
use rustc_hash::FxHashSet;

/// A store cell: one addressable slot in `E` or `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Env(VarId, ContextId),
    Heap(ObjectId, FieldKey),
}

pub type ConstraintId = usize;

/// A resolved call, awaiting (or re-awaiting) callee resolution.
#[derive(Debug, Clone)]
pub struct CallConstraint {
    pub call_site: CallSiteId,
    pub caller_ctx: ContextId,
    pub callee_expr: VarId,
    pub receiver: Option<VarId>,
    pub positional: Vec<VarId>,
    pub keyword: Vec<(String, VarId)>,
    pub target: Option<VarId>,
}

/// The constraint rules of §4.6, instantiated within one context.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// R-alloc (and R-import, which precomputes its canonical object the
    /// same way): `pt(target, c) ⊇ { object }`.
    Alloc {
        target: (VarId, ContextId),
        object: ObjectId,
    },
    /// R-copy (also used for R-ret's latent constraint, and for `return`/
    /// `raise`/`catch` events, all of which are copies into or out of a
    /// designated per-function variable): `pt(target, c) ⊇ pt(source, c)`.
    Copy {
        target: (VarId, ContextId),
        source: (VarId, ContextId),
    },
    /// R-ldA: `pt(target, c) ⊇ ⋃_{o ∈ pt(base, c)} heap(o, name)`. When
    /// `name` is `None` the field is dynamically named (Rule I5): the
    /// solver additionally unions `heap(o, unknown)` and every concrete
    /// `attr(*)` key currently present for `o`.
    LoadAttr {
        target: (VarId, ContextId),
        base: (VarId, ContextId),
        name: Option<AttrNameId>,
    },
    /// R-stA: `∀o ∈ pt(base, c): heap(o, name) ⊇ pt(source, c)`, plus the
    /// Rule-I5 `unknown` join when `name` is `None`.
    StoreAttr {
        base: (VarId, ContextId),
        name: Option<AttrNameId>,
        source: (VarId, ContextId),
    },
    /// R-ldS: `pt(target, c) ⊇ ⋃_{o ∈ pt(base, c)} heap(o, field)`, with
    /// `field` already resolved to `elem`/`value` by the container table.
    LoadField {
        target: (VarId, ContextId),
        base: (VarId, ContextId),
        field: FieldKey,
    },
    /// R-stS, symmetric to `LoadField`.
    StoreField {
        base: (VarId, ContextId),
        field: FieldKey,
        source: (VarId, ContextId),
    },
    /// R-phi: `pt(target, c) ⊇ ⋃ pt(source_i, c)`.
    Phi {
        target: (VarId, ContextId),
        sources: Vec<(VarId, ContextId)>,
    },
    /// R-call (§4.6.1).
    Call(CallConstraint),
}

/// A constraint plus the bookkeeping its re-application needs: which
/// objects it has already subscribed heap-cell dependencies for (field
/// constraints), or already resolved into call-graph edges (call
/// constraints). Empty for constraints that never need it (Alloc, Copy,
/// Phi apply exactly once and never re-scan a growing points-to set).
#[derive(Debug, Clone)]
pub struct ConstraintRecord {
    pub constraint: Constraint,
    pub tracked: FxHashSet<ObjectId>,
}

impl ConstraintRecord {
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            tracked: FxHashSet::default(),
        }
    }
}

/// Arena of constraints, indexed by [`ConstraintId`] — the "never a
/// reference cycle" representation Design Note §9 calls for.
#[derive(Debug, Default)]
pub struct ConstraintArena {
    records: Vec<ConstraintRecord>,
}

impl ConstraintArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) -> ConstraintId {
        let id = self.records.len();
        self.records.push(ConstraintRecord::new(constraint));
        id
    }

    pub fn get(&self, id: ConstraintId) -> &ConstraintRecord {
        &self.records[id]
    }

    pub fn get_mut(&mut self, id: ConstraintId) -> &mut ConstraintRecord {
        &mut self.records[id]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
