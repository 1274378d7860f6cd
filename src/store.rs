//! Environment, heap, and call-graph stores (§3, §4.4): monotone maps that
//! only ever grow over the course of one solver run.

use crate::domain::{ContextId, FieldKey, ObjectId, PointsToSet};
use crate::ir::{FunctionId, VarId};
use rustc_hash::{FxHashMap, FxHashSet};

/// `E`: `(variable, context) -> points-to set`. Unknown keys behave as `∅`.
#[derive(Debug, Default)]
pub struct EnvStore {
    map: FxHashMap<(VarId, ContextId), PointsToSet>,
}

impl EnvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: VarId, ctx: ContextId) -> PointsToSet {
        self.map.get(&(var, ctx)).cloned().unwrap_or_default()
    }

    /// Join `addition` into the cell for `(var, ctx)`. Returns `true` if at
    /// least one new member was added — the solver's `changed?` signal.
    pub fn join(&mut self, var: VarId, ctx: ContextId, addition: &PointsToSet) -> bool {
        self.map.entry((var, ctx)).or_default().join(addition)
    }

    pub fn iter(&self) -> impl Iterator<Item = ((VarId, ContextId), &PointsToSet)> {
        let mut keys: Vec<_> = self.map.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(move |k| (k, &self.map[&k]))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// `H`: `(abstract object, field key) -> points-to set`.
#[derive(Debug, Default)]
pub struct HeapStore {
    map: FxHashMap<(ObjectId, FieldKey), PointsToSet>,
}

impl HeapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, obj: ObjectId, field: FieldKey) -> PointsToSet {
        self.map.get(&(obj, field)).cloned().unwrap_or_default()
    }

    pub fn join(&mut self, obj: ObjectId, field: FieldKey, addition: &PointsToSet) -> bool {
        self.map.entry((obj, field)).or_default().join(addition)
    }

    /// All field keys populated on `obj` so far — needed by R-ldA's
    /// unknown-name join (Rule I5): every concrete `attr(*)` key present
    /// for `obj` must be unioned in alongside `unknown`.
    pub fn fields_of(&self, obj: ObjectId) -> Vec<FieldKey> {
        let mut keys: Vec<FieldKey> = self
            .map
            .keys()
            .filter(|(o, _)| *o == obj)
            .map(|(_, f)| *f)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = ((ObjectId, FieldKey), &PointsToSet)> {
        let mut keys: Vec<_> = self.map.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(move |k| (k, &self.map[&k]))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// `G`: `(caller context, call site) -> {(callee context, callee function)}`.
/// Populated only by the solver; external code may only query it (§4.7).
#[derive(Debug, Default)]
pub struct CallGraphStore {
    map: FxHashMap<(ContextId, crate::domain::CallSiteId), FxHashSet<(ContextId, FunctionId)>>,
}

impl CallGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge. Returns `true` if it was not already present.
    pub fn add_edge(
        &mut self,
        caller_ctx: ContextId,
        call_site: crate::domain::CallSiteId,
        callee_ctx: ContextId,
        callee: FunctionId,
    ) -> bool {
        self.map
            .entry((caller_ctx, call_site))
            .or_default()
            .insert((callee_ctx, callee))
    }

    pub fn edges_at(
        &self,
        caller_ctx: ContextId,
        call_site: crate::domain::CallSiteId,
    ) -> impl Iterator<Item = (ContextId, FunctionId)> + '_ {
        self.map
            .get(&(caller_ctx, call_site))
            .into_iter()
            .flatten()
            .copied()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = ((ContextId, crate::domain::CallSiteId), &FxHashSet<(ContextId, FunctionId)>)>
    {
        let mut keys: Vec<_> = self.map.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(move |k| (k, &self.map[&k]))
    }

    /// Total edge count, summed per call site — kept as a standalone
    /// computation (rather than a running counter) so Q2's invariant
    /// (`G.total_edges = Σ per-site edges`) is an assertable identity, not
    /// an assumption.
    pub fn total_edges(&self) -> usize {
        self.map.values().map(|edges| edges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
