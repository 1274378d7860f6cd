//! Call-graph adapter (§4.7): a read-only query surface over `G`. Edges are
//! produced only by the solver; this wrapper never exposes a mutation path.

use crate::domain::{CallSiteId, ContextId};
use crate::ir::FunctionId;
use crate::store::CallGraphStore;
use rustc_hash::FxHashMap;

pub struct CallGraph<'a> {
    store: &'a CallGraphStore,
}

impl<'a> CallGraph<'a> {
    pub fn new(store: &'a CallGraphStore) -> Self {
        Self { store }
    }

    /// Callees reachable from `caller_ctx` at `call_site`.
    pub fn callees_at(
        &self,
        caller_ctx: ContextId,
        call_site: CallSiteId,
    ) -> Vec<(ContextId, FunctionId)> {
        self.store.edges_at(caller_ctx, call_site).collect()
    }

    /// All callers of `callee`, across every context it was reached in.
    pub fn callers_of(&self, callee: FunctionId) -> Vec<(ContextId, CallSiteId, ContextId)> {
        let mut result = Vec::new();
        for ((caller_ctx, call_site), edges) in self.store.iter() {
            for (callee_ctx, fn_id) in edges {
                if *fn_id == callee {
                    result.push((caller_ctx, call_site, *callee_ctx));
                }
            }
        }
        result
    }

    /// Out-degree (number of distinct resolved callees) of every call site
    /// that has at least one edge, keyed by `(caller context, call site)`.
    pub fn polymorphism_counts(&self) -> FxHashMap<(ContextId, CallSiteId), usize> {
        self.store
            .iter()
            .map(|(key, edges)| (key, edges.len()))
            .collect()
    }

    pub fn total_edges(&self) -> usize {
        self.store.total_edges()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
