//! Context manager (§4.3): k-limited call-string contexts, interned.
//!
//! A context is the call-string that reached a program point, truncated to
//! its rightmost `k` call sites. Truncating from the left (dropping the
//! oldest site) is what keeps recursion from inflating the context space —
//! grounded on the teacher's `Context::push`, which trims `elements[0]`
//! once the sequence exceeds `max_depth`.

use super::alloc_site::CallSiteId;
use super::intern::{InternId, Interner};

/// An interned call-string. `Copy`; compare by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub InternId);

/// Interns call-string sequences and hands out [`ContextId`]s.
#[derive(Debug)]
pub struct ContextTable {
    sequences: Interner<Vec<CallSiteId>>,
    root: ContextId,
}

impl Default for ContextTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextTable {
    pub fn new() -> Self {
        let mut sequences = Interner::new();
        let root = ContextId(sequences.intern(Vec::new()));
        Self { sequences, root }
    }

    /// The empty call string — the context of every top-level entry point,
    /// and the only context that exists when `k = 0`.
    pub fn root(&self) -> ContextId {
        self.root
    }

    /// `callee_context = truncate_right(caller_context ++ [call_site], k)`.
    pub fn push(&mut self, caller: ContextId, call_site: CallSiteId, k: usize) -> ContextId {
        let mut seq = self.sequences.resolve(caller.0).clone();
        seq.push(call_site);
        if seq.len() > k {
            seq.remove(0);
        }
        ContextId(self.sequences.intern(seq))
    }

    pub fn sequence(&self, ctx: ContextId) -> &[CallSiteId] {
        self.sequences.resolve(ctx.0)
    }

    pub fn depth(&self, ctx: ContextId) -> usize {
        self.sequence(ctx).len()
    }

    /// Number of distinct contexts created so far — used to check P3
    /// (k-finiteness) against `(|call-sites| + 1)^k`.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }
}
