//! Structured diagnostics (§6), surfaced on [`crate::engine::EngineResults`]
//! in addition to being emitted as `tracing::warn!` spans — so library
//! consumers without a subscriber installed still see them.

use crate::domain::{AllocSiteId, CallSiteId, ContextId};
use crate::ir::FunctionId;

#[derive(Debug, Clone)]
pub enum Diagnostic {
    /// An allocation or call site had no stable source position; the
    /// deterministic-hash fallback id was used instead.
    MissingPosition { function: FunctionId, fallback_label: String },
    /// A call site has no resolvable callee yet and was parked (§4.6.1).
    /// Not necessarily a defect — resolution may still complete once the
    /// callee expression's points-to set grows.
    ParkedCall {
        caller_ctx: ContextId,
        call_site: CallSiteId,
    },
    /// Missing/extra arguments at a call site relative to the callee's
    /// parameter signature; binding proceeded with what it could (§4.6.1).
    ArityMismatch {
        call_site: CallSiteId,
        expected: usize,
        provided: usize,
    },
    /// Widening collapsed abstract objects of one kind at `site` to a
    /// single representative because the heap store exceeded
    /// `max_heap_widening` (§4.6.2, §5).
    Widening { site: AllocSiteId, heap_store_size: usize },
}
