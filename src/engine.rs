//! Engine lifecycle (§5): `plan` → `initialize` → `run` → `results`.
//!
//! A thin orchestration layer over [`crate::solver::Solver`] that adds the
//! budget/cancellation contract and assembles the read-only result view
//! library consumers actually see.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{info, info_span};

use crate::callgraph::CallGraph;
use crate::config::EngineConfig;
use crate::diagnostics::Diagnostic;
use crate::domain::{ContextId, ObjectId, PointsToSet};
use crate::error::{EngineOutcome, FunctionFailure};
use crate::ir::{FunctionId, FunctionIr, IrAdapter, VarId};
use crate::solver::Solver;
use crate::store::CallGraphStore;

/// A handle a driver can use to stop a run in progress from outside the
/// single-threaded solve loop (e.g. a supervisor thread enforcing a
/// wall-clock budget tighter than [`EngineConfig::timeout`]).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Summary counters over one completed run, for logging/observability —
/// never load-bearing for correctness.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub contexts: usize,
    pub abstract_objects: usize,
    pub env_cells: usize,
    pub heap_cells: usize,
    pub call_graph_edges: usize,
    pub constraints_applied: usize,
}

/// The whole-run answer: snapshots of `E`/`H`/`G` plus diagnostics, wrapped
/// so callers query them without reaching into solver internals.
pub struct EngineResults {
    points_to: FxHashMap<(VarId, ContextId), PointsToSet>,
    heap: FxHashMap<(ObjectId, crate::domain::FieldKey), PointsToSet>,
    call_graph: CallGraphStore,
    pub statistics: Statistics,
    pub failed_functions: Vec<FunctionFailure>,
    pub diagnostics: Vec<Diagnostic>,
    /// `true` if the run stopped before reaching a fixpoint (timeout or
    /// cancellation) — the results are a sound under-approximation of the
    /// full fixpoint, not the fixpoint itself (§5, §7).
    pub partial: bool,
}

impl EngineResults {
    /// The points-to set computed for `var` under `ctx`; `∅` if unreached.
    pub fn points_to(&self, var: VarId, ctx: ContextId) -> PointsToSet {
        self.points_to.get(&(var, ctx)).cloned().unwrap_or_default()
    }

    pub fn heap(&self, obj: ObjectId, field: crate::domain::FieldKey) -> PointsToSet {
        self.heap.get(&(obj, field)).cloned().unwrap_or_default()
    }

    pub fn call_graph(&self) -> CallGraph<'_> {
        CallGraph::new(&self.call_graph)
    }
}

/// Drives one [`crate::solver::Solver`] through its four-phase lifecycle.
pub struct Engine<A: IrAdapter> {
    config: EngineConfig,
    solver: Option<Solver<A>>,
    cancel: CancellationToken,
}

impl<A: IrAdapter> Engine<A> {
    pub fn new(adapter: A, config: EngineConfig) -> EngineOutcome<Self> {
        config.validate()?;
        Ok(Self {
            solver: Some(Solver::new(adapter, config.clone())),
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// A clone-able handle to stop this engine's `run()` from another
    /// thread. Cheap; may be called before or during `run()`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Register every function/class/method/builtin the program defines.
    /// Must be called exactly once, before `initialize`.
    pub fn plan(&mut self, functions: Vec<FunctionIr>) {
        let _span = info_span!("plan", count = functions.len()).entered();
        self.solver_mut().plan(functions);
    }

    /// Seed the call worklist with every entry point's root-context frame.
    pub fn initialize(&mut self, entry_points: &[FunctionId]) {
        let _span = info_span!("initialize", entry_points = entry_points.len()).entered();
        self.solver_mut().initialize(entry_points);
    }

    /// Run to a fixpoint, or until the configured timeout / an external
    /// cancellation request interrupts it. Always returns after the
    /// *current* constraint application completes — never mid-apply (§5).
    pub fn run(&mut self) -> bool {
        let _span = info_span!("run").entered();
        let deadline = self.config.timeout.map(|d| Instant::now() + d);
        let mut partial = false;

        loop {
            if self.solver.as_ref().expect("engine used after results()").worklists_empty() {
                break;
            }
            if self.cancel.is_cancelled() {
                partial = true;
                break;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    partial = true;
                    break;
                }
            }
            self.solver.as_mut().expect("engine used after results()").step();
        }

        let solver = self.solver.as_ref().expect("engine used after results()");
        info!(
            constraints = solver.total_constraints(),
            partial, "fixpoint loop finished"
        );
        partial
    }

    /// Consume the engine, returning a snapshot of everything computed.
    /// `partial` must be the value `run()` returned.
    pub fn results(mut self, partial: bool) -> EngineResults {
        let solver = self.solver.take().expect("engine used after results()");
        let points_to = solver
            .env
            .iter()
            .map(|(k, v)| (k, v.clone()))
            .collect::<FxHashMap<_, _>>();
        let heap = solver
            .heap
            .iter()
            .map(|(k, v)| (k, v.clone()))
            .collect::<FxHashMap<_, _>>();
        let statistics = Statistics {
            contexts: solver.interners.contexts.len(),
            abstract_objects: solver.interners.objects.len(),
            env_cells: solver.env.len(),
            heap_cells: solver.heap.len(),
            call_graph_edges: solver.callgraph.total_edges(),
            constraints_applied: solver.total_constraints(),
        };
        EngineResults {
            points_to,
            heap,
            call_graph: solver.callgraph,
            statistics,
            failed_functions: solver.failed_functions,
            diagnostics: solver.diagnostics,
            partial,
        }
    }

    fn solver_mut(&mut self) -> &mut Solver<A> {
        self.solver.as_mut().expect("engine used after results()")
    }
}
