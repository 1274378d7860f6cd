//! Constraint generator & solver (§4.6): translates IR events into
//! constraints within a context, and runs the two-worklist fixpoint loop
//! that applies them to `E`, `H`, and `G`.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::constraints::{CallConstraint, Cell, Constraint, ConstraintArena, ConstraintId};
use crate::diagnostics::Diagnostic;
use crate::domain::{
    AllocSiteId, AllocSiteKind, CallSiteId, ContextId, FieldKey, Interners, ObjectId, PointsToSet,
};
use crate::error::FunctionFailure;
use crate::heap;
use crate::ir::{CalleeKind, FunctionId, FunctionIr, IrAdapter, IrEvent, ParameterPolicy, SiteRef, VarId};
use crate::store::{CallGraphStore, EnvStore, HeapStore};

/// What a resolved callee abstract object actually is (Design Note §9's
/// tagged variant, minus `Unresolved` — that's the absence of a registry
/// entry, not a variant of it).
#[derive(Debug, Clone)]
pub enum CalleeDescriptor {
    Function {
        function: FunctionId,
        params: ParameterPolicy,
        return_var: Option<VarId>,
    },
    Method {
        function: FunctionId,
        params: ParameterPolicy,
        return_var: Option<VarId>,
    },
    Class {
        constructor: FunctionId,
        params: ParameterPolicy,
        return_var: Option<VarId>,
        instance_site: AllocSiteId,
    },
    Builtin {
        name: String,
    },
}

/// The whole mutable solver state: stores, intern tables, constraint
/// arena, dependency adjacency list, and the two worklists.
pub struct Solver<A: IrAdapter> {
    adapter: A,
    config: EngineConfig,

    pub interners: Interners,
    pub env: EnvStore,
    pub heap: HeapStore,
    pub callgraph: CallGraphStore,
    arena: ConstraintArena,
    dependents: FxHashMap<Cell, Vec<ConstraintId>>,

    functions: FxHashMap<FunctionId, FunctionIr>,
    callee_registry: FxHashMap<AllocSiteId, CalleeDescriptor>,
    representative_object: FxHashMap<AllocSiteId, ObjectId>,

    cw: VecDeque<(FunctionId, ContextId)>,
    expanded: FxHashSet<(FunctionId, ContextId)>,
    xw: VecDeque<ConstraintId>,
    queued: FxHashSet<ConstraintId>,

    pub diagnostics: Vec<Diagnostic>,
    pub failed_functions: Vec<FunctionFailure>,
}

impl<A: IrAdapter> Solver<A> {
    pub fn new(adapter: A, config: EngineConfig) -> Self {
        Self {
            adapter,
            config,
            interners: Interners::new(),
            env: EnvStore::new(),
            heap: HeapStore::new(),
            callgraph: CallGraphStore::new(),
            arena: ConstraintArena::new(),
            dependents: FxHashMap::default(),
            functions: FxHashMap::default(),
            callee_registry: FxHashMap::default(),
            representative_object: FxHashMap::default(),
            cw: VecDeque::new(),
            expanded: FxHashSet::default(),
            xw: VecDeque::new(),
            queued: FxHashSet::default(),
            diagnostics: Vec::new(),
            failed_functions: Vec::new(),
        }
    }

    // ── plan() ──────────────────────────────────────────────────────────

    /// Register every function/class/method/builtin, interning each
    /// definition site and building the callee registry §4.6.1 resolves
    /// callees through.
    pub fn plan(&mut self, functions: Vec<FunctionIr>) {
        for fn_ir in functions {
            let site_kind = match &fn_ir.kind {
                CalleeKind::Function | CalleeKind::Builtin { .. } => AllocSiteKind::Func,
                CalleeKind::Method => AllocSiteKind::Method,
                CalleeKind::Class { .. } => AllocSiteKind::Class,
            };
            let site = self.intern_site_tracked(fn_ir.function, &fn_ir.definition_site, site_kind);

            let descriptor = match &fn_ir.kind {
                CalleeKind::Function => CalleeDescriptor::Function {
                    function: fn_ir.function,
                    params: fn_ir.params.clone(),
                    return_var: fn_ir.return_var,
                },
                CalleeKind::Method => CalleeDescriptor::Method {
                    function: fn_ir.function,
                    params: fn_ir.params.clone(),
                    return_var: fn_ir.return_var,
                },
                CalleeKind::Class { instance_site } => {
                    let instance_site =
                        self.intern_site_tracked(fn_ir.function, instance_site, AllocSiteKind::Obj);
                    CalleeDescriptor::Class {
                        constructor: fn_ir.function,
                        params: fn_ir.params.clone(),
                        return_var: fn_ir.return_var,
                        instance_site,
                    }
                }
                CalleeKind::Builtin { name } => CalleeDescriptor::Builtin { name: name.clone() },
            };

            self.callee_registry.insert(site, descriptor);
            self.functions.insert(fn_ir.function, fn_ir);
        }
    }

    // ── initialize() ────────────────────────────────────────────────────

    /// Push every entry point's root-context frame onto the call worklist.
    pub fn initialize(&mut self, entry_points: &[FunctionId]) {
        let root = self.interners.contexts.root();
        for &f in entry_points {
            self.cw.push_back((f, root));
        }
    }

    pub fn worklists_empty(&self) -> bool {
        self.cw.is_empty() && self.xw.is_empty()
    }

    // ── run() ────────────────────────────────────────────────────────────

    /// Run one call-worklist item (if any) or one constraint-worklist item
    /// (if the call worklist is empty), i.e. one unit of the main loop
    /// from §4.6.2 fine-grained enough that the engine can check a
    /// cancellation token/deadline between units.
    pub fn step(&mut self) {
        if let Some((f, c)) = self.cw.pop_front() {
            self.expand(f, c);
        } else if let Some(id) = self.xw.pop_front() {
            self.queued.remove(&id);
            self.reapply(id);
        }
    }

    // ── event → constraint generation ───────────────────────────────────

    fn expand(&mut self, function: FunctionId, ctx: ContextId) {
        if !self.expanded.insert((function, ctx)) {
            return;
        }
        debug!(function, ctx = ctx.0, "expanding function under context");

        let meta = match self.functions.get(&function) {
            Some(m) => m.clone(),
            None => {
                self.failed_functions.push(FunctionFailure {
                    function: function.to_string(),
                    reason: "function not registered with plan()".to_string(),
                });
                return;
            }
        };

        let events: Vec<IrEvent> = self.adapter.events(function).collect();
        for event in events {
            if let Err(reason) = self.generate(&meta, ctx, event) {
                self.failed_functions.push(FunctionFailure {
                    function: function.to_string(),
                    reason,
                });
                return;
            }
        }
    }

    fn generate(&mut self, meta: &FunctionIr, ctx: ContextId, event: IrEvent) -> Result<(), String> {
        match event {
            IrEvent::Alloc { target, kind, site } => {
                let site_id = self.intern_site_tracked(meta.function, &site, kind);
                let receiver = self.current_receiver(meta, ctx);
                let object = self.construct_object(site_id, ctx, receiver);
                self.add_constraint(Constraint::Alloc {
                    target: (target, ctx),
                    object,
                });
            }
            IrEvent::Copy { target, source } => {
                self.add_constraint(Constraint::Copy {
                    target: (target, ctx),
                    source: (source, ctx),
                });
            }
            IrEvent::LoadAttr { target, base, attr } => {
                let name = attr.map(|n| self.interners.attr_names.intern(n));
                self.add_constraint(Constraint::LoadAttr {
                    target: (target, ctx),
                    base: (base, ctx),
                    name,
                });
            }
            IrEvent::StoreAttr { base, attr, source } => {
                let name = attr.map(|n| self.interners.attr_names.intern(n));
                self.add_constraint(Constraint::StoreAttr {
                    base: (base, ctx),
                    name,
                    source: (source, ctx),
                });
            }
            IrEvent::LoadSubscr { target, base, container_kind } => {
                let field = self.config.containers.field_for(container_kind);
                self.add_constraint(Constraint::LoadField {
                    target: (target, ctx),
                    base: (base, ctx),
                    field,
                });
            }
            IrEvent::StoreSubscr { base, container_kind, source } => {
                let field = self.config.containers.field_for(container_kind);
                self.add_constraint(Constraint::StoreField {
                    base: (base, ctx),
                    field,
                    source: (source, ctx),
                });
            }
            IrEvent::Phi { target, sources } => {
                self.add_constraint(Constraint::Phi {
                    target: (target, ctx),
                    sources: sources.into_iter().map(|s| (s, ctx)).collect(),
                });
            }
            IrEvent::Import { target, module_name } => {
                let site = self.interners.alloc_sites.fallback(
                    "<module>",
                    "import",
                    &module_name,
                    AllocSiteKind::Module,
                );
                let label = self.interners.alloc_sites.label(site).to_string();
                self.diagnostics.push(Diagnostic::MissingPosition {
                    function: meta.function,
                    fallback_label: label,
                });
                let root = self.interners.contexts.root();
                let object = self.construct_object(site, root, None);
                self.add_constraint(Constraint::Alloc {
                    target: (target, ctx),
                    object,
                });
            }
            IrEvent::Return { source } => {
                if let (Some(rv), Some(src)) = (meta.return_var, source) {
                    self.add_constraint(Constraint::Copy {
                        target: (rv, ctx),
                        source: (src, ctx),
                    });
                }
            }
            IrEvent::Raise { source } => {
                if let Some(rv) = meta.raised_var {
                    self.add_constraint(Constraint::Copy {
                        target: (rv, ctx),
                        source: (source, ctx),
                    });
                }
            }
            IrEvent::Catch { target } => {
                if let Some(rv) = meta.raised_var {
                    self.add_constraint(Constraint::Copy {
                        target: (target, ctx),
                        source: (rv, ctx),
                    });
                }
            }
            IrEvent::Call {
                call_site,
                callee_expr,
                receiver,
                positional,
                keyword,
                target,
            } => {
                let call_site_id = self.intern_call_site_tracked(meta.function, &call_site);
                self.add_constraint(Constraint::Call(CallConstraint {
                    call_site: call_site_id,
                    caller_ctx: ctx,
                    callee_expr,
                    receiver,
                    positional,
                    keyword,
                    target,
                }));
            }
        }
        Ok(())
    }

    // ── constraint arena / dependency bookkeeping ───────────────────────

    pub(crate) fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let id = self.arena.push(constraint.clone());
        for cell in static_reads(&constraint) {
            self.dependents.entry(cell).or_default().push(id);
        }
        let written = self.apply(id);
        self.notify(written, id);
        id
    }

    fn reapply(&mut self, id: ConstraintId) {
        let written = self.apply(id);
        self.notify(written, id);
    }

    fn notify(&mut self, written: Vec<Cell>, from: ConstraintId) {
        for cell in written {
            let Some(ids) = self.dependents.get(&cell) else { continue };
            let ids = ids.clone();
            for dep in ids {
                if dep == from {
                    continue;
                }
                if self.queued.insert(dep) {
                    self.xw.push_back(dep);
                }
            }
        }
    }

    /// Apply one constraint, returning the cells that grew as a result.
    fn apply(&mut self, id: ConstraintId) -> Vec<Cell> {
        let constraint = self.arena.get(id).constraint.clone();
        match constraint {
            Constraint::Alloc { target, object } => {
                let mut pt = PointsToSet::empty();
                pt.insert(object);
                if self.env.join(target.0, target.1, &pt) {
                    vec![Cell::Env(target.0, target.1)]
                } else {
                    vec![]
                }
            }
            Constraint::Copy { target, source } => {
                let src = self.env.get(source.0, source.1);
                if self.env.join(target.0, target.1, &src) {
                    vec![Cell::Env(target.0, target.1)]
                } else {
                    vec![]
                }
            }
            Constraint::LoadAttr { target, base, name } => self.apply_load(id, target, base, name.map(FieldKey::Attr), name.is_none()),
            Constraint::LoadField { target, base, field } => self.apply_load(id, target, base, Some(field), false),
            Constraint::StoreAttr { base, name, source } => {
                self.apply_store(id, base, name.map(FieldKey::Attr), name.is_none(), source)
            }
            Constraint::StoreField { base, field, source } => {
                self.apply_store(id, base, Some(field), false, source)
            }
            Constraint::Phi { target, sources } => {
                let mut changed = false;
                for source in sources {
                    let src = self.env.get(source.0, source.1);
                    changed |= self.env.join(target.0, target.1, &src);
                }
                if changed {
                    vec![Cell::Env(target.0, target.1)]
                } else {
                    vec![]
                }
            }
            Constraint::Call(call) => {
                self.apply_call(id, call);
                vec![]
            }
        }
    }

    fn apply_load(
        &mut self,
        id: ConstraintId,
        target: (VarId, ContextId),
        base: (VarId, ContextId),
        field: Option<FieldKey>,
        unknown_join: bool,
    ) -> Vec<Cell> {
        let mut base_pt = self.env.get(base.0, base.1);
        let objects: Vec<ObjectId> = base_pt.iter().collect();
        let mut changed = false;
        for obj in objects {
            if self.arena.get_mut(id).tracked.insert(obj) {
                if let Some(f) = field {
                    self.dependents.entry(Cell::Heap(obj, f)).or_default().push(id);
                }
                if unknown_join {
                    self.dependents.entry(Cell::Heap(obj, FieldKey::Unknown)).or_default().push(id);
                }
            }
            if let Some(f) = field {
                let pt = self.heap.get(obj, f);
                changed |= self.env.join(target.0, target.1, &pt);
            }
            if unknown_join {
                let unk = self.heap.get(obj, FieldKey::Unknown);
                changed |= self.env.join(target.0, target.1, &unk);
                for concrete in self.heap.fields_of(obj) {
                    if concrete.is_attr() {
                        let pt = self.heap.get(obj, concrete);
                        changed |= self.env.join(target.0, target.1, &pt);
                    }
                }
            }
        }
        if changed {
            vec![Cell::Env(target.0, target.1)]
        } else {
            vec![]
        }
    }

    fn apply_store(
        &mut self,
        id: ConstraintId,
        base: (VarId, ContextId),
        field: Option<FieldKey>,
        unknown_join: bool,
        source: (VarId, ContextId),
    ) -> Vec<Cell> {
        let mut base_pt = self.env.get(base.0, base.1);
        let objects: Vec<ObjectId> = base_pt.iter().collect();
        let src_pt = self.env.get(source.0, source.1);
        let mut written = Vec::new();
        for obj in objects {
            self.arena.get_mut(id).tracked.insert(obj);
            if let Some(f) = field {
                if self.heap.join(obj, f, &src_pt) {
                    written.push(Cell::Heap(obj, f));
                }
            }
            if unknown_join && self.heap.join(obj, FieldKey::Unknown, &src_pt) {
                written.push(Cell::Heap(obj, FieldKey::Unknown));
            }
        }
        written
    }

    fn apply_call(&mut self, id: ConstraintId, call: CallConstraint) {
        let mut cexpr_pt = self.env.get(call.callee_expr, call.caller_ctx);
        let candidates: Vec<ObjectId> = cexpr_pt.iter().collect();
        let mut new_objects: Vec<ObjectId> = Vec::new();
        {
            let record = self.arena.get_mut(id);
            for obj in candidates {
                if record.tracked.insert(obj) {
                    new_objects.push(obj);
                }
            }
        }
        if new_objects.is_empty() && cexpr_pt.is_empty() {
            self.diagnostics.push(Diagnostic::ParkedCall {
                caller_ctx: call.caller_ctx,
                call_site: call.call_site,
            });
            return;
        }
        // Deterministic order: by interned object id (§4.6.1's tie-break).
        new_objects.sort_unstable_by_key(|o| o.0);
        for obj in new_objects {
            self.resolve_one_callee(&call, obj);
        }
    }

    fn resolve_one_callee(&mut self, call: &CallConstraint, callee_obj: ObjectId) {
        let site = self.interners.objects.alloc_site(callee_obj);
        let Some(descriptor) = self.callee_registry.get(&site).cloned() else {
            // Not a function/class/method/builtin-kinded object: ignored
            // for edge construction, but the call stays parked against
            // future growth of pt(cexpr) (§4.6.1).
            return;
        };

        // A bound method dispatches through its receiver as much as through
        // its call string — two distinct receivers reaching the very same
        // call site under the same caller context must not collapse onto
        // one callee context, or `obj_depth`'s receiver-sensitivity (§3,
        // §4.2) would never be visible past this point: the callee's own
        // `self` binding, and every allocation its body performs, lives at
        // `(.., callee_ctx)`. Fold the receiver's points-to set into the
        // call site used for context derivation, so each distinct receiver
        // earns its own context exactly when `obj_depth` says it should.
        let receiver_pt = match &descriptor {
            CalleeDescriptor::Method { .. } => call.receiver.map(|r| self.env.get(r, call.caller_ctx)),
            _ => None,
        };
        let ctx_call_site = match &receiver_pt {
            Some(pt) if self.config.obj_depth > 0 && !pt.is_empty() => self
                .interners
                .call_sites
                .fallback("<receiver>", (call.call_site, pt.clone())),
            _ => call.call_site,
        };
        let callee_ctx = self.interners.contexts.push(call.caller_ctx, ctx_call_site, self.config.k);

        let (callee_fn, params, return_var, bound_first_param) = match descriptor {
            CalleeDescriptor::Function { function, params, return_var } => {
                (function, params, return_var, None)
            }
            CalleeDescriptor::Method { function, params, return_var } => {
                (function, params, return_var, Some(receiver_pt.unwrap_or_default()))
            }
            CalleeDescriptor::Class { constructor, params, return_var, instance_site } => {
                let self_obj = self.construct_object(instance_site, callee_ctx, None);
                let mut pt = PointsToSet::empty();
                pt.insert(self_obj);
                (constructor, params, return_var, Some(pt))
            }
            CalleeDescriptor::Builtin { name } => {
                crate::summaries::apply_builtin(self, call, &name);
                return;
            }
        };

        // Bind the receiver/`self` into the callee's first declared
        // positional parameter, then shift explicit call arguments past it
        // (§4.6.1).
        if let (Some(&self_param), Some(pt)) = (params.positional.first(), bound_first_param.as_ref()) {
            self.env.join(self_param, callee_ctx, pt);
        }
        let skip = usize::from(bound_first_param.is_some());
        let args: Vec<VarId> = call.positional.clone();
        let positional_params: Vec<VarId> = params.positional.iter().skip(skip).copied().collect();

        for (i, &arg) in args.iter().enumerate() {
            if let Some(&param) = positional_params.get(i) {
                self.add_constraint(Constraint::Copy {
                    target: (param, callee_ctx),
                    source: (arg, call.caller_ctx),
                });
            } else if let Some(varargs) = params.varargs {
                // bind extras to the synthetic *args tuple's elem field via
                // a persistent constraint, so later growth of `arg`'s
                // points-to set still propagates (§4.6.1).
                let site = self.interners.alloc_sites.fallback(
                    "<synthetic>",
                    "varargs",
                    (call.call_site.0, callee_ctx.0),
                    AllocSiteKind::Tuple,
                );
                let args_obj = self.construct_object(site, callee_ctx, None);
                let mut pt = PointsToSet::empty();
                pt.insert(args_obj);
                self.env.join(varargs, callee_ctx, &pt);
                self.add_constraint(Constraint::StoreField {
                    base: (varargs, callee_ctx),
                    field: FieldKey::Elem,
                    source: (arg, call.caller_ctx),
                });
            } else {
                self.diagnostics.push(Diagnostic::ArityMismatch {
                    call_site: call.call_site,
                    expected: positional_params.len(),
                    provided: args.len(),
                });
            }
        }
        if args.len() < positional_params.len() {
            // Some declared positional parameters are simply never bound;
            // those cells stay `∅`, which is sound but still worth a
            // diagnostic alongside the too-many-arguments case above.
            self.diagnostics.push(Diagnostic::ArityMismatch {
                call_site: call.call_site,
                expected: positional_params.len(),
                provided: args.len(),
            });
        }

        for (name, arg) in &call.keyword {
            if let Some(&param) = params.keyword_only.iter().find(|(n, _)| n == name).map(|(_, v)| v).as_ref() {
                self.add_constraint(Constraint::Copy {
                    target: (*param, callee_ctx),
                    source: (*arg, call.caller_ctx),
                });
            } else if let Some(kwargs) = params.kwargs {
                let site = self.interners.alloc_sites.fallback(
                    "<synthetic>",
                    "kwargs",
                    (call.call_site.0, callee_ctx.0),
                    AllocSiteKind::Dict,
                );
                let kwargs_obj = self.construct_object(site, callee_ctx, None);
                let mut pt = PointsToSet::empty();
                pt.insert(kwargs_obj);
                self.env.join(kwargs, callee_ctx, &pt);
                self.add_constraint(Constraint::StoreField {
                    base: (kwargs, callee_ctx),
                    field: FieldKey::Value,
                    source: (*arg, call.caller_ctx),
                });
            }
        }

        self.callgraph.add_edge(call.caller_ctx, call.call_site, callee_ctx, callee_fn);
        trace!(
            caller_fn_site = site.0,
            callee = callee_fn,
            ctx = callee_ctx.0,
            "resolved call edge"
        );
        if !self.expanded.contains(&(callee_fn, callee_ctx)) {
            self.cw.push_back((callee_fn, callee_ctx));
        }

        if let (Some(t), Some(rv)) = (call.target, return_var) {
            self.add_constraint(Constraint::Copy {
                target: (t, call.caller_ctx),
                source: (rv, callee_ctx),
            });
        }
    }

    /// Construct (or reuse the widened representative for) the abstract
    /// object at `site` under `ctx` with the given receiver points-to set.
    pub(crate) fn construct_object(
        &mut self,
        site: AllocSiteId,
        ctx: ContextId,
        receiver: Option<PointsToSet>,
    ) -> ObjectId {
        if let Some(&rep) = self.representative_object.get(&site) {
            return rep;
        }
        let object = heap::construct_object(&mut self.interners, site, ctx, receiver, self.config.obj_depth);
        if let Some(max) = self.config.max_heap_widening {
            if self.heap.len() >= max {
                self.representative_object.insert(site, object);
                warn!(site = site.0, heap_size = self.heap.len(), "widening triggered");
                self.diagnostics.push(Diagnostic::Widening {
                    site,
                    heap_store_size: self.heap.len(),
                });
            }
        }
        object
    }

    pub fn total_constraints(&self) -> usize {
        self.arena.len()
    }

    /// Intern an allocation site, recording a [`Diagnostic::MissingPosition`]
    /// whenever the front end had no source position to give it (§6).
    fn intern_site_tracked(&mut self, function: FunctionId, site: &SiteRef, kind: AllocSiteKind) -> AllocSiteId {
        let id = intern_site(&mut self.interners, site, kind);
        if matches!(site, SiteRef::Fallback { .. }) {
            let fallback_label = self.interners.alloc_sites.label(id).to_string();
            self.diagnostics.push(Diagnostic::MissingPosition { function, fallback_label });
        }
        id
    }

    /// Same as [`Self::intern_site_tracked`], for call sites.
    fn intern_call_site_tracked(&mut self, function: FunctionId, site: &SiteRef) -> CallSiteId {
        let id = intern_call_site(&mut self.interners, site);
        if matches!(site, SiteRef::Fallback { .. }) {
            let fallback_label = self.interners.call_sites.label(id).to_string();
            self.diagnostics.push(Diagnostic::MissingPosition { function, fallback_label });
        }
        id
    }

    /// The receiver bound into `meta`'s own first positional parameter
    /// under `ctx` — the object-sensitivity input for any allocation
    /// `meta`'s body performs (§3). `None` for plain functions and
    /// builtins, which have no bound receiver to be sensitive to.
    fn current_receiver(&self, meta: &FunctionIr, ctx: ContextId) -> Option<PointsToSet> {
        match &meta.kind {
            CalleeKind::Method | CalleeKind::Class { .. } => {
                meta.params.positional.first().map(|&p| self.env.get(p, ctx))
            }
            _ => None,
        }
    }
}

/// The cells a constraint reads *before* any dynamic heap/call resolution
/// — registered once, at creation time, as opposed to the `tracked` set
/// that field/call constraints grow as they discover new objects.
fn static_reads(constraint: &Constraint) -> Vec<Cell> {
    match constraint {
        Constraint::Alloc { .. } => vec![],
        Constraint::Copy { source, .. } => vec![Cell::Env(source.0, source.1)],
        Constraint::LoadAttr { base, .. } | Constraint::LoadField { base, .. } => {
            vec![Cell::Env(base.0, base.1)]
        }
        Constraint::StoreAttr { base, source, .. } => {
            vec![Cell::Env(base.0, base.1), Cell::Env(source.0, source.1)]
        }
        Constraint::StoreField { base, source, .. } => {
            vec![Cell::Env(base.0, base.1), Cell::Env(source.0, source.1)]
        }
        Constraint::Phi { sources, .. } => {
            sources.iter().map(|s| Cell::Env(s.0, s.1)).collect()
        }
        Constraint::Call(call) => vec![Cell::Env(call.callee_expr, call.caller_ctx)],
    }
}

fn intern_site(interners: &mut Interners, site: &SiteRef, kind: AllocSiteKind) -> AllocSiteId {
    match site {
        SiteRef::Position { file, line, col } => interners.alloc_sites.at(file, *line, *col, kind),
        SiteRef::Fallback { file_stem, op, ir_id } => {
            interners.alloc_sites.fallback(file_stem, op, *ir_id, kind)
        }
    }
}

fn intern_call_site(interners: &mut Interners, site: &SiteRef) -> CallSiteId {
    match site {
        SiteRef::Position { file, line, col } => interners.call_sites.at(file, *line, *col),
        SiteRef::Fallback { file_stem, ir_id, .. } => interners.call_sites.fallback(file_stem, *ir_id),
    }
}
