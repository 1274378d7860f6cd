//! Shared fixtures for the integration test suite: a trivial in-memory
//! [`IrAdapter`] backed by a plain map, plus a few constructors that save
//! every scenario from repeating the same `SiteRef`/`FunctionIr` boilerplate.

#![allow(dead_code)]

use ptanalysis::config::EngineConfig;
use ptanalysis::engine::{Engine, EngineResults};
use ptanalysis::ir::{
    CalleeKind, FunctionId, FunctionIr, IrAdapter, IrEvent, ParameterPolicy, SiteRef, VarId,
};
use rustc_hash::FxHashMap;

pub fn pos(file: &str, line: u32, col: u32) -> SiteRef {
    SiteRef::Position {
        file: file.to_string(),
        line,
        col,
    }
}

/// A fixed, pre-lowered event stream per function — the only thing this
/// test suite needs to stand in for a real front end.
#[derive(Default)]
pub struct ScriptAdapter {
    events: FxHashMap<FunctionId, Vec<IrEvent>>,
}

impl ScriptAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, function: FunctionId, events: Vec<IrEvent>) -> Self {
        self.events.insert(function, events);
        self
    }
}

impl IrAdapter for ScriptAdapter {
    fn events(&self, function: FunctionId) -> Box<dyn Iterator<Item = IrEvent> + '_> {
        Box::new(
            self.events
                .get(&function)
                .cloned()
                .unwrap_or_default()
                .into_iter(),
        )
    }
}

/// A plain function with no parameters, no return/raise plumbing.
pub fn plain_function(function: FunctionId, site: SiteRef) -> FunctionIr {
    FunctionIr {
        function,
        definition_site: site,
        kind: CalleeKind::Function,
        params: ParameterPolicy::default(),
        return_var: None,
        raised_var: None,
    }
}

/// A function that returns through `return_var` — every `return` event
/// copies into it, and the caller's call-site target is bound from it.
pub fn function_with_return(function: FunctionId, site: SiteRef, return_var: VarId) -> FunctionIr {
    FunctionIr {
        function,
        definition_site: site,
        kind: CalleeKind::Function,
        params: ParameterPolicy::default(),
        return_var: Some(return_var),
        raised_var: None,
    }
}

pub fn method_with_return(
    function: FunctionId,
    site: SiteRef,
    self_param: VarId,
    return_var: VarId,
) -> FunctionIr {
    FunctionIr {
        function,
        definition_site: site,
        kind: CalleeKind::Method,
        params: ParameterPolicy {
            positional: vec![self_param],
            varargs: None,
            kwargs: None,
            keyword_only: Vec::new(),
        },
        return_var: Some(return_var),
        raised_var: None,
    }
}

/// A class whose constructor takes only the implicit `self`. `return_var`
/// is set to the same variable as the bound `self` parameter — a
/// constructor has no explicit `return`, so the IR convention for "the
/// call's result is the freshly allocated instance" is to alias the
/// constructor's return slot to its own `self` binding; R-ret's ordinary
/// latent copy then carries the instance out to the call site with no
/// special-casing needed in the solver.
pub fn class_ctor(
    function: FunctionId,
    site: SiteRef,
    self_param: VarId,
    instance_site: SiteRef,
) -> FunctionIr {
    FunctionIr {
        function,
        definition_site: site,
        kind: CalleeKind::Class { instance_site },
        params: ParameterPolicy {
            positional: vec![self_param],
            varargs: None,
            kwargs: None,
            keyword_only: Vec::new(),
        },
        return_var: Some(self_param),
        raised_var: None,
    }
}

/// Drive an engine through its full `plan`/`initialize`/`run`/`results`
/// lifecycle in one call, for scenarios that only care about the final
/// fixpoint.
pub fn run_to_fixpoint(
    adapter: ScriptAdapter,
    functions: Vec<FunctionIr>,
    entry_points: &[FunctionId],
    config: EngineConfig,
) -> EngineResults {
    let mut engine = Engine::new(adapter, config).expect("valid configuration");
    engine.plan(functions);
    engine.initialize(entry_points);
    let partial = engine.run();
    assert!(!partial, "fixpoint must be reached without a timeout in these fixtures");
    engine.results(partial)
}
