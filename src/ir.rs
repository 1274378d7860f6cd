//! IR adapter contract (§4.5, §6).
//!
//! This module defines only the *contract* the front end/CFG builder (both
//! explicitly out of scope, §1) must satisfy: a lazy, finite event stream
//! per function, plus the per-function parameter policy and the static
//! function/class/method registrations `plan()` needs to resolve callees.
//! No IR lowering happens in this crate.

use crate::domain::AllocSiteKind;
use serde::{Deserialize, Serialize};

/// A stable variable identifier, assigned by the front end. Opaque to this
/// crate beyond equality/hashing.
pub type VarId = u32;

/// A stable function identifier, assigned by the driver.
pub type FunctionId = u32;

/// Container kinds distinguished for `load_subscr`/`store_subscr` (§4.5)
/// and the container field-key table (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    List,
    Tuple,
    Set,
    Dict,
}

/// A reference to a source position an allocation or call site is rooted
/// at, or the deterministic-hash fallback when no position is available
/// (§3). The engine, not the adapter, does the interning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SiteRef {
    Position { file: String, line: u32, col: u32 },
    Fallback { file_stem: String, op: String, ir_id: u64 },
}

/// One event in a function's lazy event stream (§4.5's table). Each event
/// carries stable `VarId`s only — no language-specific syntax.
#[derive(Debug, Clone)]
pub enum IrEvent {
    Alloc {
        target: VarId,
        kind: AllocSiteKind,
        site: SiteRef,
    },
    Copy {
        target: VarId,
        source: VarId,
    },
    LoadAttr {
        target: VarId,
        base: VarId,
        /// `None` means the attribute name is not statically known (Rule I5).
        attr: Option<String>,
    },
    StoreAttr {
        base: VarId,
        attr: Option<String>,
        source: VarId,
    },
    LoadSubscr {
        target: VarId,
        base: VarId,
        container_kind: ContainerKind,
    },
    StoreSubscr {
        base: VarId,
        container_kind: ContainerKind,
        source: VarId,
    },
    Call {
        call_site: SiteRef,
        callee_expr: VarId,
        receiver: Option<VarId>,
        positional: Vec<VarId>,
        keyword: Vec<(String, VarId)>,
        target: Option<VarId>,
    },
    Return {
        source: Option<VarId>,
    },
    Raise {
        source: VarId,
    },
    Catch {
        target: VarId,
    },
    Import {
        target: VarId,
        module_name: String,
    },
    Phi {
        target: VarId,
        sources: Vec<VarId>,
    },
}

/// Ordered/keyword parameter binding policy for one function (§6).
/// Default values are ignored — they do not affect reachability.
#[derive(Debug, Clone, Default)]
pub struct ParameterPolicy {
    pub positional: Vec<VarId>,
    pub varargs: Option<VarId>,
    pub kwargs: Option<VarId>,
    pub keyword_only: Vec<(String, VarId)>,
}

/// What kind of callable a function registration (`plan()` input)
/// describes — the tagged variant from Design Note §9, minus `unresolved`
/// (that tag only ever arises at resolution time, never at registration).
#[derive(Debug, Clone)]
pub enum CalleeKind {
    Function,
    /// A method's underlying function; its first declared parameter is the
    /// bound receiver.
    Method,
    /// A class: `constructor` is the `__init__`-equivalent function (a
    /// no-op constructor is still a function with an empty body event
    /// stream), and `instance_site` is the allocation site `self` objects
    /// are created at when this class is called.
    Class { instance_site: SiteRef },
    /// A host-provided primitive with no IR body, dispatched through
    /// `summaries` by canonical name (§4.8).
    Builtin { name: String },
}

/// One function/class/method/builtin registered with the engine via
/// `plan()`. `definition_site` is where this callable's own abstract
/// object is allocated (an `alloc` event of the matching
/// [`AllocSiteKind`] elsewhere in the IR binds a variable to it).
#[derive(Debug, Clone)]
pub struct FunctionIr {
    pub function: FunctionId,
    pub definition_site: SiteRef,
    pub kind: CalleeKind,
    pub params: ParameterPolicy,
    pub return_var: Option<VarId>,
    /// Synthetic per-function variable that every `raise` event joins into
    /// and every `catch` event copies out of — the flow-insensitive
    /// analogue of exception-handler linking, since CFG/handler structure
    /// is out of scope (§1).
    pub raised_var: Option<VarId>,
}

/// The event-stream contract an IR front end must implement.
pub trait IrAdapter {
    /// Lazily iterate the pointer-relevant events of `function`, in IR
    /// order. The adapter guarantees event completeness and that no event
    /// references a variable undefined in `function`.
    fn events(&self, function: FunctionId) -> Box<dyn Iterator<Item = IrEvent> + '_>;
}
