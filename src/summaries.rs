//! Built-in-callable summaries (§4.8).
//!
//! A handful of host primitives have no IR body to expand — there is no
//! function definition to push onto the call worklist. Each is modeled
//! directly as a handful of constraints against the call's own arguments,
//! keyed by a canonical name supplied by [`crate::ir::CalleeKind::Builtin`].
//! Builtins execute in the caller's own context; no callee context is
//! pushed, since there is no call-string-relevant call boundary to cross.

use tracing::trace;

use crate::constraints::{CallConstraint, Constraint};
use crate::domain::{AllocSiteKind, FieldKey, PointsToSet};
use crate::ir::{IrAdapter, VarId};
use crate::solver::Solver;

/// Names that simply return one of their arguments unchanged (R-copy).
/// `iter`/`next` over a container are approximated as returning the
/// container itself rather than modeling a distinct generator/frame
/// object — sound (whatever `next()` yields is already a subset of what
/// the container points to via its `elem` field through any later
/// `load_attr`/`load_subscr`), just coarser than a dedicated frame object.
const IDENTITY_NAMES: &[&str] = &["id", "iter", "next", "copy", "deepcopy"];

/// Names that allocate a fresh container and populate it from their
/// arguments (§4.8). Each argument is conservatively treated as a member
/// of the result — sound for both `list(a, b, c)` and the common
/// single-iterable-argument form `list(existing)`, at the cost of folding
/// `existing` itself (rather than its elements) into the new container
/// when only one argument is given.
const CONTAINER_NAMES: &[(&str, AllocSiteKind)] = &[
    ("list", AllocSiteKind::List),
    ("tuple", AllocSiteKind::Tuple),
    ("set", AllocSiteKind::Set),
    ("dict", AllocSiteKind::Dict),
];

pub(crate) fn apply_builtin<A: IrAdapter>(solver: &mut Solver<A>, call: &CallConstraint, name: &str) {
    trace!(name, call_site = call.call_site.0, "applying builtin summary");

    if IDENTITY_NAMES.contains(&name) {
        apply_identity(solver, call);
        return;
    }
    if let Some((_, kind)) = CONTAINER_NAMES.iter().find(|(n, _)| *n == name) {
        apply_container_ctor(solver, call, *kind);
        return;
    }
    match name {
        "getattr" => apply_getattr(solver, call),
        "setattr" => apply_setattr(solver, call),
        _ => apply_unknown(solver, call),
    }
}

fn apply_identity<A: IrAdapter>(solver: &mut Solver<A>, call: &CallConstraint) {
    let Some(target) = call.target else { return };
    let Some(&source) = call.positional.first().or(call.receiver.as_ref()) else {
        return;
    };
    solver.add_constraint(Constraint::Copy {
        target: (target, call.caller_ctx),
        source: (source, call.caller_ctx),
    });
}

fn apply_container_ctor<A: IrAdapter>(solver: &mut Solver<A>, call: &CallConstraint, kind: AllocSiteKind) {
    let Some(target) = call.target else { return };

    let site = solver.interners.alloc_sites.fallback(
        "<builtin>",
        "construct",
        (call.call_site.0, call.caller_ctx.0),
        kind,
    );
    let container = solver.construct_object(site, call.caller_ctx, None);
    let mut pt = PointsToSet::empty();
    pt.insert(container);
    solver.env.join(target, call.caller_ctx, &pt);

    let field = match kind {
        AllocSiteKind::Dict => FieldKey::Value,
        _ => FieldKey::Elem,
    };
    let members: Vec<VarId> = call
        .positional
        .iter()
        .copied()
        .chain(call.keyword.iter().map(|(_, v)| *v))
        .collect();
    for source in members {
        solver.add_constraint(Constraint::StoreField {
            base: (target, call.caller_ctx),
            field,
            source: (source, call.caller_ctx),
        });
    }
}

/// `getattr(obj, name, ...)`: the attribute name is an ordinary value, not
/// a literal, so this is exactly Rule I5's unknown-name load against the
/// first positional argument (the object).
fn apply_getattr<A: IrAdapter>(solver: &mut Solver<A>, call: &CallConstraint) {
    let Some(target) = call.target else { return };
    let Some(&base) = call.positional.first() else { return };
    solver.add_constraint(Constraint::LoadAttr {
        target: (target, call.caller_ctx),
        base: (base, call.caller_ctx),
        name: None,
    });
}

/// `setattr(obj, name, value)`: Rule I5's unknown-name store.
fn apply_setattr<A: IrAdapter>(solver: &mut Solver<A>, call: &CallConstraint) {
    let (Some(&base), Some(&value)) = (call.positional.first(), call.positional.get(2)) else {
        return;
    };
    solver.add_constraint(Constraint::StoreAttr {
        base: (base, call.caller_ctx),
        name: None,
        source: (value, call.caller_ctx),
    });
}

/// Any unrecognized builtin name: joins a single canonical "unknown
/// value" object into the target. It is not a literal universal set
/// (finite-domain interning gives no way to represent one), but it is
/// absorbing in the sense that matters here — once joined, every
/// downstream read through `target` conservatively includes it, and
/// re-resolving the same builtin name never produces a second, distinct
/// object for it to merge with.
fn apply_unknown<A: IrAdapter>(solver: &mut Solver<A>, call: &CallConstraint) {
    let Some(target) = call.target else { return };
    let root = solver.interners.contexts.root();
    let site = solver
        .interners
        .alloc_sites
        .fallback("<builtin>", "unknown", "top", AllocSiteKind::Obj);
    let top = solver.construct_object(site, root, None);
    let mut pt = PointsToSet::empty();
    pt.insert(top);
    solver.env.join(target, call.caller_ctx, &pt);
}
