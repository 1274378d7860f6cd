//! Allocation sites and call sites (§3).
//!
//! Both are immutable string-identified program points, interned the same
//! way (§4.1): two sites are equal iff their canonical label strings are
//! equal, never by position in a vector or by pointer identity of the
//! label itself. The deterministic-hash fallback mirrors the teacher's
//! `IdGenerator`, which explicitly uses `DefaultHasher` rather than pulling
//! in `sha2`/`blake3` for stable-but-not-cryptographic ids.

use super::intern::{InternId, Interner};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The kind tag of an allocation site, per §3. Kept distinct from any
/// human-readable type label the caller may attach downstream (Q3): this
/// enum is purely the syntactic category of the creation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocSiteKind {
    Obj,
    List,
    Tuple,
    Dict,
    Set,
    Func,
    Class,
    Exc,
    Method,
    GenFrame,
    Module,
}

impl AllocSiteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AllocSiteKind::Obj => "obj",
            AllocSiteKind::List => "list",
            AllocSiteKind::Tuple => "tuple",
            AllocSiteKind::Dict => "dict",
            AllocSiteKind::Set => "set",
            AllocSiteKind::Func => "func",
            AllocSiteKind::Class => "class",
            AllocSiteKind::Exc => "exc",
            AllocSiteKind::Method => "method",
            AllocSiteKind::GenFrame => "genframe",
            AllocSiteKind::Module => "module",
        }
    }
}

/// An interned handle to an allocation site. `Copy`, cheap to pass around;
/// compare by id, resolve through [`AllocSiteTable`] when the label or kind
/// is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocSiteId(pub InternId);

/// An interned handle to a call site, kept as a distinct type from
/// [`AllocSiteId`] even though both intern plain label strings — mixing
/// them up would silently conflate "a call happened here" with "an object
/// was allocated here".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteId(pub InternId);

/// Interns allocation-site labels and remembers each site's [`AllocSiteKind`].
#[derive(Debug, Default)]
pub struct AllocSiteTable {
    labels: Interner<String>,
    kinds: Vec<AllocSiteKind>,
}

impl AllocSiteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern the preferred form `"<file>:<line>:<col>:<kind>"`.
    pub fn at(&mut self, file: &str, line: u32, col: u32, kind: AllocSiteKind) -> AllocSiteId {
        let label = format!("{file}:{line}:{col}:{}", kind.as_str());
        self.intern(label, kind)
    }

    /// Intern the fallback form when position is unavailable:
    /// `"<file-stem>:<op>:<stable-hash>"`.
    pub fn fallback(
        &mut self,
        file_stem: &str,
        op: &str,
        ir_id: impl Hash,
        kind: AllocSiteKind,
    ) -> AllocSiteId {
        let label = format!("{file_stem}:{op}:{:08x}", stable_digest(ir_id));
        self.intern(label, kind)
    }

    fn intern(&mut self, label: String, kind: AllocSiteKind) -> AllocSiteId {
        let id = self.labels.intern(label);
        if id as usize == self.kinds.len() {
            self.kinds.push(kind);
        }
        AllocSiteId(id)
    }

    pub fn label(&self, site: AllocSiteId) -> &str {
        self.labels.resolve(site.0)
    }

    pub fn kind(&self, site: AllocSiteId) -> AllocSiteKind {
        self.kinds[site.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Interns call-site labels (`"<file>:<line>:<col>:call"`, or the same
/// fallback scheme with `op` fixed to `"call"`).
#[derive(Debug, Default)]
pub struct CallSiteTable {
    labels: Interner<String>,
}

impl CallSiteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&mut self, file: &str, line: u32, col: u32) -> CallSiteId {
        CallSiteId(self.labels.intern(format!("{file}:{line}:{col}:call")))
    }

    pub fn fallback(&mut self, file_stem: &str, ir_id: impl Hash) -> CallSiteId {
        let label = format!("{file_stem}:call:{:08x}", stable_digest(ir_id));
        CallSiteId(self.labels.intern(label))
    }

    pub fn label(&self, site: CallSiteId) -> &str {
        self.labels.resolve(site.0)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A deterministic 32-bit digest of any hashable IR id, for the fallback
/// site-label rule. `DefaultHasher` is process-stable but not portable
/// across Rust versions/platforms the way a named algorithm would be —
/// acceptable here because §3 only requires determinism *within* a run,
/// not across toolchains.
fn stable_digest(ir_id: impl Hash) -> u32 {
    let mut hasher = DefaultHasher::new();
    ir_id.hash(&mut hasher);
    let full = hasher.finish();
    (full ^ (full >> 32)) as u32
}
