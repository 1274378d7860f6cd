//! Engine configuration (§6).
//!
//! Follows the teacher crate's three-tier shape: a plain, serializable
//! config record, a small set of named [`Preset`]s, and a `validate()` pass
//! that turns malformed external input into a [`crate::error::EngineError`]
//! before `plan`/`initialize` ever run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::field_key::FieldKey;
use crate::error::{EngineError, EngineOutcome};
use crate::ir::ContainerKind;

/// How object fields are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSensitivity {
    /// Distinguish fields by attribute name (the default).
    AttrName,
    /// Collapse every field of an object into a single cell. Still sound,
    /// strictly less precise; mainly useful for fast/coarse presets.
    FieldInsensitive,
}

/// Named configuration presets, mirroring the teacher's
/// `Preset::{Fast,Balanced,Precise}` enum for `PTAConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// k=0, obj_depth=0: monovariant, context-insensitive. Cheapest, least
    /// precise.
    Fast,
    /// k=1, obj_depth=1.
    Balanced,
    /// k=2, obj_depth=2: the spec's literal defaults.
    Precise,
}

impl Preset {
    fn k(self) -> usize {
        match self {
            Preset::Fast => 0,
            Preset::Balanced => 1,
            Preset::Precise => 2,
        }
    }

    fn obj_depth(self) -> usize {
        match self {
            Preset::Fast => 0,
            Preset::Balanced => 1,
            Preset::Precise => 2,
        }
    }
}

/// Configuration record for an [`crate::engine::Engine`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Call-string length bound (k ≥ 0). Default 2.
    pub k: usize,
    /// Receiver-fingerprint depth bound (d ≥ 0). Default 2.
    pub obj_depth: usize,
    /// Field-keying mode.
    pub field_sensitivity: FieldSensitivity,
    /// Which [`FieldKey`] a container's elements/values are stored under.
    /// Fixed by the spec (list/tuple/set → elem, dict → value); exposed as
    /// config only so a driver's serialized config round-trips.
    #[serde(skip, default = "default_containers")]
    pub containers: ContainerFieldMap,
    /// Wall-clock budget for `run()`. `None` means unbounded.
    #[serde(with = "duration_secs_opt")]
    pub timeout: Option<Duration>,
    /// Heap-store distinct-object threshold that triggers widening (§4.6.2).
    /// `None` disables widening.
    pub max_heap_widening: Option<usize>,
    /// Emit `tracing::debug!`/`trace!` spans for per-constraint solver
    /// detail in addition to the default `info!`/`warn!` levels.
    pub verbose: bool,
}

/// The fixed container→field-key table from §6, wrapped so it can live on
/// [`EngineConfig`] without re-deriving `Serialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerFieldMap;

impl ContainerFieldMap {
    pub fn field_for(self, kind: ContainerKind) -> FieldKey {
        match kind {
            ContainerKind::List | ContainerKind::Tuple | ContainerKind::Set => FieldKey::Elem,
            ContainerKind::Dict => FieldKey::Value,
        }
    }
}

fn default_containers() -> ContainerFieldMap {
    ContainerFieldMap
}

mod duration_secs_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        v.map(|d| d.as_secs_f64()).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs: Option<f64> = Option::deserialize(d)?;
        Ok(secs.map(Duration::from_secs_f64))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Precise)
    }
}

impl EngineConfig {
    /// Build a config from a named preset, matching the spec's literal
    /// defaults (k=2, obj_depth=2) for [`Preset::Precise`].
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            k: preset.k(),
            obj_depth: preset.obj_depth(),
            field_sensitivity: FieldSensitivity::AttrName,
            containers: ContainerFieldMap,
            timeout: None,
            max_heap_widening: None,
            verbose: false,
        }
    }

    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Reject configurations that cannot be executed soundly: `k`/
    /// `obj_depth` overflowing the bound used for context/fingerprint
    /// truncation. `k` and `obj_depth` are `usize` so "negative" is a
    /// type-level non-goal; what remains to check is an externally
    /// deserialized config carrying an unreasonable bound.
    pub fn validate(&self) -> EngineOutcome<()> {
        const MAX_REASONABLE_DEPTH: usize = 64;
        if self.k > MAX_REASONABLE_DEPTH {
            return Err(EngineError::configuration(format!(
                "k={} exceeds the maximum supported call-string length ({})",
                self.k, MAX_REASONABLE_DEPTH
            )));
        }
        if self.obj_depth > MAX_REASONABLE_DEPTH {
            return Err(EngineError::configuration(format!(
                "obj_depth={} exceeds the maximum supported fingerprint depth ({})",
                self.obj_depth, MAX_REASONABLE_DEPTH
            )));
        }
        Ok(())
    }
}

/// Progressive-disclosure builder over [`EngineConfig`], in the teacher's
/// `PTAConfig`-builder style.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    k: Option<usize>,
    obj_depth: Option<usize>,
    field_sensitivity: Option<FieldSensitivity>,
    timeout: Option<Duration>,
    max_heap_widening: Option<usize>,
    verbose: bool,
}

impl EngineConfigBuilder {
    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn obj_depth(mut self, d: usize) -> Self {
        self.obj_depth = Some(d);
        self
    }

    pub fn field_sensitivity(mut self, mode: FieldSensitivity) -> Self {
        self.field_sensitivity = Some(mode);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_heap_widening(mut self, threshold: usize) -> Self {
        self.max_heap_widening = Some(threshold);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> EngineConfig {
        let base = EngineConfig::from_preset(Preset::Precise);
        EngineConfig {
            k: self.k.unwrap_or(base.k),
            obj_depth: self.obj_depth.unwrap_or(base.obj_depth),
            field_sensitivity: self.field_sensitivity.unwrap_or(base.field_sensitivity),
            containers: base.containers,
            timeout: self.timeout.or(base.timeout),
            max_heap_widening: self.max_heap_widening.or(base.max_heap_widening),
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_spec_defaults() {
        let fast = EngineConfig::from_preset(Preset::Fast);
        assert_eq!(fast.k, 0);
        assert_eq!(fast.obj_depth, 0);

        let precise = EngineConfig::from_preset(Preset::Precise);
        assert_eq!(precise.k, 2);
        assert_eq!(precise.obj_depth, 2);
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let cfg = EngineConfig::builder().k(5).verbose(true).build();
        assert_eq!(cfg.k, 5);
        assert_eq!(cfg.obj_depth, 2); // inherited from the Precise base
        assert!(cfg.verbose);
    }

    #[test]
    fn validate_rejects_unreasonable_depth() {
        let cfg = EngineConfig::builder().k(1000).build();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn container_field_map_matches_spec_table() {
        let m = ContainerFieldMap;
        assert_eq!(m.field_for(ContainerKind::List), FieldKey::Elem);
        assert_eq!(m.field_for(ContainerKind::Tuple), FieldKey::Elem);
        assert_eq!(m.field_for(ContainerKind::Set), FieldKey::Elem);
        assert_eq!(m.field_for(ContainerKind::Dict), FieldKey::Value);
    }
}
