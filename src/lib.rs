//! `ptanalysis` — context-sensitive, field-sensitive, flow-insensitive
//! points-to analysis for a dynamically-typed, class-based scripting
//! language.
//!
//! The crate computes, for every program variable and every object field in
//! a program already lowered to a three-address IR, an over-approximation
//! of the set of abstract heap objects that value may reference at runtime,
//! together with a context-sensitive call graph. It does not parse source,
//! build control-flow graphs, or drive a command-line tool — those are the
//! caller's job; see [`ir`] for the adapter contract this engine consumes.
//!
//! Entry point: build an [`config::EngineConfig`], construct an
//! [`engine::Engine`], call `plan`, `initialize`, `run`, `results` in that
//! order.
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod callgraph;
pub mod config;
pub mod constraints;
pub mod diagnostics;
pub mod domain;
pub mod engine;
pub mod error;
pub mod heap;
pub mod ir;
pub mod solver;
pub mod store;
pub mod summaries;

pub use config::{EngineConfig, FieldSensitivity, Preset};
pub use engine::{Engine, EngineResults};
pub use error::{EngineError, EngineOutcome};
