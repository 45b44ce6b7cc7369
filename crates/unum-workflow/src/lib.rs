//! Unum Workflow
//!
//! This crate provides the source-side workflow model for the unum frontend
//! compiler. It has two layers:
//!
//! - `WorkflowDef` / `StateDef`: serializable definition types that mirror the
//!   Step Functions states language (`StartAt`, `States`, `Task`, `Map`,
//!   `Parallel`). These are deserialized directly from the vendor JSON and are
//!   unvalidated.
//! - `WorkflowGraph` / `StateNode`: the validated control-flow graph the
//!   lowering engine consumes. Validation is eager and recursive; a graph that
//!   loads successfully has a resolvable entry state, consistent Task
//!   transitions, in-scope successors, and non-empty Parallel branch sets.

mod def;
mod error;
mod graph;

pub use def::{StateDef, WorkflowDef};
pub use error::GraphError;
pub use graph::{StateNode, TaskTransition, WorkflowGraph};
