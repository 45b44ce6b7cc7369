//! Unum IR
//!
//! This crate contains the low-level intermediate representation the frontend
//! compiler produces: one [`IrNode`] per execution step, each self-describing
//! its continuation, how concurrent predecessors merge into it, and whether
//! its output must be durably checkpointed. The runtime that consumes this IR
//! runs as ordinary stateless functions with no central coordinator; all
//! routing and synchronization logic lives in these records.

mod node;

pub use node::{Continuation, FanInSpec, IrNode, StepKind};
