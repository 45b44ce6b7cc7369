//! Unum Compiler
//!
//! The frontend compiler of the unum serverless-workflow framework. It lowers
//! a validated [`WorkflowGraph`] into per-step continuation IR: one
//! [`IrNode`] per execution step, including synthetic barrier steps for Map
//! and Parallel fan-in. The decentralized runtime that later executes the IR
//! has no coordinator; every routing and synchronization decision it makes
//! comes from the records produced here.
//!
//! Compilation is synchronous and all-or-nothing: any error during lowering
//! aborts the run without partial output.
//!
//! ```
//! use unum_compiler::{ArnResolver, CompileOptions, compile};
//! use unum_workflow::WorkflowGraph;
//!
//! let graph = WorkflowGraph::load(r#"{
//!   "StartAt": "First",
//!   "States": {
//!     "First": { "Type": "Task", "Resource": "f1", "Next": "Second" },
//!     "Second": { "Type": "Task", "Resource": "f2", "End": true }
//!   }
//! }"#)?;
//!
//! let resolver = ArnResolver::default();
//! let ir = compile(&graph, &resolver, &CompileOptions::default())?;
//! assert_eq!(ir.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod checkpoint;
mod context;
mod emit;
mod error;
mod lower;
mod resolver;

use tracing::{info, instrument};
use unum_ir::IrNode;
use unum_workflow::WorkflowGraph;

pub use context::CompilationContext;
pub use emit::{EmittedIr, Emitter};
pub use error::{CompileError, OutputError};
pub use resolver::{ArnResolver, ResourceResolver};

use crate::checkpoint::apply_checkpoint_policy;
use crate::lower::LoweringEngine;

/// Run-wide compilation configuration.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
  /// Default checkpoint policy for steps that are not fan-in producers.
  pub checkpoint_default: bool,
  /// Named optimization request. Extension point: no optimizations are
  /// currently known, so any name is rejected.
  pub optimization: Option<String>,
}

/// Lower a validated workflow graph to its continuation IR.
///
/// Returns the full IR list in emission order, checkpoint policy applied.
/// Every step name in the result is unique within the run.
#[instrument(name = "compile", skip(graph, resolver, options))]
pub fn compile(
  graph: &WorkflowGraph,
  resolver: &dyn ResourceResolver,
  options: &CompileOptions,
) -> Result<Vec<IrNode>, CompileError> {
  if let Some(name) = &options.optimization {
    return Err(CompileError::UnsupportedOptimization { name: name.clone() });
  }

  let mut ctx = CompilationContext::new();
  let mut nodes = LoweringEngine::new(&mut ctx, resolver).lower(graph)?;
  apply_checkpoint_policy(&mut nodes, options.checkpoint_default);

  info!(steps = nodes.len(), "workflow lowered");
  Ok(nodes)
}
