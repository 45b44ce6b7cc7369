//! Error types for compilation and emission.

use thiserror::Error;
use unum_workflow::GraphError;

/// Errors raised while lowering a workflow graph to IR.
///
/// All are fatal and synchronous; a run that errors partway never emits a
/// partial IR list.
#[derive(Debug, Error)]
pub enum CompileError {
  /// The source workflow graph failed validation.
  #[error("malformed workflow graph: {source}")]
  MalformedGraph {
    #[from]
    source: GraphError,
  },

  /// The resolver could not map a Task's resource to a step name.
  #[error("cannot resolve resource '{resource}' to a step name")]
  UnresolvedReference { resource: String },

  /// An optimization was requested by a name this compiler does not know.
  #[error("unsupported optimization '{name}'")]
  UnsupportedOptimization { name: String },
}

/// Errors raised while routing finalized IR to its destinations.
#[derive(Debug, Error)]
pub enum OutputError {
  /// A declared step's destination record could not be located.
  #[error("no destination for declared step '{step}'")]
  MissingDestination { step: String },
}
