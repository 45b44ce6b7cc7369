use thiserror::Error;

/// Reasons a source workflow definition is malformed.
///
/// All variants are fatal: validation is eager, runs during [`WorkflowGraph`]
/// construction, and a definition that fails never produces a partial graph.
///
/// [`WorkflowGraph`]: crate::WorkflowGraph
#[derive(Debug, Error)]
pub enum GraphError {
  /// The definition is not valid JSON for the states language.
  #[error("invalid workflow definition: {0}")]
  Parse(#[from] serde_json::Error),

  /// `StartAt` names a state that does not exist in `States`.
  #[error("entry state '{entry}' not found")]
  MissingEntryState { entry: String },

  /// A Task must carry exactly one of `End: true` or `Next`.
  #[error("task '{state}' must declare exactly one of End or Next")]
  InconsistentTaskMarkers { state: String },

  /// A `Next` field names a state that does not exist in its own graph scope.
  #[error("state '{state}' continues to unknown state '{next}'")]
  DanglingSuccessor { state: String, next: String },

  /// A Parallel state declared no branches.
  #[error("parallel state '{state}' has no branches")]
  EmptyBranches { state: String },
}
