use std::collections::HashMap;

use crate::def::{StateDef, WorkflowDef};
use crate::error::GraphError;

/// A validated control-flow graph, ready for lowering.
///
/// Construction through [`WorkflowGraph::load`] or [`WorkflowGraph::from_def`]
/// guarantees: the entry state exists, every Task carries exactly one of
/// terminal/successor, every successor resolves within its own graph scope,
/// Parallel branch sets are non-empty, and nested graphs satisfy the same
/// invariants recursively. The graph is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowGraph {
  entry: String,
  states: HashMap<String, StateNode>,
}

/// A validated state, one variant per control construct.
#[derive(Debug, Clone, PartialEq)]
pub enum StateNode {
  /// One executable resource plus where to go afterwards.
  Task {
    resource: String,
    transition: TaskTransition,
  },
  /// Scatter-gather over a runtime-determined number of elements, each
  /// processed by the nested iterator graph.
  Map {
    iterator: WorkflowGraph,
    next: Option<String>,
  },
  /// Fixed fan-out: every branch graph is invoked concurrently with the
  /// same input. Branch order is the declared order.
  Parallel {
    branches: Vec<WorkflowGraph>,
    next: Option<String>,
  },
}

/// Where a Task goes after it runs: nowhere (terminal) or to a named sibling.
/// Exactly one, never both, enforced at load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTransition {
  End,
  Next(String),
}

impl WorkflowGraph {
  /// Parse and validate a workflow definition from its JSON source.
  pub fn load(source: &str) -> Result<Self, GraphError> {
    let def: WorkflowDef = serde_json::from_str(source)?;
    Self::from_def(&def)
  }

  /// Validate an already-parsed definition.
  pub fn from_def(def: &WorkflowDef) -> Result<Self, GraphError> {
    if !def.states.contains_key(&def.start_at) {
      return Err(GraphError::MissingEntryState {
        entry: def.start_at.clone(),
      });
    }

    let mut states = HashMap::with_capacity(def.states.len());
    for (name, state) in &def.states {
      let node = match state {
        StateDef::Task {
          resource,
          next,
          end,
        } => {
          let terminal = end.unwrap_or(false);
          let transition = match (terminal, next) {
            (true, None) => TaskTransition::End,
            (false, Some(next)) => TaskTransition::Next(next.clone()),
            _ => {
              return Err(GraphError::InconsistentTaskMarkers {
                state: name.clone(),
              });
            }
          };
          StateNode::Task {
            resource: resource.clone(),
            transition,
          }
        }
        StateDef::Map { iterator, next } => StateNode::Map {
          iterator: Self::from_def(iterator)?,
          next: next.clone(),
        },
        StateDef::Parallel { branches, next } => {
          if branches.is_empty() {
            return Err(GraphError::EmptyBranches {
              state: name.clone(),
            });
          }
          StateNode::Parallel {
            branches: branches
              .iter()
              .map(Self::from_def)
              .collect::<Result<_, _>>()?,
            next: next.clone(),
          }
        }
      };
      states.insert(name.clone(), node);
    }

    // Successor names resolve only within this graph's own scope; nested
    // bodies cannot reference outer states.
    for (name, node) in &states {
      let next = match node {
        StateNode::Task {
          transition: TaskTransition::Next(next),
          ..
        } => Some(next),
        StateNode::Map { next, .. } | StateNode::Parallel { next, .. } => next.as_ref(),
        _ => None,
      };
      if let Some(next) = next
        && !states.contains_key(next)
      {
        return Err(GraphError::DanglingSuccessor {
          state: name.clone(),
          next: next.clone(),
        });
      }
    }

    Ok(Self {
      entry: def.start_at.clone(),
      states,
    })
  }

  /// The entry state name.
  pub fn entry(&self) -> &str {
    &self.entry
  }

  /// Look up a state by name within this graph's scope.
  pub fn get(&self, state_name: &str) -> Option<&StateNode> {
    self.states.get(state_name)
  }

  /// Number of states in this graph scope (nested graphs not included).
  pub fn len(&self) -> usize {
    self.states.len()
  }

  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn graph_from(value: serde_json::Value) -> Result<WorkflowGraph, GraphError> {
    WorkflowGraph::load(&value.to_string())
  }

  #[test]
  fn test_valid_task_chain() {
    let graph = graph_from(json!({
      "StartAt": "A",
      "States": {
        "A": { "Type": "Task", "Resource": "f1", "Next": "B" },
        "B": { "Type": "Task", "Resource": "f2", "End": true }
      }
    }))
    .unwrap();

    assert_eq!(graph.entry(), "A");
    assert_eq!(
      graph.get("A"),
      Some(&StateNode::Task {
        resource: "f1".to_string(),
        transition: TaskTransition::Next("B".to_string()),
      })
    );
  }

  #[test]
  fn test_missing_entry_state() {
    let err = graph_from(json!({
      "StartAt": "Nope",
      "States": {
        "A": { "Type": "Task", "Resource": "f1", "End": true }
      }
    }))
    .unwrap_err();

    assert!(matches!(err, GraphError::MissingEntryState { entry } if entry == "Nope"));
  }

  #[test]
  fn test_task_with_neither_end_nor_next() {
    let err = graph_from(json!({
      "StartAt": "A",
      "States": {
        "A": { "Type": "Task", "Resource": "f1" }
      }
    }))
    .unwrap_err();

    assert!(matches!(err, GraphError::InconsistentTaskMarkers { state } if state == "A"));
  }

  #[test]
  fn test_task_with_both_end_and_next() {
    let err = graph_from(json!({
      "StartAt": "A",
      "States": {
        "A": { "Type": "Task", "Resource": "f1", "Next": "B", "End": true },
        "B": { "Type": "Task", "Resource": "f2", "End": true }
      }
    }))
    .unwrap_err();

    assert!(matches!(err, GraphError::InconsistentTaskMarkers { state } if state == "A"));
  }

  #[test]
  fn test_end_false_is_not_terminal() {
    let err = graph_from(json!({
      "StartAt": "A",
      "States": {
        "A": { "Type": "Task", "Resource": "f1", "End": false }
      }
    }))
    .unwrap_err();

    assert!(matches!(err, GraphError::InconsistentTaskMarkers { .. }));
  }

  #[test]
  fn test_dangling_successor() {
    let err = graph_from(json!({
      "StartAt": "A",
      "States": {
        "A": { "Type": "Task", "Resource": "f1", "Next": "Gone" }
      }
    }))
    .unwrap_err();

    assert!(
      matches!(err, GraphError::DanglingSuccessor { state, next } if state == "A" && next == "Gone")
    );
  }

  #[test]
  fn test_empty_parallel_branches() {
    let err = graph_from(json!({
      "StartAt": "P",
      "States": {
        "P": { "Type": "Parallel", "Branches": [] }
      }
    }))
    .unwrap_err();

    assert!(matches!(err, GraphError::EmptyBranches { state } if state == "P"));
  }

  #[test]
  fn test_malformed_nested_iterator_surfaces() {
    // The iterator's StartAt names a state that does not exist; validation
    // recurses into nested graphs.
    let err = graph_from(json!({
      "StartAt": "M",
      "States": {
        "M": {
          "Type": "Map",
          "Iterator": {
            "StartAt": "Missing",
            "States": {
              "Work": { "Type": "Task", "Resource": "f3", "End": true }
            }
          }
        }
      }
    }))
    .unwrap_err();

    assert!(matches!(err, GraphError::MissingEntryState { entry } if entry == "Missing"));
  }

  #[test]
  fn test_nested_scope_cannot_reference_outer_state() {
    let err = graph_from(json!({
      "StartAt": "M",
      "States": {
        "M": {
          "Type": "Map",
          "Iterator": {
            "StartAt": "Work",
            "States": {
              "Work": { "Type": "Task", "Resource": "f3", "Next": "After" }
            }
          },
          "Next": "After"
        },
        "After": { "Type": "Task", "Resource": "f4", "End": true }
      }
    }))
    .unwrap_err();

    // "After" exists in the outer scope only; the iterator's Task may not
    // reach it.
    assert!(
      matches!(err, GraphError::DanglingSuccessor { state, next } if state == "Work" && next == "After")
    );
  }
}
