use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An unvalidated workflow definition in the Step Functions states language.
///
/// This is the shape of the vendor JSON as written: a `StartAt` entry state
/// name and a map of named states. Map iterators and Parallel branches embed
/// whole nested definitions of the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkflowDef {
  pub start_at: String,
  pub states: HashMap<String, StateDef>,
}

/// A single state definition, tagged by its `Type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum StateDef {
  #[serde(rename_all = "PascalCase")]
  Task {
    resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<bool>,
  },
  #[serde(rename_all = "PascalCase")]
  Map {
    iterator: Box<WorkflowDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
  },
  #[serde(rename_all = "PascalCase")]
  Parallel {
    branches: Vec<WorkflowDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
  },
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_deserialize_task_chain() {
    let def: WorkflowDef = serde_json::from_value(json!({
      "StartAt": "First",
      "States": {
        "First": { "Type": "Task", "Resource": "f1", "Next": "Second" },
        "Second": { "Type": "Task", "Resource": "f2", "End": true }
      }
    }))
    .unwrap();

    assert_eq!(def.start_at, "First");
    assert_eq!(
      def.states["First"],
      StateDef::Task {
        resource: "f1".to_string(),
        next: Some("Second".to_string()),
        end: None,
      }
    );
    assert_eq!(
      def.states["Second"],
      StateDef::Task {
        resource: "f2".to_string(),
        next: None,
        end: Some(true),
      }
    );
  }

  #[test]
  fn test_deserialize_nested_map() {
    let def: WorkflowDef = serde_json::from_value(json!({
      "StartAt": "Fan",
      "States": {
        "Fan": {
          "Type": "Map",
          "Iterator": {
            "StartAt": "Work",
            "States": {
              "Work": { "Type": "Task", "Resource": "f3", "End": true }
            }
          }
        }
      }
    }))
    .unwrap();

    match &def.states["Fan"] {
      StateDef::Map { iterator, next } => {
        assert_eq!(iterator.start_at, "Work");
        assert!(next.is_none());
      }
      other => panic!("expected Map state, got {:?}", other),
    }
  }
}
