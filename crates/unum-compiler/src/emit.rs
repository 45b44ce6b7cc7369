//! Routing of finalized IR to per-step destinations.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use unum_ir::{IrNode, StepKind};

use crate::error::OutputError;

/// Routes finalized IR nodes to their deployable destinations.
///
/// A node for an originally declared step updates that step's config record;
/// a synthetic barrier is a new deployable unit the caller must register. A
/// declared-step node with no known destination is an error.
pub struct Emitter {
  declared: HashSet<String>,
}

/// The emitter's output: config records keyed by step name, split by whether
/// the step already exists in the deployment or must be newly registered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmittedIr {
  pub updates: HashMap<String, serde_json::Value>,
  pub registrations: HashMap<String, serde_json::Value>,
}

impl Emitter {
  /// Create an emitter over the set of declared step names, as listed by the
  /// application's deployment template.
  pub fn new(declared_steps: impl IntoIterator<Item = String>) -> Self {
    Self {
      declared: declared_steps.into_iter().collect(),
    }
  }

  /// Route every node to its destination.
  pub fn emit(&self, nodes: &[IrNode]) -> Result<EmittedIr, OutputError> {
    let mut out = EmittedIr::default();

    for node in nodes {
      match node.kind {
        StepKind::Function => {
          if !self.declared.contains(&node.name) {
            return Err(OutputError::MissingDestination {
              step: node.name.clone(),
            });
          }
          debug!(step = %node.name, "updating declared step config");
          out.updates.insert(node.name.clone(), node.to_config());
        }
        StepKind::Barrier => {
          debug!(step = %node.name, "registering synthetic barrier step");
          out
            .registrations
            .insert(node.name.clone(), node.to_config());
        }
      }
    }

    Ok(out)
  }
}
