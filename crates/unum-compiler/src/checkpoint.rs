//! Checkpoint policy pass.

use unum_ir::{Continuation, IrNode};

/// Apply the run-wide checkpoint policy to a finished IR list.
///
/// A step whose continuation is a fan-in must checkpoint regardless of the
/// default: the barrier resolves by observing durable writes, and an
/// unobserved or reordered write would leave it stuck. Every other step takes
/// the configured default. Pure inspection, runs exactly once after lowering.
pub(crate) fn apply_checkpoint_policy(nodes: &mut [IrNode], default_checkpoint: bool) {
  for node in nodes {
    node.checkpoint = match node.next {
      Some(Continuation::FanIn { .. }) => true,
      _ => default_checkpoint,
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use unum_ir::{FanInSpec, StepKind};

  #[test]
  fn test_fan_in_forced_even_when_default_off() {
    let mut fan_in = IrNode::new("f3", StepKind::Function);
    fan_in.next = Some(Continuation::FanIn {
      target: "UnumMapSink0".to_string(),
      spec: FanInSpec::Wildcard("f3-unumIndex-*".to_string()),
    });
    let mut nodes = vec![fan_in, IrNode::new("UnumMapSink0", StepKind::Barrier)];

    apply_checkpoint_policy(&mut nodes, false);
    assert!(nodes[0].checkpoint);
    assert!(!nodes[1].checkpoint);
  }

  #[test]
  fn test_default_applies_to_non_fan_in() {
    let mut scalar = IrNode::new("f1", StepKind::Function);
    scalar.next = Some(Continuation::Scalar {
      target: "f2".to_string(),
    });
    let mut nodes = vec![scalar, IrNode::new("f2", StepKind::Function)];

    apply_checkpoint_policy(&mut nodes, true);
    assert!(nodes.iter().all(|n| n.checkpoint));
  }
}
