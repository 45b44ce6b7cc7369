//! Recursive lowering of a workflow graph to continuation IR.
//!
//! The engine walks the graph top-down, appending one [`IrNode`] per step to
//! an arena in emission order. A node's `next` often cannot be known at the
//! point the node is created (the enclosing scope decides what a Map sink or
//! a branch exit continues to), so `lower_state` returns arena handles for
//! the subgraph's entry and exit and the caller wires the exit exactly once.

use tracing::debug;
use unum_ir::{Continuation, FanInSpec, IrNode, StepKind};
use unum_workflow::{StateNode, TaskTransition, WorkflowGraph};

use crate::context::CompilationContext;
use crate::error::CompileError;
use crate::resolver::ResourceResolver;

/// Arena handle for a node under construction.
type NodeId = usize;

pub(crate) struct LoweringEngine<'a> {
  ctx: &'a mut CompilationContext,
  resolver: &'a dyn ResourceResolver,
  nodes: Vec<IrNode>,
}

impl<'a> LoweringEngine<'a> {
  pub(crate) fn new(ctx: &'a mut CompilationContext, resolver: &'a dyn ResourceResolver) -> Self {
    Self {
      ctx,
      resolver,
      nodes: Vec::new(),
    }
  }

  /// Lower the whole graph starting from its entry state and return the
  /// finished node list in emission order.
  pub(crate) fn lower(mut self, graph: &WorkflowGraph) -> Result<Vec<IrNode>, CompileError> {
    self.lower_state(graph.entry(), graph)?;
    Ok(self.nodes)
  }

  /// Lower one state and everything reachable from it within `graph`'s
  /// scope. Returns (entry, exit): entry is what the caller wires into, exit
  /// is the node whose `next` the caller must finalize unless the chain
  /// ended on a terminal Task.
  fn lower_state(
    &mut self,
    state_name: &str,
    graph: &WorkflowGraph,
  ) -> Result<(NodeId, NodeId), CompileError> {
    // Validation guarantees every reachable name resolves in scope.
    let state = graph
      .get(state_name)
      .unwrap_or_else(|| unreachable!("validated graph lost state '{}'", state_name));

    match state {
      StateNode::Task {
        resource,
        transition,
      } => self.lower_task(resource, transition, graph),
      StateNode::Map { iterator, next } => self.lower_map(iterator, next.as_deref(), graph),
      StateNode::Parallel { branches, next } => {
        self.lower_parallel(branches, next.as_deref(), graph)
      }
    }
  }

  fn lower_task(
    &mut self,
    resource: &str,
    transition: &TaskTransition,
    graph: &WorkflowGraph,
  ) -> Result<(NodeId, NodeId), CompileError> {
    let step_name =
      self
        .resolver
        .resolve(resource)
        .ok_or_else(|| CompileError::UnresolvedReference {
          resource: resource.to_string(),
        })?;

    debug!(step = %step_name, "lowering task state");
    let node = self.push(IrNode::new(step_name, StepKind::Function));

    match transition {
      TaskTransition::End => Ok((node, node)),
      TaskTransition::Next(successor) => {
        let (succ_entry, succ_exit) = self.lower_state(successor, graph)?;
        self.nodes[node].next = Some(Continuation::Scalar {
          target: self.nodes[succ_entry].name.clone(),
        });
        Ok((node, succ_exit))
      }
    }
  }

  fn lower_map(
    &mut self,
    iterator: &WorkflowGraph,
    next: Option<&str>,
    graph: &WorkflowGraph,
  ) -> Result<(NodeId, NodeId), CompileError> {
    let (entry_name, sink_name) = self.ctx.next_map_barrier_pair();
    debug!(entry = %entry_name, sink = %sink_name, "lowering map state");

    let map_entry = self.push(IrNode::new(entry_name, StepKind::Barrier));
    let (iter_entry, iter_exit) = self.lower_state(iterator.entry(), iterator)?;

    self.nodes[map_entry].next = Some(Continuation::MapFanOut {
      target: self.nodes[iter_entry].name.clone(),
    });
    // The iterator runs a runtime-determined number of times, so the sink
    // waits on a wildcard over the exit step's indexed keys.
    self.nodes[iter_exit].next = Some(Continuation::FanIn {
      target: sink_name.clone(),
      spec: FanInSpec::Wildcard(format!("{}-unumIndex-*", self.nodes[iter_exit].name)),
    });

    let map_sink = self.push(IrNode::new(sink_name, StepKind::Barrier));
    self.wire_successor(map_entry, map_sink, next, graph)
  }

  fn lower_parallel(
    &mut self,
    branches: &[WorkflowGraph],
    next: Option<&str>,
    graph: &WorkflowGraph,
  ) -> Result<(NodeId, NodeId), CompileError> {
    let (entry_name, sink_name) = self.ctx.next_parallel_barrier_pair();
    debug!(entry = %entry_name, sink = %sink_name, branches = branches.len(), "lowering parallel state");

    let parallel_entry = self.push(IrNode::new(entry_name, StepKind::Barrier));

    let mut entries = Vec::with_capacity(branches.len());
    let mut exits = Vec::with_capacity(branches.len());
    for branch in branches {
      let (branch_entry, branch_exit) = self.lower_state(branch.entry(), branch)?;
      entries.push(branch_entry);
      exits.push(branch_exit);
    }

    self.nodes[parallel_entry].next = Some(Continuation::ScalarFanOut {
      targets: entries
        .iter()
        .map(|&id| self.nodes[id].name.clone())
        .collect(),
    });

    // Every branch exit carries the full enumerated key set, so the sink's
    // quorum is recognizable no matter which branch the runtime observes.
    let fan_in_keys: Vec<String> = exits
      .iter()
      .enumerate()
      .map(|(i, &id)| format!("{}-unumIndex-{}", self.nodes[id].name, i))
      .collect();
    for &exit in &exits {
      self.nodes[exit].next = Some(Continuation::FanIn {
        target: sink_name.clone(),
        spec: FanInSpec::Keys(fan_in_keys.clone()),
      });
    }

    let parallel_sink = self.push(IrNode::new(sink_name, StepKind::Barrier));
    self.wire_successor(parallel_entry, parallel_sink, next, graph)
  }

  /// Shared successor wiring for Map and Parallel: the construct's sink
  /// either continues into the lowered successor or becomes the exit itself.
  fn wire_successor(
    &mut self,
    entry: NodeId,
    sink: NodeId,
    next: Option<&str>,
    graph: &WorkflowGraph,
  ) -> Result<(NodeId, NodeId), CompileError> {
    match next {
      Some(successor) => {
        let (succ_entry, succ_exit) = self.lower_state(successor, graph)?;
        self.nodes[sink].next = Some(Continuation::Scalar {
          target: self.nodes[succ_entry].name.clone(),
        });
        Ok((entry, succ_exit))
      }
      None => Ok((entry, sink)),
    }
  }

  fn push(&mut self, node: IrNode) -> NodeId {
    self.nodes.push(node);
    self.nodes.len() - 1
  }
}
