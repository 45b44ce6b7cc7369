use serde_json::{Value, json};

/// One step of the compiled workflow.
///
/// Created during lowering with `next` possibly absent, wired up at most once
/// by the enclosing scope, then frozen by the checkpoint policy pass before
/// emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrNode {
  /// Step name, globally unique within one compilation.
  pub name: String,
  /// Continuation; absent on terminal steps.
  pub next: Option<Continuation>,
  /// Whether the step's output must persist before its continuation fires.
  pub checkpoint: bool,
  /// Declared function or synthetic barrier.
  pub kind: StepKind,
}

/// Whether a step corresponds to an originally declared function or is a
/// synthetic barrier introduced by the compiler to host a fan-in point.
/// Barriers carry no executable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
  Function,
  Barrier,
}

/// Successor routing embedded in a step's own record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
  /// Invoke one successor with this step's output.
  Scalar { target: String },
  /// Invoke every target concurrently, each with the same input.
  ScalarFanOut { targets: Vec<String> },
  /// Invoke one concurrent instance of the target per element of this step's
  /// output; the instance count is known only at invocation time.
  MapFanOut { target: String },
  /// Write this step's output under a barrier key and invoke the target once
  /// the spec's producer-key set is complete.
  FanIn { target: String, spec: FanInSpec },
}

/// The producer-key set a fan-in barrier waits for.
///
/// Map barriers use a wildcard because the writer count is unknown until
/// invocation time; Parallel barriers enumerate exactly one key per branch.
/// The two are distinct on purpose and must never be collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanInSpec {
  Wildcard(String),
  Keys(Vec<String>),
}

impl IrNode {
  pub fn new(name: impl Into<String>, kind: StepKind) -> Self {
    Self {
      name: name.into(),
      next: None,
      checkpoint: false,
      kind,
    }
  }

  /// Render this node as its `unum_config.json` record, the shape the
  /// deployment tooling and runtime consume.
  pub fn to_config(&self) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert("Name".to_string(), json!(self.name));

    match &self.next {
      None => {}
      Some(Continuation::Scalar { target }) => {
        obj.insert("Next".to_string(), json!(target));
        obj.insert("NextInput".to_string(), json!("Scalar"));
      }
      Some(Continuation::ScalarFanOut { targets }) => {
        obj.insert("Next".to_string(), json!(targets));
        obj.insert("NextInput".to_string(), json!("Scalar"));
      }
      Some(Continuation::MapFanOut { target }) => {
        obj.insert("Next".to_string(), json!(target));
        obj.insert("NextInput".to_string(), json!("Map"));
      }
      Some(Continuation::FanIn { target, spec }) => {
        let values = match spec {
          FanInSpec::Wildcard(pattern) => vec![pattern.clone()],
          FanInSpec::Keys(keys) => keys.clone(),
        };
        obj.insert("Next".to_string(), json!(target));
        obj.insert(
          "NextInput".to_string(),
          json!({ "Fan-in": { "Values": values } }),
        );
      }
    }

    obj.insert("Checkpoint".to_string(), json!(self.checkpoint));
    Value::Object(obj)
  }
}
