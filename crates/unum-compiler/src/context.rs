//! Synthetic barrier name generation.

/// Per-run name generator for synthetic barrier steps.
///
/// Holds monotonically increasing map and parallel counters. One context is
/// threaded through an entire recursive lowering and never reset, so every
/// barrier pair is unique across arbitrarily nested constructs. Concurrent
/// compilations of independent workflows must each use their own context.
#[derive(Debug, Default)]
pub struct CompilationContext {
  map_counter: u32,
  parallel_counter: u32,
}

impl CompilationContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Allocate the (entry, sink) name pair for the next Map barrier.
  pub fn next_map_barrier_pair(&mut self) -> (String, String) {
    let n = self.map_counter;
    self.map_counter += 1;
    (format!("UnumMap{}", n), format!("UnumMapSink{}", n))
  }

  /// Allocate the (entry, sink) name pair for the next Parallel barrier.
  pub fn next_parallel_barrier_pair(&mut self) -> (String, String) {
    let n = self.parallel_counter;
    self.parallel_counter += 1;
    (
      format!("UnumParallel{}", n),
      format!("UnumParallelSink{}", n),
    )
  }
}
