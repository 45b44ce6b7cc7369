//! Resource-to-step-name resolution.

use std::collections::HashMap;

/// Maps a Task's resource identifier to the name of its emitted step.
///
/// The mapping's ownership and lifecycle are the deployment tooling's
/// business; the compiler only needs "identifier in, step name out, or
/// failure".
pub trait ResourceResolver {
  fn resolve(&self, resource: &str) -> Option<String>;
}

/// Resolver backed by a function-name to Lambda-ARN mapping.
///
/// A resource that is not an `arn:aws:lambda` identifier is already a step
/// name and passes through untouched; an ARN is reverse-looked-up in the
/// mapping and fails if the deployment never produced it.
#[derive(Debug, Default)]
pub struct ArnResolver {
  name_by_arn: HashMap<String, String>,
}

impl ArnResolver {
  /// Build from a function-name → ARN mapping, as recorded at deploy time.
  pub fn from_function_arns(arns: impl IntoIterator<Item = (String, String)>) -> Self {
    Self {
      name_by_arn: arns.into_iter().map(|(name, arn)| (arn, name)).collect(),
    }
  }
}

impl ResourceResolver for ArnResolver {
  fn resolve(&self, resource: &str) -> Option<String> {
    if resource.contains("arn:aws:lambda") {
      self.name_by_arn.get(resource).cloned()
    } else {
      Some(resource.to_string())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_literal_resource_passes_through() {
    let resolver = ArnResolver::default();
    assert_eq!(resolver.resolve("f1"), Some("f1".to_string()));
  }

  #[test]
  fn test_arn_resolves_through_mapping() {
    let resolver = ArnResolver::from_function_arns([(
      "f1".to_string(),
      "arn:aws:lambda:us-west-1:123:function:f1-XYZ".to_string(),
    )]);

    assert_eq!(
      resolver.resolve("arn:aws:lambda:us-west-1:123:function:f1-XYZ"),
      Some("f1".to_string())
    );
    assert_eq!(
      resolver.resolve("arn:aws:lambda:us-west-1:123:function:unknown"),
      None
    );
  }
}
