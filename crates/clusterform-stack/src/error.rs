use clusterform_bootstrap::{BootstrapError, Role};
use clusterform_registry::RegistryError;
use clusterform_template::TemplateError;
use thiserror::Error;

/// Errors that can occur while laying out or assembling the stack.
#[derive(Debug, Error)]
pub enum StackError {
  /// More ephemeral disks than there are device letters.
  #[error("ephemeral disk count {count} exceeds the maximum of {max}")]
  TooManyDisks { count: usize, max: usize },

  /// The configured platform has no image mapping.
  #[error("unknown platform: {platform}")]
  UnknownPlatform { platform: String },

  /// A `Ref` names neither a parameter, a pseudo parameter nor a resource.
  #[error("'{owner}' references undeclared name '{name}'")]
  UnresolvedReference { owner: String, name: String },

  /// A `GetAtt` or `DependsOn` names a resource that does not exist.
  #[error("'{owner}' points at unknown resource '{resource}'")]
  UnknownResource { owner: String, resource: String },

  #[error("'{owner}' looks up unknown mapping '{mapping}'")]
  UnknownMapping { owner: String, mapping: String },

  #[error("'{owner}' uses unknown condition '{condition}'")]
  UnknownCondition { owner: String, condition: String },

  /// The resource dependency graph is not acyclic.
  #[error("cycle detected in resource graph at '{resource}'")]
  CycleDetected { resource: String },

  /// An output would surface a no-echo parameter.
  #[error("output '{output}' exposes secret parameter '{parameter}'")]
  SecretInOutput { output: String, parameter: String },

  /// A role layout was passed in the wrong slot.
  #[error("expected a {expected} layout, got {found}")]
  RoleMismatch { expected: Role, found: Role },

  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error(transparent)]
  Bootstrap(#[from] BootstrapError),

  #[error(transparent)]
  Template(#[from] TemplateError),
}
