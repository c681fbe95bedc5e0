use thiserror::Error;

/// Errors that can occur when declaring or looking up parameters.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// A parameter with this name was already declared.
  #[error("duplicate parameter: {name}")]
  DuplicateParameter { name: String },

  /// The name is not a declared parameter.
  #[error("unknown parameter: {name}")]
  UnknownParameter { name: String },

  /// The name belongs to a pseudo parameter supplied by the deployment engine.
  #[error("parameter name is reserved: {name}")]
  ReservedName { name: String },
}
