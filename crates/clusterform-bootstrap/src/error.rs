use clusterform_registry::RegistryError;
use thiserror::Error;

use crate::context::ExportKey;

#[derive(Debug, Error)]
pub enum BootstrapError {
  /// A required export has no value bound in the context.
  #[error("no value bound for export '{}'", .key.name())]
  MissingBinding { key: ExportKey },

  /// The export is derived from the role and cannot be bound directly.
  #[error("export '{}' is derived from the role and cannot be bound", .key.name())]
  DerivedBinding { key: ExportKey },

  /// A bound value references a parameter the registry does not know.
  #[error(transparent)]
  Registry(#[from] RegistryError),
}
