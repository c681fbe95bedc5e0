use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a remote template validator.
#[derive(Debug, Error)]
pub enum ValidationError {
  /// The service looked at the document and refused it.
  #[error("template rejected: {message}")]
  Rejected { message: String },

  /// The service could not be reached or did not answer.
  #[error("validation service unavailable: {message}")]
  Unavailable { message: String },
}

/// Errors that can occur while rendering or publishing a template.
#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to serialize template: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("rendered template is not valid UTF-8: {0}")]
  Encoding(#[from] std::string::FromUtf8Error),

  /// The compact body exceeds what the deployment engine accepts inline.
  #[error("template body is {size} bytes, limit is {limit}")]
  TooLarge { size: usize, limit: usize },

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
