use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clusterform_template::Template;
use tracing::{info, instrument};

use crate::emit::{MAX_TEMPLATE_BODY, emit, emit_compact};
use crate::error::EmitError;
use crate::validator::TemplateValidator;

/// What [`publish`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
  pub path: PathBuf,
  /// Size of the written (pretty) document.
  pub bytes: usize,
  /// Size of the compact body checked against the limit.
  pub compact_bytes: usize,
  /// Whether a validator accepted the document before it was written.
  pub validated: bool,
}

/// Render `template`, validate it if a validator is given, then write it to `path`.
///
/// The document is written to a sibling temporary file and renamed into
/// place, so `path` is either the complete new document or untouched.
#[instrument(
  skip(template, validator),
  fields(path = %path.display(), validate = validator.is_some())
)]
pub async fn publish(
  template: &Template,
  validator: Option<&dyn TemplateValidator>,
  path: &Path,
) -> Result<PublishReport, EmitError> {
  let compact = emit_compact(template)?;
  if compact.len() > MAX_TEMPLATE_BODY {
    return Err(EmitError::TooLarge {
      size: compact.len(),
      limit: MAX_TEMPLATE_BODY,
    });
  }

  if let Some(validator) = validator {
    validator.validate(&compact).await?;
    info!("template validated");
  }

  let document = emit(template)?;
  write_atomic(path, &document).await?;

  info!(bytes = document.len(), "template written");
  Ok(PublishReport {
    path: path.to_path_buf(),
    bytes: document.len(),
    compact_bytes: compact.len(),
    validated: validator.is_some(),
  })
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), EmitError> {
  let mut staging = OsString::from(path.as_os_str());
  staging.push(".partial");
  let staging = PathBuf::from(staging);

  let write_err = |source| EmitError::Write {
    path: path.to_path_buf(),
    source,
  };

  if let Err(err) = tokio::fs::write(&staging, contents).await {
    let _ = tokio::fs::remove_file(&staging).await;
    return Err(write_err(err));
  }
  if let Err(err) = tokio::fs::rename(&staging, path).await {
    let _ = tokio::fs::remove_file(&staging).await;
    return Err(write_err(err));
  }
  Ok(())
}
