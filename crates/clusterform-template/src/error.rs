use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("duplicate resource logical id: {0}")]
  DuplicateResource(String),

  #[error("duplicate output: {0}")]
  DuplicateOutput(String),

  #[error("duplicate mapping: {0}")]
  DuplicateMapping(String),

  #[error("duplicate condition: {0}")]
  DuplicateCondition(String),
}
