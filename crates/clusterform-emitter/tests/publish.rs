use async_trait::async_trait;
use clusterform_emitter::{
  EmitError, MAX_TEMPLATE_BODY, TemplateValidator, ValidationError, emit, emit_compact, publish,
};
use clusterform_registry::ParameterRegistry;
use clusterform_stack::{StackConfig, declare_parameters, generate};
use clusterform_template::Template;

struct Fixed(Result<(), String>);

#[async_trait]
impl TemplateValidator for Fixed {
  async fn validate(&self, _body: &str) -> Result<(), ValidationError> {
    self
      .0
      .clone()
      .map_err(|message| ValidationError::Rejected { message })
  }
}

struct Offline;

#[async_trait]
impl TemplateValidator for Offline {
  async fn validate(&self, _body: &str) -> Result<(), ValidationError> {
    Err(ValidationError::Unavailable {
      message: "timeout: failed to reach cloudformation.us-west-2.amazonaws.com".to_string(),
    })
  }
}

fn stock_template() -> Template {
  let mut registry = ParameterRegistry::new();
  declare_parameters(&mut registry).unwrap();
  generate(&registry, &StackConfig::default()).unwrap()
}

#[test]
fn test_stock_template_fits_inline_limit() {
  let compact = emit_compact(&stock_template()).unwrap();
  assert!(compact.len() <= MAX_TEMPLATE_BODY, "compact body is {} bytes", compact.len());
}

#[test]
fn test_rendering_is_byte_identical() {
  assert_eq!(emit(&stock_template()).unwrap(), emit(&stock_template()).unwrap());
}

#[tokio::test]
async fn test_publish_stock_template() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cloudformation.json");

  let report = publish(&stock_template(), Some(&Fixed(Ok(()))), &path).await.unwrap();
  assert!(report.validated);

  let written: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
  assert_eq!(written["AWSTemplateFormatVersion"], "2010-09-09");
  assert_eq!(written["Resources"].as_object().unwrap().len(), 5);
  assert_eq!(written["Parameters"].as_object().unwrap().len(), 14);
  assert!(written.get("Conditions").is_none());
}

#[tokio::test]
async fn test_rejected_template_is_not_written() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cloudformation.json");
  let validator = Fixed(Err("Template format error: Unresolved resource dependencies".to_string()));

  let err = publish(&stock_template(), Some(&validator), &path).await.unwrap_err();

  assert!(matches!(err, EmitError::Validation(ValidationError::Rejected { .. })));
  assert!(err.to_string().contains("Unresolved resource dependencies"));
  assert!(!path.exists());
  assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unreachable_validator_is_a_hard_stop() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cloudformation.json");

  let err = publish(&stock_template(), Some(&Offline), &path).await.unwrap_err();

  assert!(matches!(err, EmitError::Validation(ValidationError::Unavailable { .. })));
  assert!(err.to_string().contains("validation service unavailable"));
  assert!(!path.exists());
  assert!(!dir.path().join("cloudformation.json.partial").exists());
  assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
