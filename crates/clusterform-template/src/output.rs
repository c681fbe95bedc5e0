use serde::Serialize;

use crate::value::Value;

/// A named, human-readable result of the deployed stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
  #[serde(skip)]
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub value: Value,
}

impl Output {
  pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
    Self {
      name: name.into(),
      description: None,
      value: value.into(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}
