use std::fmt;

use serde::{Serialize, Serializer};

const MASK: &str = "****";

/// Declared type of a template parameter.
///
/// Enumerations are `String` parameters with [`Constraints::allowed_values`];
/// secrets are any parameter marked [`Parameter::secret`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
  String,
  Number,
  CommaDelimitedList,
  /// `List<T>` of an engine-specific element type.
  List(String),
  /// Engine-specific type such as `AWS::EC2::Subnet::Id`.
  Provider(String),
}

impl fmt::Display for ParameterType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParameterType::String => f.write_str("String"),
      ParameterType::Number => f.write_str("Number"),
      ParameterType::CommaDelimitedList => f.write_str("CommaDelimitedList"),
      ParameterType::List(element) => write!(f, "List<{}>", element),
      ParameterType::Provider(name) => f.write_str(name),
    }
  }
}

impl Serialize for ParameterType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Declarative constraints, checked by the deployment engine rather than here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Constraints {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub allowed_pattern: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub allowed_values: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_value: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_value: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_length: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub constraint_description: Option<String>,
}

/// A user-overridable template input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
  #[serde(skip)]
  pub name: String,
  #[serde(rename = "Type")]
  pub param_type: ParameterType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(flatten)]
  pub constraints: Constraints,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub no_echo: bool,
}

impl Parameter {
  pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
    Self {
      name: name.into(),
      param_type,
      default: None,
      description: None,
      constraints: Constraints::default(),
      no_echo: false,
    }
  }

  pub fn string(name: impl Into<String>) -> Self {
    Self::new(name, ParameterType::String)
  }

  pub fn number(name: impl Into<String>) -> Self {
    Self::new(name, ParameterType::Number)
  }

  pub fn with_default(mut self, default: impl Into<String>) -> Self {
    self.default = Some(default.into());
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
    self.constraints.allowed_pattern = Some(pattern.into());
    self
  }

  pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.constraints.allowed_values = values.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_range(mut self, min: i64, max: i64) -> Self {
    self.constraints.min_value = Some(min);
    self.constraints.max_value = Some(max);
    self
  }

  pub fn with_length(mut self, min: u32, max: u32) -> Self {
    self.constraints.min_length = Some(min);
    self.constraints.max_length = Some(max);
    self
  }

  pub fn with_constraint_description(mut self, description: impl Into<String>) -> Self {
    self.constraints.constraint_description = Some(description.into());
    self
  }

  /// Mark the parameter as a secret (`NoEcho`).
  pub fn secret(mut self) -> Self {
    self.no_echo = true;
    self
  }

  pub fn is_secret(&self) -> bool {
    self.no_echo
  }

  /// The default as it may appear in logs: secrets are masked.
  pub fn display_default(&self) -> Option<&str> {
    match &self.default {
      Some(_) if self.no_echo => Some(MASK),
      Some(d) => Some(d.as_str()),
      None => None,
    }
  }
}
