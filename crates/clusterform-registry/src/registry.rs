use std::collections::HashMap;

use clusterform_template::{Parameter, Value, pseudo};
use tracing::debug;

use crate::error::RegistryError;

/// Typed reference to a declared parameter.
///
/// A handle can be used wherever a property value is expected; it renders as
/// `{"Ref": name}` and the deployment engine substitutes the override or the
/// default when the stack is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterHandle {
  name: String,
  secret: bool,
}

impl ParameterHandle {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_secret(&self) -> bool {
    self.secret
  }

  pub fn to_value(&self) -> Value {
    Value::reference(&self.name)
  }
}

impl From<&ParameterHandle> for Value {
  fn from(handle: &ParameterHandle) -> Self {
    handle.to_value()
  }
}

/// Registry of template parameters, in declaration order.
///
/// Passed explicitly to every component that needs to reference a parameter.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
  parameters: Vec<Parameter>,
  index: HashMap<String, usize>,
}

impl ParameterRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare a parameter and return a handle to it.
  pub fn declare(&mut self, parameter: Parameter) -> Result<ParameterHandle, RegistryError> {
    if pseudo::is_pseudo(&parameter.name) {
      return Err(RegistryError::ReservedName {
        name: parameter.name,
      });
    }
    if self.index.contains_key(&parameter.name) {
      return Err(RegistryError::DuplicateParameter {
        name: parameter.name,
      });
    }

    debug!(
      name = %parameter.name,
      param_type = %parameter.param_type,
      default = parameter.display_default().unwrap_or("-"),
      "parameter declared"
    );

    let handle = ParameterHandle {
      name: parameter.name.clone(),
      secret: parameter.is_secret(),
    };
    self
      .index
      .insert(parameter.name.clone(), self.parameters.len());
    self.parameters.push(parameter);
    Ok(handle)
  }

  /// Look up a handle for an already-declared parameter.
  pub fn handle(&self, name: &str) -> Result<ParameterHandle, RegistryError> {
    self
      .get(name)
      .map(|p| ParameterHandle {
        name: p.name.clone(),
        secret: p.is_secret(),
      })
      .ok_or_else(|| RegistryError::UnknownParameter {
        name: name.to_string(),
      })
  }

  /// Replace the embedded default of a declared parameter.
  pub fn set_default(&mut self, name: &str, value: impl Into<String>) -> Result<(), RegistryError> {
    let idx = *self
      .index
      .get(name)
      .ok_or_else(|| RegistryError::UnknownParameter {
        name: name.to_string(),
      })?;

    let parameter = &mut self.parameters[idx];
    parameter.default = Some(value.into());
    debug!(
      name = %parameter.name,
      default = parameter.display_default().unwrap_or("-"),
      "parameter default overridden"
    );
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Parameter> {
    self.index.get(name).map(|&idx| &self.parameters[idx])
  }

  /// Returns true if `name` is a declared secret parameter.
  pub fn is_secret(&self, name: &str) -> bool {
    self.get(name).is_some_and(Parameter::is_secret)
  }

  pub fn len(&self) -> usize {
    self.parameters.len()
  }

  pub fn is_empty(&self) -> bool {
    self.parameters.is_empty()
  }

  /// Parameters in declaration order.
  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }
}
