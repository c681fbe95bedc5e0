use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::condition::Condition;
use crate::error::TemplateError;
use crate::output::Output;
use crate::parameter::Parameter;
use crate::resource::Resource;

pub const FORMAT_VERSION: &str = "2010-09-09";

/// Static lookup table: top-level key -> second-level key -> value.
///
/// For image tables the top-level key is a region and the second-level key is `AMI`.
pub type Mapping = BTreeMap<String, BTreeMap<String, String>>;

/// The full resource graph: parameters, mappings, conditions, resources and outputs.
///
/// Parameters, resources and outputs keep the order they were added in, so
/// callers can rely on declaration order; the serialized form is keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
  #[serde(rename = "AWSTemplateFormatVersion")]
  format_version: &'static str,
  #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
  description: Option<String>,
  #[serde(
    rename = "Parameters",
    serialize_with = "keyed::parameters",
    skip_serializing_if = "Vec::is_empty"
  )]
  parameters: Vec<Parameter>,
  #[serde(rename = "Mappings", skip_serializing_if = "BTreeMap::is_empty")]
  mappings: BTreeMap<String, Mapping>,
  #[serde(rename = "Conditions", skip_serializing_if = "BTreeMap::is_empty")]
  conditions: BTreeMap<String, Condition>,
  #[serde(rename = "Resources", serialize_with = "keyed::resources")]
  resources: Vec<Resource>,
  #[serde(
    rename = "Outputs",
    serialize_with = "keyed::outputs",
    skip_serializing_if = "Vec::is_empty"
  )]
  outputs: Vec<Output>,
}

impl Template {
  pub fn new(description: impl Into<String>) -> Self {
    Self {
      format_version: FORMAT_VERSION,
      description: Some(description.into()),
      parameters: Vec::new(),
      mappings: BTreeMap::new(),
      conditions: BTreeMap::new(),
      resources: Vec::new(),
      outputs: Vec::new(),
    }
  }

  /// Install the parameter declarations. Uniqueness is the registry's job.
  pub fn set_parameters(&mut self, parameters: Vec<Parameter>) {
    self.parameters = parameters;
  }

  pub fn add_mapping(
    &mut self,
    name: impl Into<String>,
    mapping: Mapping,
  ) -> Result<(), TemplateError> {
    let name = name.into();
    if self.mappings.contains_key(&name) {
      return Err(TemplateError::DuplicateMapping(name));
    }
    self.mappings.insert(name, mapping);
    Ok(())
  }

  pub fn add_condition(
    &mut self,
    name: impl Into<String>,
    condition: Condition,
  ) -> Result<(), TemplateError> {
    let name = name.into();
    if self.conditions.contains_key(&name) {
      return Err(TemplateError::DuplicateCondition(name));
    }
    self.conditions.insert(name, condition);
    Ok(())
  }

  pub fn add_resource(&mut self, resource: Resource) -> Result<(), TemplateError> {
    if self.resource(&resource.logical_id).is_some() {
      return Err(TemplateError::DuplicateResource(resource.logical_id));
    }
    self.resources.push(resource);
    Ok(())
  }

  pub fn add_output(&mut self, output: Output) -> Result<(), TemplateError> {
    if self.outputs.iter().any(|o| o.name == output.name) {
      return Err(TemplateError::DuplicateOutput(output.name));
    }
    self.outputs.push(output);
    Ok(())
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub fn parameter(&self, name: &str) -> Option<&Parameter> {
    self.parameters.iter().find(|p| p.name == name)
  }

  pub fn mappings(&self) -> &BTreeMap<String, Mapping> {
    &self.mappings
  }

  pub fn conditions(&self) -> &BTreeMap<String, Condition> {
    &self.conditions
  }

  /// Resources in the order they were added.
  pub fn resources(&self) -> &[Resource] {
    &self.resources
  }

  pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
    self.resources.iter().find(|r| r.logical_id == logical_id)
  }

  pub fn outputs(&self) -> &[Output] {
    &self.outputs
  }
}

/// Serialize ordered declarations as a JSON object keyed by their names.
mod keyed {
  use super::*;

  fn by_key<'a, S, T, I>(serializer: S, items: I) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
    T: Serialize + 'a,
    I: ExactSizeIterator<Item = (&'a str, &'a T)>,
  {
    let mut map = serializer.serialize_map(Some(items.len()))?;
    for (key, item) in items {
      map.serialize_entry(key, item)?;
    }
    map.end()
  }

  pub fn parameters<S: Serializer>(items: &[Parameter], serializer: S) -> Result<S::Ok, S::Error> {
    by_key(serializer, items.iter().map(|p| (p.name.as_str(), p)))
  }

  pub fn resources<S: Serializer>(items: &[Resource], serializer: S) -> Result<S::Ok, S::Error> {
    by_key(serializer, items.iter().map(|r| (r.logical_id.as_str(), r)))
  }

  pub fn outputs<S: Serializer>(items: &[Output], serializer: S) -> Result<S::Ok, S::Error> {
    by_key(serializer, items.iter().map(|o| (o.name.as_str(), o)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resource::ResourceKind;
  use crate::value::Value;
  use serde_json::json;

  fn sample_mapping() -> Mapping {
    let mut mapping = Mapping::new();
    mapping.insert(
      "us-east-1".to_string(),
      BTreeMap::from([("AMI".to_string(), "ami-61bbf104".to_string())]),
    );
    mapping
  }

  #[test]
  fn test_empty_template_shape() {
    let template = Template::new("test stack");
    assert_eq!(
      serde_json::to_value(&template).unwrap(),
      json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Description": "test stack",
        "Resources": {}
      })
    );
  }

  #[test]
  fn test_sections_keyed_by_name() {
    let mut template = Template::new("test stack");
    template.set_parameters(vec![Parameter::string("InstanceType").with_default("m4.xlarge")]);
    template.add_mapping("CENTOS7", sample_mapping()).unwrap();
    template
      .add_resource(Resource::new("waitHandleAmbari", ResourceKind::WaitConditionHandle))
      .unwrap();
    template
      .add_output(
        Output::new("Region", Value::reference("AWS::Region")).with_description("AWS Region"),
      )
      .unwrap();

    let value = serde_json::to_value(&template).unwrap();
    assert_eq!(value["Parameters"]["InstanceType"]["Default"], "m4.xlarge");
    assert_eq!(value["Mappings"]["CENTOS7"]["us-east-1"]["AMI"], "ami-61bbf104");
    assert_eq!(
      value["Resources"]["waitHandleAmbari"]["Type"],
      "AWS::CloudFormation::WaitConditionHandle"
    );
    assert_eq!(
      value["Outputs"]["Region"],
      json!({"Description": "AWS Region", "Value": {"Ref": "AWS::Region"}})
    );
  }

  #[test]
  fn test_duplicate_resource_rejected() {
    let mut template = Template::new("test stack");
    template
      .add_resource(Resource::new("AmbariNode", ResourceKind::Instance))
      .unwrap();
    let result = template.add_resource(Resource::new("AmbariNode", ResourceKind::Instance));
    assert!(matches!(result, Err(TemplateError::DuplicateResource(id)) if id == "AmbariNode"));
  }

  #[test]
  fn test_duplicate_output_and_mapping_rejected() {
    let mut template = Template::new("test stack");
    template.add_output(Output::new("Region", "x")).unwrap();
    assert!(matches!(
      template.add_output(Output::new("Region", "y")),
      Err(TemplateError::DuplicateOutput(_))
    ));

    template.add_mapping("CENTOS7", sample_mapping()).unwrap();
    assert!(matches!(
      template.add_mapping("CENTOS7", sample_mapping()),
      Err(TemplateError::DuplicateMapping(_))
    ));
  }

  #[test]
  fn test_resources_keep_insertion_order() {
    let mut template = Template::new("test stack");
    for id in ["waitHandleAmbari", "AmbariNode", "AdditionalNodes"] {
      template
        .add_resource(Resource::new(id, ResourceKind::WaitConditionHandle))
        .unwrap();
    }
    let ids: Vec<&str> = template.resources().iter().map(|r| r.logical_id.as_str()).collect();
    assert_eq!(ids, vec!["waitHandleAmbari", "AmbariNode", "AdditionalNodes"]);
  }
}
