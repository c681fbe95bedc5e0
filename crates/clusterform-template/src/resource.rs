use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::value::Value;

/// Kinds of resource the generator knows how to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
  Instance,
  LaunchTemplate,
  AutoScalingGroup,
  WaitConditionHandle,
  WaitCondition,
}

impl ResourceKind {
  /// The resource type name used by the deployment engine.
  pub fn type_name(&self) -> &'static str {
    match self {
      ResourceKind::Instance => "AWS::EC2::Instance",
      ResourceKind::LaunchTemplate => "AWS::EC2::LaunchTemplate",
      ResourceKind::AutoScalingGroup => "AWS::AutoScaling::AutoScalingGroup",
      ResourceKind::WaitConditionHandle => "AWS::CloudFormation::WaitConditionHandle",
      ResourceKind::WaitCondition => "AWS::CloudFormation::WaitCondition",
    }
  }
}

impl Serialize for ResourceKind {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.type_name())
  }
}

/// Number of readiness signals a resource must receive, and how long to wait.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceSignal {
  pub count: Value,
  /// ISO-8601 duration, e.g. `PT15M`.
  pub timeout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreationPolicy {
  pub resource_signal: ResourceSignal,
}

impl CreationPolicy {
  pub fn signals(count: impl Into<Value>, timeout: impl Into<String>) -> Self {
    Self {
      resource_signal: ResourceSignal {
        count: count.into(),
        timeout: timeout.into(),
      },
    }
  }
}

/// A named node in the resource graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
  #[serde(skip)]
  pub logical_id: String,
  #[serde(rename = "Type")]
  pub kind: ResourceKind,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: BTreeMap<String, Value>,
  /// Explicit dependency edges. Implicit edges come from `Ref`/`GetAtt` in properties.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub depends_on: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub creation_policy: Option<CreationPolicy>,
}

impl Resource {
  pub fn new(logical_id: impl Into<String>, kind: ResourceKind) -> Self {
    Self {
      logical_id: logical_id.into(),
      kind,
      properties: BTreeMap::new(),
      depends_on: Vec::new(),
      creation_policy: None,
    }
  }

  pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.properties.insert(key.into(), value.into());
    self
  }

  pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
    self.depends_on.push(logical_id.into());
    self
  }

  pub fn with_creation_policy(mut self, policy: CreationPolicy) -> Self {
    self.creation_policy = Some(policy);
    self
  }

  pub fn property(&self, key: &str) -> Option<&Value> {
    self.properties.get(key)
  }

  /// Every value carried by this resource, including its creation policy.
  pub fn values(&self) -> impl Iterator<Item = &Value> {
    self
      .properties
      .values()
      .chain(self.creation_policy.iter().map(|p| &p.resource_signal.count))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_wait_handle_has_no_properties() {
    let handle = Resource::new("waitHandleAmbari", ResourceKind::WaitConditionHandle);
    assert_eq!(
      serde_json::to_value(&handle).unwrap(),
      json!({"Type": "AWS::CloudFormation::WaitConditionHandle"})
    );
  }

  #[test]
  fn test_resource_with_policy_and_dependency() {
    let group = Resource::new("AdditionalNodes", ResourceKind::AutoScalingGroup)
      .with_property("MinSize", 0)
      .with_property("MaxSize", Value::reference("AdditionalInstanceCount"))
      .depends_on("AmbariNode")
      .with_creation_policy(CreationPolicy::signals(
        Value::reference("AdditionalInstanceCount"),
        "PT30M",
      ));

    assert_eq!(
      serde_json::to_value(&group).unwrap(),
      json!({
        "Type": "AWS::AutoScaling::AutoScalingGroup",
        "Properties": {
          "MaxSize": {"Ref": "AdditionalInstanceCount"},
          "MinSize": 0
        },
        "DependsOn": ["AmbariNode"],
        "CreationPolicy": {
          "ResourceSignal": {"Count": {"Ref": "AdditionalInstanceCount"}, "Timeout": "PT30M"}
        }
      })
    );
  }

  #[test]
  fn test_values_include_creation_policy_count() {
    let instance = Resource::new("AmbariNode", ResourceKind::Instance)
      .with_property("InstanceType", Value::reference("InstanceType"))
      .with_creation_policy(CreationPolicy::signals(1, "PT15M"));

    assert_eq!(instance.values().count(), 2);
  }
}
