use std::collections::BTreeMap;

use clusterform_bootstrap::{BootstrapContext, ExportKey, Role, Script, synthesize};
use clusterform_registry::ParameterRegistry;
use clusterform_template::{
  CreationPolicy, Mapping, Output, Resource, ResourceKind, Template, Value, pseudo,
};
use tracing::{debug, info, instrument};

use crate::config::StackConfig;
use crate::devices::{BlockDeviceSpec, build_device_list, device_mappings};
use crate::error::StackError;
use crate::graph::Graph;
use crate::ids;
use crate::mappings::{image_id, image_mappings};
use crate::parameters::StackParameters;

pub const DESCRIPTION: &str =
  "CloudFormation template to Deploy Hortonworks Data Platform on VPC with a public subnet";

/// What one role contributes to the graph: its boot script and its disks.
#[derive(Debug, Clone)]
pub struct RoleLayout {
  pub script: Script,
  pub devices: Vec<BlockDeviceSpec>,
}

impl RoleLayout {
  /// Synthesize the script and device list for `role` from the stack parameters.
  pub fn new(
    role: Role,
    registry: &ParameterRegistry,
    config: &StackConfig,
  ) -> Result<Self, StackError> {
    let params = StackParameters::lookup(registry)?;

    let builder = match role {
      Role::Coordinator => BootstrapContext::coordinator(ids::COORDINATOR, ids::WAIT_HANDLE),
      Role::Worker => {
        BootstrapContext::worker(ids::WORKER_GROUP, ids::COORDINATOR, ids::WAIT_HANDLE)
      }
    };
    let context = builder
      .bind(ExportKey::AmbariVersion, &params.ambari_version)
      .bind(ExportKey::StackVersion, &params.hdp_stack)
      .bind(ExportKey::JavaProvider, &params.java_provider)
      .bind(ExportKey::JavaVersion, &params.java_version)
      .bind(ExportKey::Services, &params.ambari_services)
      .bind(ExportKey::PostCommand, &params.post_command)
      .bind(ExportKey::AdminPassword, &params.ambari_pass)
      .bind(ExportKey::DeployCluster, &params.deploy_cluster)
      .bind(ExportKey::AdditionalInstanceCount, &params.additional_instance_count)
      .build()?;

    let script = synthesize(&context, registry)?;
    let devices = build_device_list(
      &config.device_base,
      config.ephemeral_disk_count,
      &params.boot_disk_size,
      &config.root_volume_type,
    )?;

    debug!(%role, devices = devices.len(), "role layout built");
    Ok(Self { script, devices })
  }
}

/// Build the complete template from a registry holding the stack parameters.
pub fn generate(
  registry: &ParameterRegistry,
  config: &StackConfig,
) -> Result<Template, StackError> {
  let mappings = image_mappings();
  let coordinator = RoleLayout::new(Role::Coordinator, registry, config)?;
  let worker = RoleLayout::new(Role::Worker, registry, config)?;
  assemble(registry, &mappings, &coordinator, &worker, config)
}

/// Wire parameters, mappings and the per-role layouts into the resource graph.
///
/// Resources are added in dependency order: the wait handle and condition,
/// the coordinator, the worker launch template, then the scaling group. The
/// finished template is validated through [`Graph`] before it is returned.
#[instrument(skip_all, fields(platform = %config.platform))]
pub fn assemble(
  registry: &ParameterRegistry,
  mappings: &BTreeMap<String, Mapping>,
  coordinator: &RoleLayout,
  worker: &RoleLayout,
  config: &StackConfig,
) -> Result<Template, StackError> {
  expect_role(coordinator, Role::Coordinator)?;
  expect_role(worker, Role::Worker)?;

  let params = StackParameters::lookup(registry)?;
  let image = image_id(&config.platform, mappings)?;

  let mut template = Template::new(DESCRIPTION);
  template.set_parameters(registry.parameters().to_vec());
  for (name, mapping) in mappings {
    template.add_mapping(name.clone(), mapping.clone())?;
  }

  template.add_resource(Resource::new(
    ids::WAIT_HANDLE,
    ResourceKind::WaitConditionHandle,
  ))?;
  template.add_resource(
    Resource::new(ids::WAIT_CONDITION, ResourceKind::WaitCondition)
      .with_property("Handle", Value::reference(ids::WAIT_HANDLE))
      .with_property("Timeout", config.wait_timeout_secs.to_string()),
  )?;

  template.add_resource(
    Resource::new(ids::COORDINATOR, ResourceKind::Instance)
      .with_property("UserData", coordinator.script.to_value())
      .with_property("ImageId", image.clone())
      .with_property("BlockDeviceMappings", device_mappings(&coordinator.devices))
      .with_property("Tags", vec![name_tag(None)])
      .with_property("KeyName", &params.key_name)
      .with_property("InstanceType", &params.instance_type)
      .with_property("SubnetId", &params.subnet_id)
      .with_property("SecurityGroupIds", &params.security_groups)
      .with_creation_policy(CreationPolicy::signals(
        1,
        config.coordinator_signal_timeout.as_str(),
      )),
  )?;

  let network_interface = Value::object([
    ("DeviceIndex", Value::Number(0)),
    ("AssociatePublicIpAddress", Value::Bool(true)),
    ("Groups", params.security_groups.to_value()),
  ]);
  template.add_resource(
    Resource::new(ids::WORKER_LAUNCH_TEMPLATE, ResourceKind::LaunchTemplate).with_property(
      "LaunchTemplateData",
      Value::object([
        ("UserData", worker.script.to_value()),
        ("ImageId", image),
        ("BlockDeviceMappings", device_mappings(&worker.devices)),
        ("KeyName", params.key_name.to_value()),
        ("InstanceType", params.instance_type.to_value()),
        ("NetworkInterfaces", Value::List(vec![network_interface])),
      ]),
    ),
  )?;

  // workers need the coordinator's address, so the explicit edge is mandatory
  template.add_resource(
    Resource::new(ids::WORKER_GROUP, ResourceKind::AutoScalingGroup)
      .with_property("DesiredCapacity", &params.additional_instance_count)
      .with_property("MinSize", 0)
      .with_property("MaxSize", &params.additional_instance_count)
      .with_property("VPCZoneIdentifier", vec![params.subnet_id.to_value()])
      .with_property(
        "LaunchTemplate",
        Value::object([
          (
            "LaunchTemplateId",
            Value::reference(ids::WORKER_LAUNCH_TEMPLATE),
          ),
          (
            "Version",
            Value::get_att(ids::WORKER_LAUNCH_TEMPLATE, "LatestVersionNumber"),
          ),
        ]),
      )
      .with_property("Tags", vec![name_tag(Some(true))])
      .depends_on(ids::COORDINATOR)
      .with_creation_policy(CreationPolicy::signals(
        &params.additional_instance_count,
        config.worker_signal_timeout.as_str(),
      )),
  )?;

  for output in outputs() {
    template.add_output(output)?;
  }

  let graph = Graph::from_template(&template)?;
  info!(
    parameters = template.parameters().len(),
    resources = template.resources().len(),
    outputs = template.outputs().len(),
    entry_points = ?graph.entry_points(),
    "template assembled"
  );

  Ok(template)
}

fn expect_role(layout: &RoleLayout, expected: Role) -> Result<(), StackError> {
  let found = layout.script.role();
  if found != expected {
    return Err(StackError::RoleMismatch { expected, found });
  }
  Ok(())
}

/// `Name` tag carrying the stack name; scaling groups also propagate it.
fn name_tag(propagate_at_launch: Option<bool>) -> Value {
  let mut tag = BTreeMap::from([
    ("Key".to_string(), Value::literal("Name")),
    ("Value".to_string(), Value::reference(pseudo::STACK_NAME)),
  ]);
  if let Some(propagate) = propagate_at_launch {
    tag.insert("PropagateAtLaunch".to_string(), Value::Bool(propagate));
  }
  Value::Object(tag)
}

fn outputs() -> Vec<Output> {
  let public_dns = || Value::get_att(ids::COORDINATOR, "PublicDnsName");
  vec![
    Output::new("IIAN", Value::reference(ids::WORKER_GROUP))
      .with_description("Instance ID of additional nodes"),
    Output::new(
      "AmbariURL",
      Value::join("", vec!["http://".into(), public_dns(), ":8080".into()]),
    )
    .with_description("URL of Ambari UI"),
    Output::new(
      "AmbariSSH",
      Value::join("", vec!["ssh centos@".into(), public_dns()]),
    )
    .with_description("SSH to the Ambari Node"),
    Output::new("AmbariServiceInstanceId", Value::reference(ids::COORDINATOR))
      .with_description("The Ambari Servers Instance-Id"),
    Output::new("Region", Value::reference(pseudo::REGION)).with_description("AWS Region"),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parameters::declare_parameters;

  fn registry() -> ParameterRegistry {
    let mut registry = ParameterRegistry::new();
    declare_parameters(&mut registry).unwrap();
    registry
  }

  #[test]
  fn test_resources_in_dependency_order() {
    let template = generate(&registry(), &StackConfig::default()).unwrap();

    let ids: Vec<&str> = template.resources().iter().map(|r| r.logical_id.as_str()).collect();
    assert_eq!(
      ids,
      vec![
        "waitHandleAmbari",
        "waitConditionAmbari",
        "AmbariNode",
        "AdditionalNodeLaunchTemplate",
        "AdditionalNodes",
      ]
    );
  }

  #[test]
  fn test_coordinator_properties() {
    let template = generate(&registry(), &StackConfig::default()).unwrap();
    let node = template.resource(ids::COORDINATOR).unwrap();

    assert!(node.depends_on.is_empty());
    assert_eq!(node.kind, ResourceKind::Instance);
    let policy = node.creation_policy.as_ref().unwrap();
    assert_eq!(policy.resource_signal.count, Value::Number(1));
    assert_eq!(policy.resource_signal.timeout, "PT15M");

    match node.property("BlockDeviceMappings") {
      Some(Value::List(devices)) => assert_eq!(devices.len(), 25),
      other => panic!("unexpected device mappings {:?}", other),
    }
    assert_eq!(
      node.property("SecurityGroupIds"),
      Some(&Value::reference("SecurityGroups"))
    );
  }

  #[test]
  fn test_wait_condition_timeout_from_config() {
    let config = StackConfig {
      wait_timeout_secs: 600,
      ..StackConfig::default()
    };
    let template = generate(&registry(), &config).unwrap();
    let condition = template.resource(ids::WAIT_CONDITION).unwrap();

    assert_eq!(condition.property("Timeout"), Some(&Value::literal("600")));
    assert_eq!(
      condition.property("Handle"),
      Some(&Value::reference(ids::WAIT_HANDLE))
    );
  }

  #[test]
  fn test_worker_group_sizing() {
    let template = generate(&registry(), &StackConfig::default()).unwrap();
    let group = template.resource(ids::WORKER_GROUP).unwrap();
    let count = Value::reference("AdditionalInstanceCount");

    assert_eq!(group.depends_on, vec!["AmbariNode".to_string()]);
    assert_eq!(group.property("MinSize"), Some(&Value::Number(0)));
    assert_eq!(group.property("MaxSize"), Some(&count));
    assert_eq!(group.property("DesiredCapacity"), Some(&count));
    let policy = group.creation_policy.as_ref().unwrap();
    assert_eq!(policy.resource_signal.count, count);
    assert_eq!(policy.resource_signal.timeout, "PT30M");
  }

  #[test]
  fn test_layouts_swapped() {
    let registry = registry();
    let config = StackConfig::default();
    let coordinator = RoleLayout::new(Role::Coordinator, &registry, &config).unwrap();
    let worker = RoleLayout::new(Role::Worker, &registry, &config).unwrap();

    let result = assemble(&registry, &image_mappings(), &worker, &coordinator, &config);
    assert!(matches!(
      result,
      Err(StackError::RoleMismatch {
        expected: Role::Coordinator,
        found: Role::Worker
      })
    ));
  }

  #[test]
  fn test_unknown_platform_fails() {
    let config = StackConfig {
      platform: "UBUNTU".to_string(),
      ..StackConfig::default()
    };
    assert!(matches!(
      generate(&registry(), &config),
      Err(StackError::UnknownPlatform { .. })
    ));
  }

  #[test]
  fn test_disk_count_bounded() {
    let config = StackConfig {
      ephemeral_disk_count: 30,
      ..StackConfig::default()
    };
    assert!(matches!(
      generate(&registry(), &config),
      Err(StackError::TooManyDisks { count: 30, .. })
    ));
  }

  #[test]
  fn test_missing_parameters_fail() {
    assert!(matches!(
      generate(&ParameterRegistry::new(), &StackConfig::default()),
      Err(StackError::Registry(_))
    ));
  }
}
