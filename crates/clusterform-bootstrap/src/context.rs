use std::collections::BTreeMap;

use clusterform_template::{Value, pseudo};

use crate::error::BootstrapError;
use crate::role::Role;

/// Address the coordinator uses to reach its own management server.
const COORDINATOR_LOCAL_ADDRESS: &str = "127.0.0.1";

/// Every variable exported by the script prefix, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportKey {
  Region,
  Stack,
  Resource,
  CoordinatorAddress,
  AmbariVersion,
  StackVersion,
  JavaProvider,
  JavaVersion,
  InstallAgent,
  InstallServer,
  WaitHandle,
  Services,
  PostCommand,
  AdminPassword,
  DeployCluster,
  AdditionalInstanceCount,
}

impl ExportKey {
  pub const ALL: [ExportKey; 16] = [
    ExportKey::Region,
    ExportKey::Stack,
    ExportKey::Resource,
    ExportKey::CoordinatorAddress,
    ExportKey::AmbariVersion,
    ExportKey::StackVersion,
    ExportKey::JavaProvider,
    ExportKey::JavaVersion,
    ExportKey::InstallAgent,
    ExportKey::InstallServer,
    ExportKey::WaitHandle,
    ExportKey::Services,
    ExportKey::PostCommand,
    ExportKey::AdminPassword,
    ExportKey::DeployCluster,
    ExportKey::AdditionalInstanceCount,
  ];

  /// Shell variable name read by the script body.
  pub fn name(&self) -> &'static str {
    match self {
      ExportKey::Region => "region",
      ExportKey::Stack => "stack",
      ExportKey::Resource => "resource",
      ExportKey::CoordinatorAddress => "ambari_server",
      ExportKey::AmbariVersion => "ambari_version",
      ExportKey::StackVersion => "ambari_stack_version",
      ExportKey::JavaProvider => "java_provider",
      ExportKey::JavaVersion => "java_version",
      ExportKey::InstallAgent => "install_ambari_agent",
      ExportKey::InstallServer => "install_ambari_server",
      ExportKey::WaitHandle => "ref_wait_ambari",
      ExportKey::Services => "ambari_services",
      ExportKey::PostCommand => "post_command",
      ExportKey::AdminPassword => "ambari_pass",
      ExportKey::DeployCluster => "deploy",
      ExportKey::AdditionalInstanceCount => "ref_additional_instance_count",
    }
  }

  /// Whether the value is wrapped in single quotes. Enumerations, flags and
  /// counts are emitted bare.
  ///
  /// The quotes are literal text around a value the engine substitutes at
  /// deploy time, so a value containing `'` ends the string early. The post
  /// command and password parameters forbid it in their allowed patterns.
  pub fn quoted(&self) -> bool {
    !matches!(
      self,
      ExportKey::JavaProvider
        | ExportKey::JavaVersion
        | ExportKey::InstallAgent
        | ExportKey::InstallServer
        | ExportKey::DeployCluster
        | ExportKey::AdditionalInstanceCount
    )
  }

  /// Keys whose value comes from the role or the deployment engine rather
  /// than from a binding.
  pub fn is_derived(&self) -> bool {
    matches!(
      self,
      ExportKey::Region
        | ExportKey::Stack
        | ExportKey::Resource
        | ExportKey::CoordinatorAddress
        | ExportKey::InstallAgent
        | ExportKey::InstallServer
        | ExportKey::WaitHandle
    )
  }
}

/// Everything the synthesizer needs to produce one role's script.
///
/// Built once per role through [`BootstrapContextBuilder`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapContext {
  role: Role,
  resource_id: String,
  coordinator_address: Value,
  wait_handle_id: String,
  install_agent: bool,
  install_coordinator: bool,
  bindings: BTreeMap<ExportKey, Value>,
}

impl BootstrapContext {
  /// Context for the coordinator, which reaches its own server on loopback.
  pub fn coordinator(
    resource_id: impl Into<String>,
    wait_handle_id: impl Into<String>,
  ) -> BootstrapContextBuilder {
    BootstrapContextBuilder {
      role: Role::Coordinator,
      resource_id: resource_id.into(),
      coordinator_address: Value::literal(COORDINATOR_LOCAL_ADDRESS),
      wait_handle_id: wait_handle_id.into(),
      install_agent: true,
      install_coordinator: true,
      bindings: Vec::new(),
    }
  }

  /// Context for workers. The coordinator address is a deferred attribute of
  /// `coordinator_id`, unknown until that resource is created.
  pub fn worker(
    resource_id: impl Into<String>,
    coordinator_id: &str,
    wait_handle_id: impl Into<String>,
  ) -> BootstrapContextBuilder {
    BootstrapContextBuilder {
      role: Role::Worker,
      resource_id: resource_id.into(),
      coordinator_address: Value::get_att(coordinator_id, "PrivateDnsName"),
      wait_handle_id: wait_handle_id.into(),
      install_agent: true,
      install_coordinator: false,
      bindings: Vec::new(),
    }
  }

  pub fn role(&self) -> Role {
    self.role
  }

  /// Logical id the instance signals readiness against.
  pub fn resource_id(&self) -> &str {
    &self.resource_id
  }

  pub fn coordinator_address(&self) -> &Value {
    &self.coordinator_address
  }

  pub fn wait_handle_id(&self) -> &str {
    &self.wait_handle_id
  }

  /// The value exported for `key`.
  pub fn value(&self, key: ExportKey) -> Value {
    match key {
      ExportKey::Region => Value::reference(pseudo::REGION),
      ExportKey::Stack => Value::reference(pseudo::STACK_NAME),
      ExportKey::Resource => Value::literal(&self.resource_id),
      ExportKey::CoordinatorAddress => self.coordinator_address.clone(),
      ExportKey::InstallAgent => Value::literal(self.install_agent.to_string()),
      ExportKey::InstallServer => Value::literal(self.install_coordinator.to_string()),
      ExportKey::WaitHandle => Value::reference(&self.wait_handle_id),
      _ => self
        .bindings
        .get(&key)
        .cloned()
        .unwrap_or_else(|| Value::literal("")),
    }
  }

  pub(crate) fn bindings(&self) -> &BTreeMap<ExportKey, Value> {
    &self.bindings
  }
}

pub struct BootstrapContextBuilder {
  role: Role,
  resource_id: String,
  coordinator_address: Value,
  wait_handle_id: String,
  install_agent: bool,
  install_coordinator: bool,
  bindings: Vec<(ExportKey, Value)>,
}

impl BootstrapContextBuilder {
  /// Bind a non-derived export to a literal or a deferred reference.
  pub fn bind(mut self, key: ExportKey, value: impl Into<Value>) -> Self {
    self.bindings.push((key, value.into()));
    self
  }

  pub fn build(self) -> Result<BootstrapContext, BootstrapError> {
    let mut bindings = BTreeMap::new();
    for (key, value) in self.bindings {
      if key.is_derived() {
        return Err(BootstrapError::DerivedBinding { key });
      }
      bindings.insert(key, value);
    }

    if let Some(key) = ExportKey::ALL
      .iter()
      .find(|k| !k.is_derived() && !bindings.contains_key(*k))
    {
      return Err(BootstrapError::MissingBinding { key: *key });
    }

    Ok(BootstrapContext {
      role: self.role,
      resource_id: self.resource_id,
      coordinator_address: self.coordinator_address,
      wait_handle_id: self.wait_handle_id,
      install_agent: self.install_agent,
      install_coordinator: self.install_coordinator,
      bindings,
    })
  }
}
