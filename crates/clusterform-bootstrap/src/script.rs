use clusterform_registry::ParameterRegistry;
use clusterform_template::{Value, pseudo};
use tracing::debug;

use crate::context::{BootstrapContext, ExportKey};
use crate::error::BootstrapError;
use crate::role::Role;

/// Fixed script body, identical for every role.
pub const BODY: &str = include_str!("body.sh");

const PREAMBLE: &str = "#!/usr/bin/env bash\n\
exec > >(tee /root/cloudformation.log|logger -t user-data -s 2>/dev/console) 2>&1\n\
set -o nounset\n\
set -o errexit\n";

/// A synthesized user-data script: a resolved prefix followed by [`BODY`].
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
  role: Role,
  prefix: Vec<Value>,
}

impl Script {
  pub fn role(&self) -> Role {
    self.role
  }

  /// Preamble and export assignments, with adjacent literals coalesced.
  pub fn prefix(&self) -> &[Value] {
    &self.prefix
  }

  pub fn body(&self) -> &'static str {
    BODY
  }

  /// The whole script as ordered segments, ready to be joined.
  pub fn segments(&self) -> Vec<Value> {
    let mut segments = self.prefix.clone();
    push_segment(&mut segments, Value::literal(BODY));
    segments
  }

  /// `Base64(Join("", segments))`, the shape instance user data takes.
  pub fn to_value(&self) -> Value {
    Value::base64(Value::join("", self.segments()))
  }

  /// Script text with deferred references shown as placeholders.
  pub fn render_preview(&self) -> String {
    self.segments().iter().map(Value::render_preview).collect()
  }
}

/// Produce the bootstrap script for the role described by `context`.
///
/// Bound values keep their kind: literals are embedded as text, references
/// stay references for the deployment engine to fill in. Every parameter
/// referenced by a binding must be declared in `registry`.
pub fn synthesize(
  context: &BootstrapContext,
  registry: &ParameterRegistry,
) -> Result<Script, BootstrapError> {
  for value in context.bindings().values() {
    check_references(value, context, registry)?;
  }

  let mut prefix = Vec::new();
  push_segment(&mut prefix, Value::literal(PREAMBLE));

  let mut deferred = 0;
  for key in ExportKey::ALL {
    let quote = if key.quoted() { "'" } else { "" };
    let value = context.value(key);
    if value.is_deferred() {
      deferred += 1;
    }

    push_segment(
      &mut prefix,
      Value::literal(format!("export {}={}", key.name(), quote)),
    );
    push_segment(&mut prefix, value);
    push_segment(&mut prefix, Value::literal(format!("{}\n", quote)));
  }

  debug!(
    role = %context.role(),
    resource = context.resource_id(),
    exports = ExportKey::ALL.len(),
    deferred,
    "bootstrap script synthesized"
  );

  Ok(Script {
    role: context.role(),
    prefix,
  })
}

fn check_references(
  value: &Value,
  context: &BootstrapContext,
  registry: &ParameterRegistry,
) -> Result<(), BootstrapError> {
  let mut names = Vec::new();
  value.walk(&mut |v| {
    if let Value::Ref(name) = v {
      names.push(name.as_str());
    }
  });

  for name in names {
    if pseudo::is_pseudo(name) || name == context.wait_handle_id() {
      continue;
    }
    registry.handle(name)?;
  }
  Ok(())
}

fn push_segment(segments: &mut Vec<Value>, value: Value) {
  if let Value::Literal(text) = &value
    && let Some(Value::Literal(last)) = segments.last_mut()
  {
    last.push_str(text);
    return;
  }
  segments.push(value);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::BootstrapContextBuilder;
  use clusterform_registry::RegistryError;
  use clusterform_template::Parameter;

  const PARAMS: [(ExportKey, &str); 9] = [
    (ExportKey::AmbariVersion, "AmbariVersion"),
    (ExportKey::StackVersion, "HDPStack"),
    (ExportKey::JavaProvider, "JavaProvider"),
    (ExportKey::JavaVersion, "JavaVersion"),
    (ExportKey::Services, "AmbariServices"),
    (ExportKey::PostCommand, "PostCommand"),
    (ExportKey::AdminPassword, "AmbariPass"),
    (ExportKey::DeployCluster, "DeployCluster"),
    (ExportKey::AdditionalInstanceCount, "AdditionalInstanceCount"),
  ];

  fn registry() -> ParameterRegistry {
    let mut registry = ParameterRegistry::new();
    for (key, name) in PARAMS {
      let param = Parameter::string(name).with_default("x");
      let param = if key == ExportKey::AdminPassword {
        param.with_default("BadPass#1").secret()
      } else {
        param
      };
      registry.declare(param).unwrap();
    }
    registry
  }

  fn bind_params(
    builder: BootstrapContextBuilder,
    registry: &ParameterRegistry,
  ) -> BootstrapContext {
    PARAMS
      .iter()
      .fold(builder, |b, (key, name)| {
        b.bind(*key, &registry.handle(name).unwrap())
      })
      .build()
      .unwrap()
  }

  fn coordinator_script(registry: &ParameterRegistry) -> Script {
    let ctx = bind_params(
      BootstrapContext::coordinator("AmbariNode", "waitHandleAmbari"),
      registry,
    );
    synthesize(&ctx, registry).unwrap()
  }

  fn worker_script(registry: &ParameterRegistry) -> Script {
    let ctx = bind_params(
      BootstrapContext::worker("AdditionalNodes", "AmbariNode", "waitHandleAmbari"),
      registry,
    );
    synthesize(&ctx, registry).unwrap()
  }

  fn export_lines(script: &Script) -> Vec<String> {
    let preview = script.render_preview();
    let prefix = preview.strip_suffix(BODY).expect("script must end with the body");
    prefix
      .lines()
      .filter(|l| l.starts_with("export "))
      .map(String::from)
      .collect()
  }

  #[test]
  fn test_one_assignment_per_key() {
    let registry = registry();
    for script in [coordinator_script(&registry), worker_script(&registry)] {
      let lines = export_lines(&script);
      assert_eq!(lines.len(), ExportKey::ALL.len());
      for (line, key) in lines.iter().zip(ExportKey::ALL) {
        assert!(
          line.starts_with(&format!("export {}=", key.name())),
          "expected {} got {}",
          key.name(),
          line
        );
      }
    }
  }

  #[test]
  fn test_body_identical_across_roles() {
    let registry = registry();
    let coordinator = coordinator_script(&registry);
    let worker = worker_script(&registry);

    assert!(coordinator.render_preview().ends_with(BODY));
    assert!(worker.render_preview().ends_with(BODY));
    assert_eq!(coordinator.body(), worker.body());
    assert_ne!(coordinator.prefix(), worker.prefix());
  }

  #[test]
  fn test_coordinator_address_kinds() {
    let registry = registry();
    let coordinator = export_lines(&coordinator_script(&registry));
    let worker = export_lines(&worker_script(&registry));

    assert!(coordinator.contains(&"export ambari_server='127.0.0.1'".to_string()));
    assert!(
      worker.contains(&"export ambari_server='${GetAtt:AmbariNode.PrivateDnsName}'".to_string())
    );
    assert!(coordinator.contains(&"export install_ambari_server=true".to_string()));
    assert!(worker.contains(&"export install_ambari_server=false".to_string()));
  }

  #[test]
  fn test_deferred_segments_survive() {
    let registry = registry();
    let script = worker_script(&registry);

    assert!(script
      .prefix()
      .contains(&Value::get_att("AmbariNode", "PrivateDnsName")));
    assert!(script.prefix().contains(&Value::reference("AWS::Region")));
    assert!(script.prefix().contains(&Value::reference("waitHandleAmbari")));

    // literals between references are coalesced
    for pair in script.segments().windows(2) {
      assert!(!matches!(pair, [Value::Literal(_), Value::Literal(_)]));
    }
  }

  #[test]
  fn test_to_value_shape() {
    let registry = registry();
    let value = coordinator_script(&registry).to_value();

    let Value::Base64(inner) = value else {
      panic!("expected Base64");
    };
    let Value::Join { delimiter, values } = *inner else {
      panic!("expected Join");
    };
    assert_eq!(delimiter, "");
    match &values[0] {
      Value::Literal(text) => assert!(text.starts_with("#!/usr/bin/env bash\n")),
      other => panic!("unexpected first segment {:?}", other),
    }
  }

  #[test]
  fn test_secret_is_referenced_not_embedded() {
    let registry = registry();
    let preview = coordinator_script(&registry).render_preview();

    assert!(preview.contains("export ambari_pass='${Ref:AmbariPass}'"));
    assert!(!preview.contains("BadPass#1"));
  }

  #[test]
  fn test_unknown_parameter_reference_fails() {
    let registry = registry();
    let ctx = bind_params(
      BootstrapContext::coordinator("AmbariNode", "waitHandleAmbari"),
      &registry,
    );
    let empty = ParameterRegistry::new();

    let result = synthesize(&ctx, &empty);
    assert!(matches!(
      result,
      Err(BootstrapError::Registry(RegistryError::UnknownParameter { .. }))
    ));
  }

  #[test]
  fn test_body_contract() {
    assert!(BODY.contains("trap 'error_exit ${LINENO} ${?}' ERR"));
    assert!(BODY.contains("--reason \"line ${line_no} exit ${exit_code}\""));
    assert!(BODY.contains("chmod 600 ~/masterclass.env"));
    assert!(BODY.contains("export host_count=$((ref_additional_instance_count + 1))"));
    assert!(BODY.contains("sh -c \"${post_command}\""));
    assert!(BODY.contains(r#"[ -b "${disk}" ] || continue"#));
    assert!(BODY.contains(r#"grep -qs "^${disk} /grid/" /proc/mounts && continue"#));
    assert!(BODY.contains("if [ ${#ephemeral_disks[@]} -gt 0 ]; then"));
    assert!(!BODY.contains("AmbariNode"));
    for key in ExportKey::ALL {
      assert!(
        BODY.contains(&format!("${{{}}}", key.name())),
        "body never reads {}",
        key.name()
      );
    }
  }

  #[test]
  fn test_instance_up_signal_precedes_setup() {
    let up = BODY
      .find(r#"cfn-signal -e 0 --region "${region}" --stack "${stack}" --resource "${resource}""#)
      .unwrap();
    let disks = BODY.find("ephemeral_disks=()").unwrap();
    let trap = BODY.find("trap 'error_exit ${LINENO} ${?}' ERR").unwrap();

    assert!(trap < up);
    assert!(up < disks);
  }

  #[test]
  fn test_xtrace_enabled_after_exports() {
    let registry = registry();
    let script = coordinator_script(&registry);
    let prefix: String = script.prefix().iter().map(Value::render_preview).collect();

    assert!(!prefix.contains("xtrace"));
    assert!(BODY.contains("set -o xtrace"));
  }
}
