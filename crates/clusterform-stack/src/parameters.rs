use clusterform_registry::{ParameterHandle, ParameterRegistry, RegistryError};
use clusterform_template::{Parameter, ParameterType};

/// Parameter names, as they appear in the document.
pub mod names {
  pub const POST_COMMAND: &str = "PostCommand";
  pub const AMBARI_VERSION: &str = "AmbariVersion";
  pub const HDP_STACK: &str = "HDPStack";
  pub const BOOT_DISK_SIZE: &str = "BootDiskSize";
  pub const INSTANCE_TYPE: &str = "InstanceType";
  pub const AMBARI_PASS: &str = "AmbariPass";
  pub const AMBARI_SERVICES: &str = "AmbariServices";
  pub const DEPLOY_CLUSTER: &str = "DeployCluster";
  pub const ADDITIONAL_INSTANCE_COUNT: &str = "AdditionalInstanceCount";
  pub const JAVA_PROVIDER: &str = "JavaProvider";
  pub const JAVA_VERSION: &str = "JavaVersion";
  pub const SUBNET_ID: &str = "SubnetId";
  pub const SECURITY_GROUPS: &str = "SecurityGroups";
  pub const KEY_NAME: &str = "KeyName";
}

const DEFAULT_POST_COMMAND: &str =
  "curl -sSL https://raw.githubusercontent.com/seanorama/masterclass/master/generic/setup.sh | bash";

const DEFAULT_SERVICES: &str = "ACCUMULO AMBARI_METRICS FALCON FLUME HBASE HDFS HIVE KAFKA KNOX MAHOUT \
MAPREDUCE2 OOZIE PIG SLIDER SPARK SQOOP STORM TEZ YARN ZOOKEEPER";

// Quoted exports are single-quoted shell strings, so neither value may contain `'`.
const NO_SINGLE_QUOTE: &str = "[^']*";

const PASSWORD_PATTERN: &str = "(?=^[^']*$)(?=^.{6,255}$)((?=.*\\d)(?=.*[A-Z])(?=.*[a-z])|(?=.*\\d)(?=.*[^A-Za-z0-9])(?=.*[a-z])|(?=.*[^A-Za-z0-9])(?=.*[A-Z])(?=.*[a-z])|(?=.*\\d)(?=.*[A-Z])(?=.*[^A-Za-z0-9]))^.*";

/// Handles to every parameter the stack declares.
#[derive(Debug, Clone)]
pub struct StackParameters {
  pub post_command: ParameterHandle,
  pub ambari_version: ParameterHandle,
  pub hdp_stack: ParameterHandle,
  pub boot_disk_size: ParameterHandle,
  pub instance_type: ParameterHandle,
  pub ambari_pass: ParameterHandle,
  pub ambari_services: ParameterHandle,
  pub deploy_cluster: ParameterHandle,
  pub additional_instance_count: ParameterHandle,
  pub java_provider: ParameterHandle,
  pub java_version: ParameterHandle,
  pub subnet_id: ParameterHandle,
  pub security_groups: ParameterHandle,
  pub key_name: ParameterHandle,
}

impl StackParameters {
  /// Fetch handles from a registry that already holds the declarations.
  pub fn lookup(registry: &ParameterRegistry) -> Result<Self, RegistryError> {
    Ok(Self {
      post_command: registry.handle(names::POST_COMMAND)?,
      ambari_version: registry.handle(names::AMBARI_VERSION)?,
      hdp_stack: registry.handle(names::HDP_STACK)?,
      boot_disk_size: registry.handle(names::BOOT_DISK_SIZE)?,
      instance_type: registry.handle(names::INSTANCE_TYPE)?,
      ambari_pass: registry.handle(names::AMBARI_PASS)?,
      ambari_services: registry.handle(names::AMBARI_SERVICES)?,
      deploy_cluster: registry.handle(names::DEPLOY_CLUSTER)?,
      additional_instance_count: registry.handle(names::ADDITIONAL_INSTANCE_COUNT)?,
      java_provider: registry.handle(names::JAVA_PROVIDER)?,
      java_version: registry.handle(names::JAVA_VERSION)?,
      subnet_id: registry.handle(names::SUBNET_ID)?,
      security_groups: registry.handle(names::SECURITY_GROUPS)?,
      key_name: registry.handle(names::KEY_NAME)?,
    })
  }
}

/// Declare the stack's parameters, in document order.
pub fn declare_parameters(
  registry: &mut ParameterRegistry,
) -> Result<StackParameters, RegistryError> {
  Ok(StackParameters {
    post_command: registry.declare(
      Parameter::string(names::POST_COMMAND)
        .with_default(DEFAULT_POST_COMMAND)
        .with_pattern(NO_SINGLE_QUOTE)
        .with_constraint_description("Must not contain single quotes.")
        .with_description("Command to run after nodes are deployed"),
    )?,
    ambari_version: registry.declare(
      Parameter::string(names::AMBARI_VERSION)
        .with_default("2.2.1.0")
        .with_description("Ambari Version")
        .with_pattern("\\d\\.\\d\\.\\d\\.\\d|\\d\\.\\d\\.\\d"),
    )?,
    hdp_stack: registry.declare(
      Parameter::string(names::HDP_STACK)
        .with_default("2.4")
        .with_description("HDP stack version")
        .with_pattern("\\d\\.\\d"),
    )?,
    boot_disk_size: registry.declare(
      Parameter::number(names::BOOT_DISK_SIZE)
        .with_default("80")
        .with_range(10, 2000)
        .with_description("Size of boot disk."),
    )?,
    instance_type: registry.declare(
      Parameter::string(names::INSTANCE_TYPE)
        .with_default("m4.xlarge")
        .with_constraint_description("Must be a valid EC2 instance type.")
        .with_description("Instance type"),
    )?,
    ambari_pass: registry.declare(
      Parameter::string(names::AMBARI_PASS)
        .with_default("BadPass#1")
        .with_length(8, 32)
        .with_description(
          "Password for Ambari Server. Must be at least 8 characters containing letters, numbers and symbols",
        )
        .with_pattern(PASSWORD_PATTERN)
        .with_constraint_description(
          "Must mix letters, numbers and symbols, and must not contain single quotes.",
        )
        .secret(),
    )?,
    ambari_services: registry.declare(
      Parameter::string(names::AMBARI_SERVICES)
        .with_default(DEFAULT_SERVICES)
        .with_description("HDP Services to deploy"),
    )?,
    deploy_cluster: registry.declare(
      Parameter::string(names::DEPLOY_CLUSTER)
        .with_default("true")
        .with_allowed_values(["true", "false"])
        .with_description(
          "Deploy cluster with Ambari? If false, then Ambari is installed without cluster deployment.",
        ),
    )?,
    additional_instance_count: registry.declare(
      Parameter::number(names::ADDITIONAL_INSTANCE_COUNT)
        .with_default("0")
        .with_range(0, 99)
        .with_description("Number of additional instances"),
    )?,
    java_provider: registry.declare(
      Parameter::string(names::JAVA_PROVIDER)
        .with_default("open")
        .with_description("Provider of Java packages: open or oracle")
        .with_allowed_values(["open", "oracle"])
        .with_constraint_description("open or oracle"),
    )?,
    java_version: registry.declare(
      Parameter::string(names::JAVA_VERSION)
        .with_default("8")
        .with_description("Version number of Java")
        .with_allowed_values(["7", "8"])
        .with_constraint_description("7 or 8"),
    )?,
    subnet_id: registry.declare(
      Parameter::new(
        names::SUBNET_ID,
        ParameterType::Provider("AWS::EC2::Subnet::Id".to_string()),
      )
      .with_description(
        "SubnetId of an existing subnet (for the primary network) in your Virtual Private Cloud (VPC)",
      ),
    )?,
    security_groups: registry.declare(
      Parameter::new(
        names::SECURITY_GROUPS,
        ParameterType::List("AWS::EC2::SecurityGroup::Id".to_string()),
      )
      .with_description("The Security Groups to launch the instance with"),
    )?,
    key_name: registry.declare(
      Parameter::new(
        names::KEY_NAME,
        ParameterType::Provider("AWS::EC2::KeyPair::KeyName".to_string()),
      )
      .with_constraint_description("Can contain only ASCII characters.")
      .with_description("Name of an existing EC2 KeyPair to enable SSH access to the instance"),
    )?,
  })
}
