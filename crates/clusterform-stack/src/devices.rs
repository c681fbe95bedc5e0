use clusterform_template::Value;

use crate::error::StackError;

/// Highest number of ephemeral disks that still get a device letter.
pub const MAX_EPHEMERAL_DISKS: usize = 24;

const FIRST_EPHEMERAL_LETTER: u8 = b'b';
const ROOT_SUFFIX: &str = "a1";

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceKind {
  /// Persistent boot volume.
  Root { size: Value, storage_class: String },
  /// Instance-store scratch disk; `index` picks the `ephemeralN` virtual name.
  Ephemeral { index: usize },
}

/// One block device attachment of an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDeviceSpec {
  pub device_name: String,
  pub kind: DeviceKind,
}

impl BlockDeviceSpec {
  pub fn is_root(&self) -> bool {
    matches!(self.kind, DeviceKind::Root { .. })
  }

  /// The `BlockDeviceMappings` entry for this device.
  pub fn to_value(&self) -> Value {
    match &self.kind {
      DeviceKind::Root { size, storage_class } => Value::object([
        ("DeviceName", Value::literal(&self.device_name)),
        (
          "Ebs",
          Value::object([
            ("VolumeSize", size.clone()),
            ("VolumeType", Value::literal(storage_class)),
          ]),
        ),
      ]),
      DeviceKind::Ephemeral { index } => Value::object([
        ("DeviceName", Value::literal(&self.device_name)),
        ("VirtualName", Value::literal(format!("ephemeral{}", index))),
      ]),
    }
  }
}

/// Lay out the root volume followed by `disk_count` ephemeral disks.
///
/// The root device is `{base}a1`; ephemeral disk `i` is `{base}` plus the
/// `i`-th letter from `b`, so names increase strictly and match the
/// `/dev/xvd[b-z]` glob the bootstrap script scans.
pub fn build_device_list(
  base: &str,
  disk_count: usize,
  root_size: impl Into<Value>,
  storage_class: &str,
) -> Result<Vec<BlockDeviceSpec>, StackError> {
  if disk_count > MAX_EPHEMERAL_DISKS {
    return Err(StackError::TooManyDisks {
      count: disk_count,
      max: MAX_EPHEMERAL_DISKS,
    });
  }

  let mut devices = Vec::with_capacity(disk_count + 1);
  devices.push(BlockDeviceSpec {
    device_name: format!("{}{}", base, ROOT_SUFFIX),
    kind: DeviceKind::Root {
      size: root_size.into(),
      storage_class: storage_class.to_string(),
    },
  });

  // bounded above, so the letter never leaves b..=y
  for (index, letter) in (FIRST_EPHEMERAL_LETTER..).take(disk_count).enumerate() {
    devices.push(BlockDeviceSpec {
      device_name: format!("{}{}", base, char::from(letter)),
      kind: DeviceKind::Ephemeral { index },
    });
  }

  Ok(devices)
}

/// Render a device list as the `BlockDeviceMappings` property value.
pub fn device_mappings(devices: &[BlockDeviceSpec]) -> Value {
  Value::List(devices.iter().map(BlockDeviceSpec::to_value).collect())
}
