use serde::Deserialize;

use crate::mappings::CENTOS7;

/// Generation-time knobs. Every field has a default, so an empty JSON
/// object (or no config file at all) yields the stock stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
  /// Image mapping used for both roles.
  pub platform: String,
  pub ephemeral_disk_count: usize,
  /// Device name prefix, e.g. `/dev/sd` or `/dev/xvd`.
  pub device_base: String,
  pub root_volume_type: String,
  pub wait_timeout_secs: u32,
  /// ISO-8601 duration for the coordinator's readiness signal.
  pub coordinator_signal_timeout: String,
  pub worker_signal_timeout: String,
}

impl Default for StackConfig {
  fn default() -> Self {
    Self {
      platform: CENTOS7.to_string(),
      ephemeral_disk_count: 24,
      device_base: "/dev/sd".to_string(),
      root_volume_type: "gp2".to_string(),
      wait_timeout_secs: 3600,
      coordinator_signal_timeout: "PT15M".to_string(),
      worker_signal_timeout: "PT30M".to_string(),
    }
  }
}
