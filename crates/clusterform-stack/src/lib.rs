//! Clusterform Stack
//!
//! Turns the declared parameters into the complete resource graph:
//!
//! - [`declare_parameters`] registers the stack's inputs
//! - [`build_device_list`] lays out one root volume plus the ephemeral disks
//! - [`generate`] synthesizes a bootstrap script per role and hands everything
//!   to [`assemble`], which adds resources in dependency order and validates
//!   the result through [`Graph`]
//!
//! The topology is fixed: one coordinator instance, one worker launch
//! template, one scaling group and a wait handle/condition pair.

mod assembler;
mod config;
mod devices;
mod error;
mod graph;
pub mod ids;
mod mappings;
mod parameters;

pub use assembler::{DESCRIPTION, RoleLayout, assemble, generate};
pub use config::StackConfig;
pub use devices::{
  BlockDeviceSpec, DeviceKind, MAX_EPHEMERAL_DISKS, build_device_list, device_mappings,
};
pub use error::StackError;
pub use graph::Graph;
pub use mappings::{AMAZON_LINUX_2015, CENTOS7, image_id, image_mappings};
pub use parameters::{StackParameters, declare_parameters, names};
