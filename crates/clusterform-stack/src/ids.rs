//! Logical ids of the generated resources. These are part of the document
//! contract: outputs, scripts and operators refer to them by name.

pub const WAIT_HANDLE: &str = "waitHandleAmbari";
pub const WAIT_CONDITION: &str = "waitConditionAmbari";
pub const COORDINATOR: &str = "AmbariNode";
pub const WORKER_LAUNCH_TEMPLATE: &str = "AdditionalNodeLaunchTemplate";
pub const WORKER_GROUP: &str = "AdditionalNodes";
