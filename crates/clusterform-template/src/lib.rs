//! Clusterform Template
//!
//! This crate contains the serializable document types that make up a
//! CloudFormation template: parameters, mappings, conditions, resources and
//! outputs, plus the tagged [`Value`] type used for every property.
//!
//! Values come in two flavours:
//! - generation-time values (`Literal`, `Number`, `Bool`) that are known when
//!   the document is written
//! - deferred values (`Ref`, `GetAtt`) that the deployment engine resolves
//!   when the stack is created
//!
//! The intrinsic function variants (`Join`, `FindInMap`, `Base64`, `If`)
//! compose both kinds. Nothing in this crate talks to a deployment engine;
//! turning a [`Template`] into text is the emitter's job.

mod condition;
mod error;
mod output;
mod parameter;
pub mod pseudo;
mod resource;
mod template;
mod value;

pub use condition::Condition;
pub use error::TemplateError;
pub use output::Output;
pub use parameter::{Constraints, Parameter, ParameterType};
pub use resource::{CreationPolicy, Resource, ResourceKind, ResourceSignal};
pub use template::{FORMAT_VERSION, Mapping, Template};
pub use value::Value;
