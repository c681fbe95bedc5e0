//! Clusterform Emitter
//!
//! Renders a [`Template`](clusterform_template::Template) to JSON and
//! publishes it: render, check the size limit, optionally validate with a
//! [`TemplateValidator`], then write. A failure at any step leaves the
//! output path untouched.

mod cloudformation;
mod emit;
mod error;
mod publish;
mod validator;

pub use cloudformation::CloudFormationValidator;
pub use emit::{MAX_TEMPLATE_BODY, emit, emit_compact};
pub use error::{EmitError, ValidationError};
pub use publish::{PublishReport, publish};
pub use validator::TemplateValidator;
