//! Clusterform Bootstrap
//!
//! Builds the user-data script each instance runs on first boot. A script has
//! two parts:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ prefix: shebang, shell options, one `export key=value` per   │
//! │ ExportKey. Values are literals or deferred references that   │
//! │ the deployment engine fills in (e.g. the coordinator's DNS). │
//! ├──────────────────────────────────────────────────────────────┤
//! │ body: fixed shell text, identical for every role, that only  │
//! │ reads the exported variables at run time.                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Role-specific behaviour comes only from the prefix values.

mod context;
mod error;
mod role;
mod script;

pub use context::{BootstrapContext, BootstrapContextBuilder, ExportKey};
pub use error::BootstrapError;
pub use role::Role;
pub use script::{BODY, Script, synthesize};
