use async_trait::async_trait;

use crate::error::ValidationError;

/// A remote check of a rendered template.
///
/// Implementations make one best-effort call; retries are the caller's business.
#[async_trait]
pub trait TemplateValidator: Send + Sync {
  /// Submit the compact template body. `Ok` means the service accepted it.
  async fn validate(&self, body: &str) -> Result<(), ValidationError>;
}
