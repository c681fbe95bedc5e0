use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::validator::TemplateValidator;

/// Validates templates with the CloudFormation `ValidateTemplate` API.
#[derive(Debug, Clone)]
pub struct CloudFormationValidator {
  client: Client,
  region: String,
}

impl CloudFormationValidator {
  /// Build a client from the ambient AWS configuration, pinned to `region`.
  pub async fn from_env(region: impl Into<String>) -> Self {
    let region = region.into();
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
      .region(Region::new(region.clone()))
      .load()
      .await;
    Self {
      client: Client::new(&sdk_config),
      region,
    }
  }
}

#[async_trait]
impl TemplateValidator for CloudFormationValidator {
  async fn validate(&self, body: &str) -> Result<(), ValidationError> {
    debug!(region = %self.region, bytes = body.len(), "validating template");

    match self.client.validate_template().template_body(body).send().await {
      Ok(_) => Ok(()),
      Err(err) => match err.as_service_error() {
        Some(service) => {
          let message = service
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| service.to_string());
          warn!(region = %self.region, %message, "template rejected");
          Err(ValidationError::Rejected { message })
        }
        None => Err(ValidationError::Unavailable {
          message: DisplayErrorContext(&err).to_string(),
        }),
      },
    }
  }
}
