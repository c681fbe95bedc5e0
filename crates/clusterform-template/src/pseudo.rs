//! Pseudo parameters supplied by the deployment engine.

pub const ACCOUNT_ID: &str = "AWS::AccountId";
pub const NOTIFICATION_ARNS: &str = "AWS::NotificationARNs";
pub const NO_VALUE: &str = "AWS::NoValue";
pub const PARTITION: &str = "AWS::Partition";
pub const REGION: &str = "AWS::Region";
pub const STACK_ID: &str = "AWS::StackId";
pub const STACK_NAME: &str = "AWS::StackName";
pub const URL_SUFFIX: &str = "AWS::URLSuffix";

const ALL: [&str; 8] = [
  ACCOUNT_ID,
  NOTIFICATION_ARNS,
  NO_VALUE,
  PARTITION,
  REGION,
  STACK_ID,
  STACK_NAME,
  URL_SUFFIX,
];

/// Returns true if `name` is a pseudo parameter rather than a declared one.
pub fn is_pseudo(name: &str) -> bool {
  ALL.contains(&name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_pseudo() {
    assert!(is_pseudo("AWS::Region"));
    assert!(is_pseudo(STACK_NAME));
    assert!(!is_pseudo("AmbariPass"));
    assert!(!is_pseudo("AWS::Nope"));
  }
}
