use std::collections::BTreeMap;

use clusterform_template::{Mapping, Value, pseudo};

use crate::error::StackError;

pub const CENTOS7: &str = "CENTOS7";
pub const AMAZON_LINUX_2015: &str = "AMAZONLINUX2015";

const IMAGE_KEY: &str = "AMI";

const CENTOS7_IMAGES: [(&str, &str); 9] = [
  ("eu-west-1", "ami-33734044"),
  ("ap-southeast-1", "ami-2a7b6b78"),
  ("ap-southeast-2", "ami-d38dc6e9"),
  ("eu-central-1", "ami-e68f82fb"),
  ("ap-northeast-1", "ami-b80b6db8"),
  ("us-east-1", "ami-61bbf104"),
  ("sa-east-1", "ami-fd0197e0"),
  ("us-west-1", "ami-f77fbeb3"),
  ("us-west-2", "ami-d440a6e7"),
];

const AMAZON_LINUX_2015_IMAGES: [(&str, &str); 3] = [
  ("eu-west-1", "ami-d1f482b1"),
  ("us-east-1", "ami-8fcee4e5"),
  ("us-west-2", "ami-63b25203"),
];

fn image_table(images: &[(&str, &str)]) -> Mapping {
  images
    .iter()
    .map(|(region, ami)| {
      (
        region.to_string(),
        BTreeMap::from([(IMAGE_KEY.to_string(), ami.to_string())]),
      )
    })
    .collect()
}

/// Machine images keyed by platform, then region.
pub fn image_mappings() -> BTreeMap<String, Mapping> {
  BTreeMap::from([
    (CENTOS7.to_string(), image_table(&CENTOS7_IMAGES)),
    (
      AMAZON_LINUX_2015.to_string(),
      image_table(&AMAZON_LINUX_2015_IMAGES),
    ),
  ])
}

/// The `ImageId` value for `platform`, looked up by the deploying region.
pub fn image_id(platform: &str, mappings: &BTreeMap<String, Mapping>) -> Result<Value, StackError> {
  if !mappings.contains_key(platform) {
    return Err(StackError::UnknownPlatform {
      platform: platform.to_string(),
    });
  }
  Ok(Value::find_in_map(
    platform,
    Value::reference(pseudo::REGION),
    Value::literal(IMAGE_KEY),
  ))
}
