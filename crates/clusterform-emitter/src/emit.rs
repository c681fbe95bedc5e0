use clusterform_template::Template;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::EmitError;

/// Largest template body the deployment engine accepts inline.
pub const MAX_TEMPLATE_BODY: usize = 51_200;

const INDENT: &[u8] = b"    ";

/// Pretty JSON: keys sorted, four-space indent.
pub fn emit(template: &Template) -> Result<String, EmitError> {
  let document = sort_keys(serde_json::to_value(template)?);

  let mut buf = Vec::new();
  let mut serializer =
    serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
  document.serialize(&mut serializer)?;

  Ok(String::from_utf8(buf)?)
}

/// Single-line JSON with sorted keys, the form sent for validation.
pub fn emit_compact(template: &Template) -> Result<String, EmitError> {
  let document = sort_keys(serde_json::to_value(template)?);
  Ok(serde_json::to_string(&document)?)
}

/// Rebuild every object with its keys in lexical order, whatever map
/// ordering serde_json was compiled with.
fn sort_keys(value: Value) -> Value {
  match value {
    Value::Object(map) => {
      let mut entries: Vec<(String, Value)> = map.into_iter().collect();
      entries.sort_by(|a, b| a.0.cmp(&b.0));
      Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
    }
    Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clusterform_template::{Output, Parameter, Resource, ResourceKind, Value as TemplateValue};

  fn template() -> Template {
    let mut template = Template::new("emit test");
    template.set_parameters(vec![Parameter::string("InstanceType").with_default("m4.xlarge")]);
    template
      .add_resource(
        Resource::new("AmbariNode", ResourceKind::Instance)
          .with_property("InstanceType", TemplateValue::reference("InstanceType"))
          .with_property("ImageId", "ami-61bbf104"),
      )
      .unwrap();
    template
      .add_output(Output::new("Region", TemplateValue::reference("AWS::Region")))
      .unwrap();
    template
  }

  #[test]
  fn test_pretty_output_shape() {
    let text = emit(&template()).unwrap();

    assert!(text.starts_with("{\n    \"AWSTemplateFormatVersion\": \"2010-09-09\",\n"));
    assert!(text.contains("\n        \"AmbariNode\": {\n"));
  }

  #[test]
  fn test_keys_sorted() {
    let text = emit(&template()).unwrap();

    let order = [
      "\"AWSTemplateFormatVersion\"",
      "\"Description\"",
      "\"Outputs\"",
      "\"Parameters\"",
      "\"Resources\"",
    ];
    let positions: Vec<usize> = order.iter().map(|k| text.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|p| p[0] < p[1]));

    let image = text.find("\"ImageId\"").unwrap();
    let instance_type = text.find("\"Ref\": \"InstanceType\"").unwrap();
    assert!(image < instance_type);
  }

  #[test]
  fn test_compact_matches_pretty() {
    let template = template();
    let compact = emit_compact(&template).unwrap();
    let pretty = emit(&template).unwrap();

    assert!(!compact.contains('\n'));
    assert_eq!(
      serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
      serde_json::from_str::<serde_json::Value>(&pretty).unwrap()
    );
  }

  #[test]
  fn test_non_ascii_text_kept_intact() {
    let template = Template::new("Clúster Ambari über HDP");
    let text = emit(&template).unwrap();

    assert!(text.contains("\"Description\": \"Clúster Ambari über HDP\""));
    assert!(!text.contains('\u{FFFD}'));
  }
}
