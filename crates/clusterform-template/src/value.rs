use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A property value inside a template document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// Text known at generation time.
  Literal(String),
  Number(i64),
  Bool(bool),
  List(Vec<Value>),
  Object(BTreeMap<String, Value>),
  /// `{"Ref": name}`: a parameter, pseudo parameter or resource, resolved at deploy time.
  Ref(String),
  /// `{"Fn::GetAtt": [resource, attribute]}`, resolved once the resource exists.
  GetAtt { resource: String, attribute: String },
  Join { delimiter: String, values: Vec<Value> },
  FindInMap {
    map: String,
    top_key: Box<Value>,
    second_key: Box<Value>,
  },
  Base64(Box<Value>),
  If {
    condition: String,
    then: Box<Value>,
    otherwise: Box<Value>,
  },
}

impl Value {
  pub fn literal(text: impl Into<String>) -> Self {
    Value::Literal(text.into())
  }

  pub fn reference(name: impl Into<String>) -> Self {
    Value::Ref(name.into())
  }

  pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
    Value::GetAtt {
      resource: resource.into(),
      attribute: attribute.into(),
    }
  }

  pub fn join(delimiter: impl Into<String>, values: Vec<Value>) -> Self {
    Value::Join {
      delimiter: delimiter.into(),
      values,
    }
  }

  pub fn find_in_map(map: impl Into<String>, top_key: Value, second_key: Value) -> Self {
    Value::FindInMap {
      map: map.into(),
      top_key: Box::new(top_key),
      second_key: Box::new(second_key),
    }
  }

  pub fn base64(value: Value) -> Self {
    Value::Base64(Box::new(value))
  }

  pub fn conditional(condition: impl Into<String>, then: Value, otherwise: Value) -> Self {
    Value::If {
      condition: condition.into(),
      then: Box::new(then),
      otherwise: Box::new(otherwise),
    }
  }

  /// Build an object value from key/value pairs.
  pub fn object<K, I>(entries: I) -> Self
  where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
  {
    Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }

  /// Returns true if this value, or anything nested in it, is only known at deploy time.
  pub fn is_deferred(&self) -> bool {
    let mut deferred = false;
    self.walk(&mut |v| {
      if matches!(v, Value::Ref(_) | Value::GetAtt { .. }) {
        deferred = true;
      }
    });
    deferred
  }

  /// Visit this value and every value nested inside it, depth first.
  pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Value)) {
    visit(self);
    match self {
      Value::List(items) => items.iter().for_each(|v| v.walk(visit)),
      Value::Object(map) => map.values().for_each(|v| v.walk(visit)),
      Value::Join { values, .. } => values.iter().for_each(|v| v.walk(visit)),
      Value::FindInMap {
        top_key,
        second_key,
        ..
      } => {
        top_key.walk(visit);
        second_key.walk(visit);
      }
      Value::Base64(inner) => inner.walk(visit),
      Value::If {
        then, otherwise, ..
      } => {
        then.walk(visit);
        otherwise.walk(visit);
      }
      Value::Literal(_)
      | Value::Number(_)
      | Value::Bool(_)
      | Value::Ref(_)
      | Value::GetAtt { .. } => {}
    }
  }

  /// Render the value as plain text, showing deferred references as placeholders.
  ///
  /// `Ref` renders as `${Ref:Name}` and `GetAtt` as `${GetAtt:Resource.Attribute}`.
  /// Intended for inspection and logs, never for the document itself.
  pub fn render_preview(&self) -> String {
    match self {
      Value::Literal(text) => text.clone(),
      Value::Number(n) => n.to_string(),
      Value::Bool(b) => b.to_string(),
      Value::List(items) => items
        .iter()
        .map(Value::render_preview)
        .collect::<Vec<_>>()
        .join(","),
      Value::Object(map) => {
        let entries: Vec<String> = map
          .iter()
          .map(|(k, v)| format!("{}={}", k, v.render_preview()))
          .collect();
        format!("{{{}}}", entries.join(","))
      }
      Value::Ref(name) => format!("${{Ref:{}}}", name),
      Value::GetAtt {
        resource,
        attribute,
      } => format!("${{GetAtt:{}.{}}}", resource, attribute),
      Value::Join { delimiter, values } => values
        .iter()
        .map(Value::render_preview)
        .collect::<Vec<_>>()
        .join(delimiter),
      Value::FindInMap {
        map,
        top_key,
        second_key,
      } => format!(
        "${{FindInMap:{}.{}.{}}}",
        map,
        top_key.render_preview(),
        second_key.render_preview()
      ),
      Value::Base64(inner) => inner.render_preview(),
      Value::If {
        condition,
        then,
        otherwise,
      } => format!(
        "${{If:{}?{}:{}}}",
        condition,
        then.render_preview(),
        otherwise.render_preview()
      ),
    }
  }
}

impl From<&str> for Value {
  fn from(text: &str) -> Self {
    Value::Literal(text.to_string())
  }
}

impl From<String> for Value {
  fn from(text: String) -> Self {
    Value::Literal(text)
  }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self {
    Value::Number(n)
  }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self {
    Value::Number(i64::from(n))
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

impl From<Vec<Value>> for Value {
  fn from(items: Vec<Value>) -> Self {
    Value::List(items)
  }
}

/// Serialize `{key: value}`, the shape every intrinsic function takes.
pub(crate) fn single_key<S, T>(serializer: S, key: &str, value: &T) -> Result<S::Ok, S::Error>
where
  S: Serializer,
  T: Serialize + ?Sized,
{
  let mut map = serializer.serialize_map(Some(1))?;
  map.serialize_entry(key, value)?;
  map.end()
}

impl Serialize for Value {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Value::Literal(text) => serializer.serialize_str(text),
      Value::Number(n) => serializer.serialize_i64(*n),
      Value::Bool(b) => serializer.serialize_bool(*b),
      Value::List(items) => items.serialize(serializer),
      Value::Object(map) => map.serialize(serializer),
      Value::Ref(name) => single_key(serializer, "Ref", name),
      Value::GetAtt {
        resource,
        attribute,
      } => single_key(serializer, "Fn::GetAtt", &[resource, attribute]),
      Value::Join { delimiter, values } => single_key(serializer, "Fn::Join", &(delimiter, values)),
      Value::FindInMap {
        map,
        top_key,
        second_key,
      } => single_key(serializer, "Fn::FindInMap", &(map, top_key, second_key)),
      Value::Base64(inner) => single_key(serializer, "Fn::Base64", inner),
      Value::If {
        condition,
        then,
        otherwise,
      } => single_key(serializer, "Fn::If", &(condition, then, otherwise)),
    }
  }
}
