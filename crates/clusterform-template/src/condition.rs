use serde::{Serialize, Serializer};

use crate::value::{Value, single_key};

/// A condition declaration, referenced by name from `Fn::If`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
  Equals(Value, Value),
  Not(Box<Condition>),
  And(Vec<Condition>),
  Or(Vec<Condition>),
  /// `{"Condition": name}`: reuse another declared condition.
  Named(String),
}

impl Condition {
  pub fn equals(left: impl Into<Value>, right: impl Into<Value>) -> Self {
    Condition::Equals(left.into(), right.into())
  }

  pub fn not(condition: Condition) -> Self {
    Condition::Not(Box::new(condition))
  }

  /// Values compared anywhere inside this condition.
  pub fn values(&self) -> Vec<&Value> {
    match self {
      Condition::Equals(left, right) => vec![left, right],
      Condition::Not(inner) => inner.values(),
      Condition::And(items) | Condition::Or(items) => {
        items.iter().flat_map(|c| c.values()).collect()
      }
      Condition::Named(_) => Vec::new(),
    }
  }

  /// Names of other conditions this one refers to.
  pub fn named(&self) -> Vec<&str> {
    match self {
      Condition::Named(name) => vec![name.as_str()],
      Condition::Not(inner) => inner.named(),
      Condition::And(items) | Condition::Or(items) => {
        items.iter().flat_map(|c| c.named()).collect()
      }
      Condition::Equals(..) => Vec::new(),
    }
  }
}

impl Serialize for Condition {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Condition::Equals(left, right) => single_key(serializer, "Fn::Equals", &(left, right)),
      Condition::Not(inner) => single_key(serializer, "Fn::Not", &[inner]),
      Condition::And(items) => single_key(serializer, "Fn::And", items),
      Condition::Or(items) => single_key(serializer, "Fn::Or", items),
      Condition::Named(name) => single_key(serializer, "Condition", name),
    }
  }
}
