use std::collections::{HashMap, HashSet};

use clusterform_template::{Template, Value, pseudo};

use crate::error::StackError;

/// Dependency graph over the resources of a template.
///
/// Edges come from explicit `DependsOn` entries and from `Ref`/`GetAtt`
/// values that name another resource. Building a graph also checks every
/// cross reference in the template, so a `Graph` only exists for documents
/// the deployment engine can resolve.
#[derive(Debug, Clone)]
pub struct Graph {
  /// resource -> its `DependsOn` targets.
  explicit: HashMap<String, Vec<String>>,
  /// resource -> every resource it waits for (explicit and implicit).
  dependencies: HashMap<String, Vec<String>>,
  /// resource -> resources waiting on it.
  dependents: HashMap<String, Vec<String>>,
  /// Resources with no dependencies, in template order.
  entry_points: Vec<String>,
}

impl Graph {
  /// Validate `template` and build its dependency graph.
  pub fn from_template(template: &Template) -> Result<Self, StackError> {
    let resource_ids: HashSet<&str> = template
      .resources()
      .iter()
      .map(|r| r.logical_id.as_str())
      .collect();
    let names = Names {
      template,
      resources: &resource_ids,
    };

    let mut explicit = HashMap::new();
    let mut dependencies = HashMap::new();
    let mut dependents: HashMap<String, Vec<String>> = HashMap::new();

    for resource in template.resources() {
      let id = resource.logical_id.as_str();

      let mut upstream: Vec<String> = Vec::new();
      for target in &resource.depends_on {
        if !resource_ids.contains(target.as_str()) {
          return Err(StackError::UnknownResource {
            owner: id.to_string(),
            resource: target.clone(),
          });
        }
        push_unique(&mut upstream, target);
      }
      for value in resource.values() {
        for target in names.check(id, value)? {
          push_unique(&mut upstream, target);
        }
      }

      explicit.insert(id.to_string(), resource.depends_on.clone());
      dependencies.insert(id.to_string(), upstream);
      dependents.entry(id.to_string()).or_default();
    }

    for resource in template.resources() {
      let id = &resource.logical_id;
      for target in &dependencies[id] {
        dependents.entry(target.clone()).or_default().push(id.clone());
      }
    }

    for output in template.outputs() {
      names.check(&output.name, &output.value)?;
      if let Some(parameter) = secret_reference(template, &output.value) {
        return Err(StackError::SecretInOutput {
          output: output.name.clone(),
          parameter,
        });
      }
    }

    for (name, condition) in template.conditions() {
      for value in condition.values() {
        names.check(name, value)?;
      }
      if let Some(other) = condition
        .named()
        .into_iter()
        .find(|other| !template.conditions().contains_key(*other))
      {
        return Err(StackError::UnknownCondition {
          owner: name.clone(),
          condition: other.to_string(),
        });
      }
    }

    let order: Vec<&str> = template
      .resources()
      .iter()
      .map(|r| r.logical_id.as_str())
      .collect();
    detect_cycle(&order, &dependencies)?;

    let entry_points = order
      .iter()
      .filter(|id| dependencies[**id].is_empty())
      .map(|id| id.to_string())
      .collect();

    Ok(Self {
      explicit,
      dependencies,
      dependents,
      entry_points,
    })
  }

  /// The resource's `DependsOn` targets.
  pub fn explicit_dependencies(&self, id: &str) -> &[String] {
    self.explicit.get(id).map(|v| v.as_slice()).unwrap_or(&[])
  }

  /// Every resource `id` waits for, explicit edges first.
  pub fn dependencies(&self, id: &str) -> &[String] {
    self
      .dependencies
      .get(id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Resources that wait for `id`.
  pub fn dependents(&self, id: &str) -> &[String] {
    self.dependents.get(id).map(|v| v.as_slice()).unwrap_or(&[])
  }

  /// Resources the deployment engine can create first.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }
}

/// Name lookups shared by resources, outputs and conditions.
struct Names<'a> {
  template: &'a Template,
  resources: &'a HashSet<&'a str>,
}

impl<'a> Names<'a> {
  /// Check every name used in `value` and return the resources it points at.
  fn check(&self, owner: &str, value: &'a Value) -> Result<Vec<&'a str>, StackError> {
    let mut nested = Vec::new();
    value.walk(&mut |v| nested.push(v));

    let mut targets = Vec::new();
    for v in nested {
      match v {
        Value::Ref(name) => {
          if self.resources.contains(name.as_str()) {
            targets.push(name.as_str());
          } else if !pseudo::is_pseudo(name) && self.template.parameter(name).is_none() {
            return Err(StackError::UnresolvedReference {
              owner: owner.to_string(),
              name: name.clone(),
            });
          }
        }
        Value::GetAtt { resource, .. } => {
          if !self.resources.contains(resource.as_str()) {
            return Err(StackError::UnknownResource {
              owner: owner.to_string(),
              resource: resource.clone(),
            });
          }
          targets.push(resource.as_str());
        }
        Value::FindInMap { map, .. } if !self.template.mappings().contains_key(map) => {
          return Err(StackError::UnknownMapping {
            owner: owner.to_string(),
            mapping: map.clone(),
          });
        }
        Value::If { condition, .. } if !self.template.conditions().contains_key(condition) => {
          return Err(StackError::UnknownCondition {
            owner: owner.to_string(),
            condition: condition.clone(),
          });
        }
        _ => {}
      }
    }
    Ok(targets)
  }
}

/// First no-echo parameter referenced anywhere in `value`.
fn secret_reference(template: &Template, value: &Value) -> Option<String> {
  let mut secret = None;
  value.walk(&mut |v| {
    if let Value::Ref(name) = v
      && secret.is_none()
      && template.parameter(name).is_some_and(|p| p.is_secret())
    {
      secret = Some(name.clone());
    }
  });
  secret
}

fn push_unique(list: &mut Vec<String>, id: &str) {
  if !list.iter().any(|existing| existing == id) {
    list.push(id.to_string());
  }
}

/// Check for cycles using DFS, visiting resources in template order.
fn detect_cycle(
  order: &[&str],
  dependencies: &HashMap<String, Vec<String>>,
) -> Result<(), StackError> {
  // 0 = unvisited, 1 = in progress, 2 = done
  let mut color: HashMap<&str, u8> = order.iter().map(|id| (*id, 0u8)).collect();

  fn dfs<'a>(
    node: &'a str,
    dependencies: &'a HashMap<String, Vec<String>>,
    color: &mut HashMap<&'a str, u8>,
  ) -> Option<&'a str> {
    color.insert(node, 1);

    if let Some(upstream) = dependencies.get(node) {
      for next in upstream {
        match color.get(next.as_str()) {
          Some(1) => return Some(next.as_str()),
          Some(0) => {
            if let Some(found) = dfs(next.as_str(), dependencies, color) {
              return Some(found);
            }
          }
          _ => {}
        }
      }
    }

    color.insert(node, 2);
    None
  }

  for id in order {
    if color.get(id) == Some(&0)
      && let Some(resource) = dfs(id, dependencies, &mut color)
    {
      return Err(StackError::CycleDetected {
        resource: resource.to_string(),
      });
    }
  }
  Ok(())
}
