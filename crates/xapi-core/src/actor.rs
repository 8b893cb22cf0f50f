//! Actor: the top-level identity value of a statement.
//!
//! [`Actor::resolve`] reads the `objectType` discriminant before any
//! field-level validation. An absent discriminant means Agent, so an input
//! without `objectType` never reaches the Group path even if it carries a
//! `member` list.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::{
  agent::Agent,
  error::Result,
  fields,
  group::Group,
  identifier::InverseFunctionalIdentifier,
  path::FieldPath,
};

/// The `objectType` discriminant.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
pub enum ObjectType {
  #[default]
  Agent,
  Group,
}

/// A validated Agent or Group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Actor {
  Agent(Agent),
  Group(Group),
}

impl Actor {
  /// Resolve the variant of `value` and validate it.
  ///
  /// Errors from the Agent or Group validator are returned unchanged.
  pub fn resolve(value: &Value) -> Result<Self> {
    let path = FieldPath::root();
    let object = fields::object(value, &path)?;
    match fields::object_type(object, &path)?.unwrap_or_default() {
      ObjectType::Agent => Agent::validate_at(value, &path).map(Self::Agent),
      ObjectType::Group => Group::validate_at(value, &path).map(Self::Group),
    }
  }

  pub fn object_type(&self) -> ObjectType {
    match self {
      Self::Agent(_) => ObjectType::Agent,
      Self::Group(_) => ObjectType::Group,
    }
  }

  pub fn name(&self) -> Option<&str> {
    match self {
      Self::Agent(a) => a.name(),
      Self::Group(g) => g.name(),
    }
  }

  /// The populated identifier. Only an anonymous Group has none.
  pub fn identifier(&self) -> Option<&InverseFunctionalIdentifier> {
    match self {
      Self::Agent(a) => Some(a.identifier()),
      Self::Group(g) => g.identifier(),
    }
  }

  pub fn as_agent(&self) -> Option<&Agent> {
    match self {
      Self::Agent(a) => Some(a),
      Self::Group(_) => None,
    }
  }

  pub fn as_group(&self) -> Option<&Group> {
    match self {
      Self::Group(g) => Some(g),
      Self::Agent(_) => None,
    }
  }

  /// The normalised wire form.
  pub fn to_value(&self) -> serde_json::Result<Value> {
    serde_json::to_value(self)
  }
}

impl From<Agent> for Actor {
  fn from(agent: Agent) -> Self { Self::Agent(agent) }
}

impl From<Group> for Actor {
  fn from(group: Group) -> Self { Self::Group(group) }
}

impl<'de> Deserialize<'de> for Actor {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Self::resolve(&value).map_err(serde::de::Error::custom)
  }
}
