//! Group: a collection of Agents, either identified or anonymous.
//!
//! Resolution order is fixed: the identified shape is tried first, then the
//! anonymous shape. When both fail, the reported failure comes from the
//! identified shape if the input carries any identifier field, and from the
//! anonymous shape otherwise.
//!
//! Members are validated as [`Agent`]s. A Group can never contain a Group.

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;
use strum::{AsRefStr, Display};

use crate::{
  actor::ObjectType,
  agent::Agent,
  error::{Error, Result},
  fields::{self, Object},
  identifier::{IDENTIFIER_FIELDS, InverseFunctionalIdentifier, present_identifiers},
  path::FieldPath,
};

const GROUP_FIELDS: [&str; 7] = [
  "objectType",
  "name",
  "member",
  IDENTIFIER_FIELDS[0],
  IDENTIFIER_FIELDS[1],
  IDENTIFIER_FIELDS[2],
  IDENTIFIER_FIELDS[3],
];

/// The two candidate shapes of a Group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum GroupShape {
  Identified,
  Anonymous,
}

// ─── Shapes ──────────────────────────────────────────────────────────────────

/// A Group carrying exactly one identifier and an optional member list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifiedGroup {
  name:       Option<String>,
  identifier: InverseFunctionalIdentifier,
  member:     Option<Vec<Agent>>,
}

impl IdentifiedGroup {
  fn validate(object: &Object, path: &FieldPath) -> Result<Self> {
    fields::reject_unknown(object, &GROUP_FIELDS, path)?;
    fields::expect_object_type(object, ObjectType::Group, true, path)?;
    let name = fields::optional_string(object, "name", path)?;
    let member = members(object, path)?;
    let identifier = InverseFunctionalIdentifier::from_object(object, path)?;
    Ok(Self {
      name,
      identifier,
      member,
    })
  }

  pub fn name(&self) -> Option<&str> { self.name.as_deref() }

  pub fn identifier(&self) -> &InverseFunctionalIdentifier { &self.identifier }

  /// The member list as supplied; `None` when the input had no `member`.
  pub fn member(&self) -> Option<&[Agent]> { self.member.as_deref() }
}

/// A Group defined only by its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnonymousGroup {
  name:   Option<String>,
  member: Vec<Agent>,
}

impl AnonymousGroup {
  fn validate(object: &Object, path: &FieldPath) -> Result<Self> {
    fields::reject_unknown(object, &GROUP_FIELDS, path)?;
    if let Some(field) = present_identifiers(object).first() {
      return Err(Error::IdentifierOnAnonymousGroup {
        path: path.key(field),
      });
    }
    fields::expect_object_type(object, ObjectType::Group, true, path)?;
    let name = fields::optional_string(object, "name", path)?;
    let member = members(object, path)?.ok_or_else(|| Error::MissingField {
      path: path.key("member"),
    })?;
    if member.is_empty() {
      return Err(Error::format(
        path.key("member"),
        "must contain at least 1 items",
      ));
    }
    Ok(Self { name, member })
  }

  pub fn name(&self) -> Option<&str> { self.name.as_deref() }

  /// Never empty.
  pub fn member(&self) -> &[Agent] { &self.member }
}

/// Validate the optional `member` array, each entry as an Agent.
fn members(object: &Object, path: &FieldPath) -> Result<Option<Vec<Agent>>> {
  let member_path = path.key("member");
  let Some(value) = object.get("member") else {
    return Ok(None);
  };
  let entries = value
    .as_array()
    .ok_or_else(|| Error::format(member_path.clone(), "must be an array"))?;
  entries
    .iter()
    .enumerate()
    .map(|(i, entry)| Agent::validate_at(entry, &member_path.index(i)))
    .collect::<Result<Vec<_>>>()
    .map(Some)
}

// ─── Group ───────────────────────────────────────────────────────────────────

/// A validated Group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Group {
  Identified(IdentifiedGroup),
  Anonymous(AnonymousGroup),
}

impl Group {
  /// Validate `value` as a Group. `objectType` must be `"Group"`.
  pub fn validate(value: &Value) -> Result<Self> {
    Self::validate_at(value, &FieldPath::root())
  }

  pub(crate) fn validate_at(value: &Value, path: &FieldPath) -> Result<Self> {
    let object = fields::object(value, path)?;

    let identified_err = match IdentifiedGroup::validate(object, path) {
      Ok(group) => return Ok(Self::Identified(group)),
      Err(e) => e,
    };
    let anonymous_err = match AnonymousGroup::validate(object, path) {
      Ok(group) => return Ok(Self::Anonymous(group)),
      Err(e) => e,
    };

    let (shape, source) = if present_identifiers(object).is_empty() {
      (GroupShape::Anonymous, anonymous_err)
    } else {
      (GroupShape::Identified, identified_err)
    };
    Err(Error::GroupShape {
      shape,
      source: Box::new(source),
    })
  }

  pub fn object_type(&self) -> ObjectType { ObjectType::Group }

  pub fn shape(&self) -> GroupShape {
    match self {
      Self::Identified(_) => GroupShape::Identified,
      Self::Anonymous(_) => GroupShape::Anonymous,
    }
  }

  pub fn is_anonymous(&self) -> bool { matches!(self, Self::Anonymous(_)) }

  pub fn name(&self) -> Option<&str> {
    match self {
      Self::Identified(g) => g.name(),
      Self::Anonymous(g) => g.name(),
    }
  }

  /// The populated identifier, or `None` for an anonymous group.
  pub fn identifier(&self) -> Option<&InverseFunctionalIdentifier> {
    match self {
      Self::Identified(g) => Some(g.identifier()),
      Self::Anonymous(_) => None,
    }
  }

  /// Members in input order; empty when an identified group has none.
  pub fn members(&self) -> &[Agent] {
    match self {
      Self::Identified(g) => g.member().unwrap_or_default(),
      Self::Anonymous(g) => g.member(),
    }
  }
}

impl Serialize for Group {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let member = match self {
      Self::Identified(g) => g.member(),
      Self::Anonymous(g) => Some(g.member()),
    };
    let len = 1
      + usize::from(self.name().is_some())
      + usize::from(member.is_some())
      + usize::from(self.identifier().is_some());
    let mut map = serializer.serialize_map(Some(len))?;
    map.serialize_entry("objectType", &ObjectType::Group)?;
    if let Some(name) = self.name() {
      map.serialize_entry("name", name)?;
    }
    if let Some(member) = member {
      map.serialize_entry("member", member)?;
    }
    if let Some(identifier) = self.identifier() {
      map.serialize_entry(identifier.field(), identifier)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for Group {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Self::validate(&value).map_err(serde::de::Error::custom)
  }
}
