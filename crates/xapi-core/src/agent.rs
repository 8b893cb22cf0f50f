//! Agent: a single identity carrying exactly one inverse functional
//! identifier.

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

use crate::{
  actor::ObjectType,
  error::Result,
  fields,
  identifier::{IDENTIFIER_FIELDS, InverseFunctionalIdentifier},
  path::FieldPath,
};

const AGENT_FIELDS: [&str; 6] = [
  "objectType",
  "name",
  IDENTIFIER_FIELDS[0],
  IDENTIFIER_FIELDS[1],
  IDENTIFIER_FIELDS[2],
  IDENTIFIER_FIELDS[3],
];

/// A validated individual. Fields are fixed at construction; there are no
/// setters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Agent {
  name:       Option<String>,
  identifier: InverseFunctionalIdentifier,
}

impl Agent {
  /// Validate `value` as an Agent.
  ///
  /// `objectType` may be absent or `"Agent"`; `name` may be absent or a
  /// non-empty string; exactly one identifier must be present. Any other
  /// key is rejected.
  pub fn validate(value: &Value) -> Result<Self> {
    Self::validate_at(value, &FieldPath::root())
  }

  pub(crate) fn validate_at(value: &Value, path: &FieldPath) -> Result<Self> {
    let object = fields::object(value, path)?;
    fields::reject_unknown(object, &AGENT_FIELDS, path)?;
    fields::expect_object_type(object, ObjectType::Agent, false, path)?;
    let name = fields::optional_string(object, "name", path)?;
    let identifier = InverseFunctionalIdentifier::from_object(object, path)?;
    Ok(Self { name, identifier })
  }

  pub fn object_type(&self) -> ObjectType { ObjectType::Agent }

  pub fn name(&self) -> Option<&str> { self.name.as_deref() }

  /// The populated identifier; always present on a validated Agent.
  pub fn identifier(&self) -> &InverseFunctionalIdentifier { &self.identifier }
}

impl Serialize for Agent {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let len = 2 + usize::from(self.name.is_some());
    let mut map = serializer.serialize_map(Some(len))?;
    map.serialize_entry("objectType", &ObjectType::Agent)?;
    if let Some(name) = &self.name {
      map.serialize_entry("name", name)?;
    }
    map.serialize_entry(self.identifier.field(), &self.identifier)?;
    map.end()
  }
}

impl<'de> Deserialize<'de> for Agent {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Self::validate(&value).map_err(serde::de::Error::custom)
  }
}
