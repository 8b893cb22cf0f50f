//! Statement-listing query parameters.
//!
//! [`StatementQuery::validate`] checks an untyped parameter object. Values may
//! arrive as native JSON or as the text a query string carries: booleans as
//! `"true"`/`"false"`, integers as decimal text, `agent` as JSON text, and a
//! repeated key as an array (see [`query_object`]).
//!
//! Parameters are checked in the order they are declared below and the first
//! failure is returned.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value, map::Entry};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
  actor::ObjectType,
  error::{Error, Result},
  fields::{self, Object},
  identifier::{IDENTIFIER_FIELDS, InverseFunctionalIdentifier},
  path::FieldPath,
};

/// Every parameter the statement-listing endpoint accepts.
pub const PARAMETERS: [&str; 14] = [
  "statementId",
  "voidedStatementId",
  "agent",
  "verb",
  "activity",
  "registration",
  "related_activities",
  "related_agents",
  "since",
  "until",
  "limit",
  "format",
  "attachments",
  "ascending",
];

/// Largest integer a JSON number carries without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const AGENT_FILTER_FIELDS: [&str; 5] = [
  "objectType",
  IDENTIFIER_FIELDS[0],
  IDENTIFIER_FIELDS[1],
  IDENTIFIER_FIELDS[2],
  IDENTIFIER_FIELDS[3],
];

// ─── Types ───────────────────────────────────────────────────────────────────

/// How much of each statement's Agents, Activities and Verbs to return.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatementFormat {
  Ids,
  #[default]
  Exact,
  Canonical,
}

/// The `agent` filter: a single identifier, never a full Actor.
///
/// Anonymous groups have no stable identifier and so cannot be filtered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFilter {
  object_type: ObjectType,
  identifier:  InverseFunctionalIdentifier,
}

impl AgentFilter {
  /// Validate an agent filter object, or JSON text encoding one.
  pub fn validate(value: &Value) -> Result<Self> {
    Self::validate_at(value, &FieldPath::root())
  }

  fn validate_at(value: &Value, path: &FieldPath) -> Result<Self> {
    let decoded;
    let value = match value {
      Value::String(text) => {
        decoded = serde_json::from_str::<Value>(text)
          .map_err(|_| Error::format(path.clone(), "must be a valid JSON object"))?;
        &decoded
      }
      other => other,
    };
    let object = fields::object(value, path)?;
    fields::reject_unknown(object, &AGENT_FILTER_FIELDS, path)?;
    let object_type = fields::object_type(object, path)?.unwrap_or_default();
    let identifier = InverseFunctionalIdentifier::from_object(object, path)?;
    Ok(Self {
      object_type,
      identifier,
    })
  }

  pub fn object_type(&self) -> ObjectType { self.object_type }

  pub fn identifier(&self) -> &InverseFunctionalIdentifier { &self.identifier }
}

impl Serialize for AgentFilter {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("objectType", &self.object_type)?;
    map.serialize_entry(self.identifier.field(), &self.identifier)?;
    map.end()
  }
}

/// Validated, defaulted statement-listing parameters.
///
/// Empty vectors mean the parameter was absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatementQuery {
  #[serde(rename = "statementId", skip_serializing_if = "Vec::is_empty")]
  pub statement_id:        Vec<Uuid>,
  #[serde(rename = "voidedStatementId", skip_serializing_if = "Vec::is_empty")]
  pub voided_statement_id: Vec<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub agent:               Option<AgentFilter>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub verb:                Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub activity:            Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub registration:        Vec<Uuid>,
  pub related_activities:  bool,
  pub related_agents:      bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub since:               Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub until:               Option<DateTime<Utc>>,
  /// Maximum number of statements; `0` means no limit.
  pub limit:               u64,
  pub format:              StatementFormat,
  pub attachments:         bool,
  pub ascending:           bool,
}

impl StatementQuery {
  /// Validate an untyped parameter object and apply defaults.
  pub fn validate(value: &Value) -> Result<Self> {
    let root = FieldPath::root();
    let params = fields::object(value, &root)?;
    fields::reject_unknown(params, &PARAMETERS, &root)?;

    Ok(Self {
      statement_id:        guids(params, "statementId")?,
      voided_statement_id: guids(params, "voidedStatementId")?,
      agent:               params
        .get("agent")
        .map(|v| AgentFilter::validate_at(v, &root.key("agent")))
        .transpose()?,
      verb:                uris(params, "verb")?,
      activity:            uris(params, "activity")?,
      registration:        guids(params, "registration")?,
      related_activities:  boolean(params, "related_activities")?,
      related_agents:      boolean(params, "related_agents")?,
      since:               date_time(params, "since")?,
      until:               date_time(params, "until")?,
      limit:               limit(params)?,
      format:              format(params)?,
      attachments:         boolean(params, "attachments")?,
      ascending:           boolean(params, "ascending")?,
    })
  }

  /// Validate decoded query-string pairs.
  pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self::validate(&query_object(pairs))
  }
}

/// Fold decoded query-string pairs into a JSON object. A key that occurs more
/// than once becomes an array of its values, in order.
pub fn query_object<I, K, V>(pairs: I) -> Value
where
  I: IntoIterator<Item = (K, V)>,
  K: Into<String>,
  V: Into<String>,
{
  let mut map = Map::new();
  for (key, value) in pairs {
    let key: String = key.into();
    let value = Value::String(value.into());
    match map.entry(key) {
      Entry::Vacant(slot) => {
        slot.insert(value);
      }
      Entry::Occupied(mut slot) => match slot.get_mut() {
        Value::Array(values) => values.push(value),
        existing => {
          let first = existing.take();
          *existing = Value::Array(vec![first, value]);
        }
      },
    }
  }
  Value::Object(map)
}

// ─── Parameter rules ─────────────────────────────────────────────────────────

/// A single value or a non-empty array of values, each with its own path.
fn one_or_many<'a>(
  params: &'a Object,
  key: &str,
) -> Result<Vec<(FieldPath, &'a Value)>> {
  let path = FieldPath::root().key(key);
  match params.get(key) {
    None => Ok(Vec::new()),
    Some(Value::Array(values)) if values.is_empty() => {
      Err(Error::format(path, "must contain at least 1 items"))
    }
    Some(Value::Array(values)) => Ok(
      values
        .iter()
        .enumerate()
        .map(|(i, v)| (path.index(i), v))
        .collect(),
    ),
    Some(value) => Ok(vec![(path, value)]),
  }
}

fn guids(params: &Object, key: &str) -> Result<Vec<Uuid>> {
  one_or_many(params, key)?
    .into_iter()
    .map(|(path, value)| {
      let text = fields::string(value, &path)?;
      let urn = text.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("urn:"));
      match Uuid::parse_str(&text) {
        Ok(id) if !urn => Ok(id),
        _ => Err(Error::format(path, "must be a valid GUID")),
      }
    })
    .collect()
}

fn uris(params: &Object, key: &str) -> Result<Vec<String>> {
  one_or_many(params, key)?
    .into_iter()
    .map(|(path, value)| fields::uri(value, &path).map(|(text, _)| text))
    .collect()
}

fn boolean(params: &Object, key: &str) -> Result<bool> {
  match params.get(key) {
    None => Ok(false),
    Some(Value::Bool(b)) => Ok(*b),
    Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
    Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
    Some(_) => Err(Error::format(FieldPath::root().key(key), "must be a boolean")),
  }
}

/// Date-time layouts tried after RFC 3339. Seconds are optional and `%z`
/// takes the offset with or without a colon.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// An ISO 8601 date-time or plain date. Without an offset it is taken as UTC.
fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Some(dt) = OFFSET_FORMATS
    .into_iter()
    .find_map(|format| DateTime::parse_from_str(text, format).ok())
  {
    return Some(dt.with_timezone(&Utc));
  }
  let naive = text.strip_suffix('Z').unwrap_or(text);
  if let Some(dt) = NAIVE_FORMATS
    .into_iter()
    .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
  {
    return Some(dt.and_utc());
  }
  NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

fn date_time(params: &Object, key: &str) -> Result<Option<DateTime<Utc>>> {
  let path = FieldPath::root().key(key);
  params
    .get(key)
    .map(|value| {
      let text = fields::string(value, &path)?;
      parse_iso8601(&text)
        .ok_or_else(|| Error::format(path.clone(), "must be a valid ISO 8601 date"))
    })
    .transpose()
}

fn limit(params: &Object) -> Result<u64> {
  let path = FieldPath::root().key("limit");
  let Some(value) = params.get("limit") else {
    return Ok(0);
  };
  let number = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
  .filter(|n| n.is_finite())
  .ok_or_else(|| Error::format(path.clone(), "must be a number"))?;

  if number.fract() != 0.0 {
    return Err(Error::format(path, "must be an integer"));
  }
  if number <= 0.0 {
    return Err(Error::format(path, "must be a positive number"));
  }
  if number > MAX_SAFE_INTEGER {
    return Err(Error::format(path, "must be a safe number"));
  }
  Ok(number as u64)
}

fn format(params: &Object) -> Result<StatementFormat> {
  let path = FieldPath::root().key("format");
  let Some(value) = params.get("format") else {
    return Ok(StatementFormat::default());
  };
  let text = fields::string(value, &path)?;
  text
    .parse()
    .map_err(|_| Error::format(path, "must be one of [ids, exact, canonical]"))
}
