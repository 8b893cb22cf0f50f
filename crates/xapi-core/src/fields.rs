//! Field-level checks shared by the validators.
//!
//! Each helper reads one field of a JSON object and either returns its typed
//! value or a located [`Error`].

use serde_json::{Map, Value};
use url::Url;

use crate::{
  actor::ObjectType,
  error::{Error, Result},
  path::FieldPath,
};

pub(crate) type Object = Map<String, Value>;

pub(crate) fn object<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a Object> {
  value
    .as_object()
    .ok_or_else(|| Error::format(path.clone(), "must be an object"))
}

/// Fail on the first key that is not in `allowed`.
pub(crate) fn reject_unknown(
  object: &Object,
  allowed: &[&str],
  path: &FieldPath,
) -> Result<()> {
  match object.keys().find(|k| !allowed.contains(&k.as_str())) {
    Some(key) => Err(Error::UnknownField {
      path: path.key(key),
    }),
    None => Ok(()),
  }
}

/// A non-empty string.
pub(crate) fn string(value: &Value, path: &FieldPath) -> Result<String> {
  match value {
    Value::String(s) if s.is_empty() => {
      Err(Error::format(path.clone(), "is not allowed to be empty"))
    }
    Value::String(s) => Ok(s.clone()),
    _ => Err(Error::format(path.clone(), "must be a string")),
  }
}

pub(crate) fn optional_string(
  object: &Object,
  key: &str,
  path: &FieldPath,
) -> Result<Option<String>> {
  object
    .get(key)
    .map(|v| string(v, &path.key(key)))
    .transpose()
}

pub(crate) fn required_string(
  object: &Object,
  key: &str,
  path: &FieldPath,
) -> Result<String> {
  optional_string(object, key, path)?.ok_or_else(|| Error::MissingField {
    path: path.key(key),
  })
}

/// An absolute URI. The original text is returned so output matches input.
///
/// Whitespace is rejected outright; the URL parser would otherwise trim or
/// percent-encode it.
pub(crate) fn uri(value: &Value, path: &FieldPath) -> Result<(String, Url)> {
  let text = string(value, path)?;
  let invalid = || Error::format(path.clone(), "must be a valid uri");
  if text.contains(char::is_whitespace) {
    return Err(invalid());
  }
  let url = Url::parse(&text).map_err(|_| invalid())?;
  Ok((text, url))
}

/// The `objectType` discriminant, if present.
pub(crate) fn object_type(
  object: &Object,
  path: &FieldPath,
) -> Result<Option<ObjectType>> {
  let path = path.key("objectType");
  let Some(value) = object.get("objectType") else {
    return Ok(None);
  };
  let text = value
    .as_str()
    .ok_or_else(|| Error::format(path.clone(), "must be a string"))?;
  text
    .parse::<ObjectType>()
    .map(Some)
    .map_err(|_| Error::format(path, "must be one of [Agent, Group]"))
}

/// Check that `objectType`, when present, is exactly `expected`.
pub(crate) fn expect_object_type(
  object: &Object,
  expected: ObjectType,
  required: bool,
  path: &FieldPath,
) -> Result<()> {
  let field = path.key("objectType");
  match object.get("objectType") {
    None if required => Err(Error::MissingField { path: field }),
    None => Ok(()),
    Some(Value::String(s)) if s.parse::<ObjectType>() == Ok(expected) => Ok(()),
    Some(Value::String(_)) => {
      Err(Error::format(field, format!("must be one of [{expected}]")))
    }
    Some(_) => Err(Error::format(field, "must be a string")),
  }
}
