//! Inverse functional identifiers: the four ways an Agent or identified Group
//! can claim an identity.
//!
//! Format rules and the exactly-one-of-four rule are separate checks:
//! [`InverseFunctionalIdentifier::from_field`] validates a single field, while
//! [`exactly_one`] only looks at which of the four field names are present.

use serde::Serialize;
use url::Url;

use crate::{
  error::{Error, Result},
  fields::{self, Object},
  path::FieldPath,
};

/// The identifier field names, in precedence order.
pub const IDENTIFIER_FIELDS: [&str; 4] =
  ["mbox", "mbox_sha1sum", "openid", "account"];

const ACCOUNT_FIELDS: &[&str] = &["homePage", "name"];

// ─── Account ─────────────────────────────────────────────────────────────────

/// A user account on an existing system, e.g. an LMS or intranet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Account {
  #[serde(rename = "homePage")]
  home_page: String,
  name:      String,
}

impl Account {
  /// The canonical home page of the system the account belongs to.
  pub fn home_page(&self) -> &str { &self.home_page }

  /// The unique id or name used to log in to the account.
  pub fn name(&self) -> &str { &self.name }

  fn validate(value: &serde_json::Value, path: &FieldPath) -> Result<Self> {
    let object = fields::object(value, path)?;
    fields::reject_unknown(object, ACCOUNT_FIELDS, path)?;
    let home_page_path = path.key("homePage");
    let home_page = match object.get("homePage") {
      Some(v) => fields::uri(v, &home_page_path)?.0,
      None => {
        return Err(Error::MissingField {
          path: home_page_path,
        });
      }
    };
    let name = fields::required_string(object, "name", path)?;
    Ok(Self { home_page, name })
  }
}

// ─── Identifier ──────────────────────────────────────────────────────────────

/// One validated identity claim.
///
/// Serialises as the bare claim value; the owning record supplies the field
/// name via [`InverseFunctionalIdentifier::field`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum InverseFunctionalIdentifier {
  /// A `mailto:` URI.
  Mbox(String),
  /// Hex-encoded SHA-1 of a `mailto:` URI. Not checked beyond being a string.
  MboxSha1Sum(String),
  /// An OpenID URI.
  OpenId(String),
  Account(Account),
}

impl InverseFunctionalIdentifier {
  /// The wire field name carrying this claim.
  pub fn field(&self) -> &'static str {
    match self {
      Self::Mbox(_) => "mbox",
      Self::MboxSha1Sum(_) => "mbox_sha1sum",
      Self::OpenId(_) => "openid",
      Self::Account(_) => "account",
    }
  }

  /// Validate the value of a single identifier field.
  pub fn from_field(
    field: &str,
    value: &serde_json::Value,
    path: &FieldPath,
  ) -> Result<Self> {
    match field {
      "mbox" => {
        let text = fields::string(value, path)?;
        match Url::parse(&text) {
          Ok(url)
            if url.scheme() == "mailto"
              && !url.path().is_empty()
              && !text.contains(char::is_whitespace) =>
          {
            Ok(Self::Mbox(text))
          }
          _ => Err(Error::format(
            path.clone(),
            "must be a valid uri with a scheme matching the mailto pattern",
          )),
        }
      }
      "mbox_sha1sum" => Ok(Self::MboxSha1Sum(fields::string(value, path)?)),
      "openid" => Ok(Self::OpenId(fields::uri(value, path)?.0)),
      "account" => Ok(Self::Account(Account::validate(value, path)?)),
      _ => Err(Error::UnknownField { path: path.clone() }),
    }
  }

  /// Validate the identifier fields of `object` and return the single claim.
  ///
  /// Every present identifier field is format-checked first, then the
  /// exclusivity rule is applied.
  pub fn from_object(object: &Object, path: &FieldPath) -> Result<Self> {
    let mut claims = IDENTIFIER_FIELDS
      .into_iter()
      .filter_map(|field| {
        object
          .get(field)
          .map(|v| Self::from_field(field, v, &path.key(field)))
      })
      .collect::<Result<Vec<_>>>()?;
    exactly_one(object, path)?;
    claims.pop().ok_or_else(|| Error::MissingIdentifier { path: path.clone() })
  }

  pub fn as_mbox(&self) -> Option<&str> {
    match self {
      Self::Mbox(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_account(&self) -> Option<&Account> {
    match self {
      Self::Account(a) => Some(a),
      _ => None,
    }
  }
}

// ─── Exclusivity ─────────────────────────────────────────────────────────────

/// The identifier fields present on `object`, in precedence order.
pub fn present_identifiers(object: &Object) -> Vec<&'static str> {
  IDENTIFIER_FIELDS
    .into_iter()
    .filter(|f| object.contains_key(*f))
    .collect()
}

/// Require exactly one of the four identifier fields and return its name.
pub fn exactly_one(object: &Object, path: &FieldPath) -> Result<&'static str> {
  match present_identifiers(object).as_slice() {
    [] => Err(Error::MissingIdentifier { path: path.clone() }),
    [field] => Ok(*field),
    many => Err(Error::ConflictingIdentifiers {
      path:    path.clone(),
      present: many.to_vec(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::error::ErrorKind;

  fn claim(field: &str, value: serde_json::Value) -> Result<InverseFunctionalIdentifier> {
    InverseFunctionalIdentifier::from_field(
      field,
      &value,
      &FieldPath::root().key(field),
    )
  }

  #[test]
  fn mbox_requires_mailto_scheme() {
    let e = claim("mbox", json!("mal@serenity.org")).unwrap_err();
    assert_eq!(
      e.to_string(),
      "\"mbox\" must be a valid uri with a scheme matching the mailto pattern"
    );

    let e = claim("mbox", json!("http://serenity.org/mal")).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Format);

    let ok = claim("mbox", json!("mailto:mal@serenity.org")).unwrap();
    assert_eq!(ok.as_mbox(), Some("mailto:mal@serenity.org"));
  }

  #[test]
  fn mbox_rejects_whitespace() {
    for text in ["mailto:a b@c.org", "mailto:ab@c.org ", " mailto:ab@c.org"] {
      let e = claim("mbox", json!(text)).unwrap_err();
      assert_eq!(e.kind(), ErrorKind::Format, "{text:?}");
    }
  }

  #[test]
  fn mbox_must_be_a_string() {
    let e = claim("mbox", json!(42)).unwrap_err();
    assert_eq!(e.to_string(), "\"mbox\" must be a string");
  }

  #[test]
  fn sha1sum_is_opaque() {
    let ok = claim("mbox_sha1sum", json!("not-really-a-hash")).unwrap();
    assert_eq!(ok, InverseFunctionalIdentifier::MboxSha1Sum(
      "not-really-a-hash".to_string()
    ));
  }

  #[test]
  fn openid_must_be_absolute() {
    assert!(claim("openid", json!("http://mal.openid.serenity.org/")).is_ok());
    let e = claim("openid", json!("/openid/mal")).unwrap_err();
    assert_eq!(e.to_string(), "\"openid\" must be a valid uri");
  }

  #[test]
  fn account_requires_both_fields() {
    let e = claim("account", json!({ "name": "mal" })).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::MissingRequired);
    assert_eq!(e.path().to_string(), "account.homePage");

    let e = claim("account", json!({ "homePage": "http://serenity.org" }))
      .unwrap_err();
    assert_eq!(e.path().to_string(), "account.name");
  }

  #[test]
  fn account_rejects_extra_keys() {
    let e = claim(
      "account",
      json!({
        "homePage": "http://serenity.org",
        "name": "malcolm.reynolds69",
        "motto": "Curse your sudden, but inevitable betrayal"
      }),
    )
    .unwrap_err();
    assert_eq!(e.to_string(), "\"account.motto\" is not allowed");
    assert_eq!(e.kind(), ErrorKind::Structural);
  }

  #[test]
  fn account_home_page_keeps_original_text() {
    let ok = claim(
      "account",
      json!({ "homePage": "http://serenity.org", "name": "crew" }),
    )
    .unwrap();
    let account = ok.as_account().unwrap();
    assert_eq!(account.home_page(), "http://serenity.org");
    assert_eq!(account.name(), "crew");
  }

  #[test]
  fn exclusivity_counts_field_names_only() {
    let none = json!({ "name": "Mal" });
    let e = exactly_one(none.as_object().unwrap(), &FieldPath::root())
      .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::MissingRequired);

    let two = json!({ "openid": 1, "account": 2 });
    let e = exactly_one(two.as_object().unwrap(), &FieldPath::root())
      .unwrap_err();
    let Error::ConflictingIdentifiers { present, .. } = e else {
      panic!("expected conflict")
    };
    assert_eq!(present, vec!["openid", "account"]);

    let one = json!({ "openid": "not checked here" });
    assert_eq!(
      exactly_one(one.as_object().unwrap(), &FieldPath::root()).unwrap(),
      "openid"
    );
  }

  #[test]
  fn format_is_checked_before_exclusivity() {
    let input = json!({ "mbox": "mal@serenity.org", "openid": "http://x.org/" });
    let e = InverseFunctionalIdentifier::from_object(
      input.as_object().unwrap(),
      &FieldPath::root(),
    )
    .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Format);
  }
}
