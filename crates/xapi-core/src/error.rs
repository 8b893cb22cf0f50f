//! Error types for `xapi-core`.
//!
//! Every failure carries the [`FieldPath`] of the offending field. Messages
//! quote that path, e.g. `"member[0].mbox" must be a valid uri`.

use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::{group::GroupShape, path::FieldPath};

/// The four classes of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ErrorKind {
  /// A field outside the variant's declared set is present.
  Structural,
  /// A present field has the wrong type or shape.
  Format,
  /// More than one inverse functional identifier is present.
  Exclusivity,
  /// A required field, or the one required identifier, is absent.
  MissingRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("\"{path}\" is not allowed")]
  UnknownField { path: FieldPath },

  #[error("\"{path}\" {reason}")]
  InvalidFormat { path: FieldPath, reason: String },

  #[error("\"{path}\" is required")]
  MissingField { path: FieldPath },

  #[error(
    "\"{path}\" must contain at least one of [mbox, mbox_sha1sum, openid, \
     account]"
  )]
  MissingIdentifier { path: FieldPath },

  #[error(
    "\"{path}\" contains a conflict between exclusive peers [mbox, \
     mbox_sha1sum, openid, account]"
  )]
  ConflictingIdentifiers {
    path:    FieldPath,
    /// The identifier fields that were found together.
    present: Vec<&'static str>,
  },

  /// Raised only by the anonymous group shape. [`crate::Group::validate`]
  /// reports the identified shape's failure whenever an identifier is
  /// present, so this variant surfaces only through that shape on its own.
  #[error(
    "\"{path}\" is not allowed: identifiers are not allowed on an anonymous \
     group"
  )]
  IdentifierOnAnonymousGroup { path: FieldPath },

  #[error("value does not match the {shape} group shape: {source}")]
  GroupShape {
    shape:  GroupShape,
    source: Box<Error>,
  },
}

impl Error {
  pub(crate) fn format(path: FieldPath, reason: impl Into<String>) -> Self {
    Self::InvalidFormat {
      path,
      reason: reason.into(),
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UnknownField { .. } | Self::IdentifierOnAnonymousGroup { .. } => {
        ErrorKind::Structural
      }
      Self::InvalidFormat { .. } => ErrorKind::Format,
      Self::MissingField { .. } | Self::MissingIdentifier { .. } => {
        ErrorKind::MissingRequired
      }
      Self::ConflictingIdentifiers { .. } => ErrorKind::Exclusivity,
      Self::GroupShape { source, .. } => source.kind(),
    }
  }

  /// Path of the field that failed. For group-shape failures this is the
  /// path reported by the selected candidate shape.
  pub fn path(&self) -> &FieldPath {
    match self {
      Self::UnknownField { path }
      | Self::InvalidFormat { path, .. }
      | Self::MissingField { path }
      | Self::MissingIdentifier { path }
      | Self::ConflictingIdentifiers { path, .. }
      | Self::IdentifierOnAnonymousGroup { path } => path,
      Self::GroupShape { source, .. } => source.path(),
    }
  }

  /// Strip group-shape wrappers and return the underlying failure.
  pub fn root_cause(&self) -> &Error {
    match self {
      Self::GroupShape { source, .. } => source.root_cause(),
      other => other,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
