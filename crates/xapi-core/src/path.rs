//! Field paths used to locate a validation failure inside the input value.

use std::fmt;

/// One step into a JSON value: an object key or an array position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
  Key(String),
  Index(usize),
}

/// The location of a field relative to the validated value.
///
/// Rendered the way a reader would type it: `member[2].account.homePage`.
/// The empty path is the value itself and renders as `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
  pub fn root() -> Self { Self::default() }

  pub fn is_root(&self) -> bool { self.0.is_empty() }

  /// A new path one object key deeper.
  pub fn key(&self, key: &str) -> Self {
    let mut segments = self.0.clone();
    segments.push(Segment::Key(key.to_owned()));
    Self(segments)
  }

  /// A new path one array element deeper.
  pub fn index(&self, index: usize) -> Self {
    let mut segments = self.0.clone();
    segments.push(Segment::Index(index));
    Self(segments)
  }

  pub fn segments(&self) -> &[Segment] { &self.0 }

  /// The last object key on the path, if any.
  pub fn last_key(&self) -> Option<&str> {
    self.0.iter().rev().find_map(|s| match s {
      Segment::Key(k) => Some(k.as_str()),
      Segment::Index(_) => None,
    })
  }
}

impl fmt::Display for FieldPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() {
      return f.write_str("value");
    }
    for (i, segment) in self.0.iter().enumerate() {
      match segment {
        Segment::Key(k) if i == 0 => f.write_str(k)?,
        Segment::Key(k) => write!(f, ".{k}")?,
        Segment::Index(n) => write!(f, "[{n}]")?,
      }
    }
    Ok(())
  }
}
