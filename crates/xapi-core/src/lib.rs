//! Validation and normalisation of xAPI Actors.
//!
//! An Actor is either an [`Agent`] (one identity) or a [`Group`] (a collection
//! of Agents, identified or anonymous). Every entry point takes an untyped
//! [`serde_json::Value`] and returns either a fully validated, immutable value
//! or a located [`Error`]. Nothing here does I/O or holds shared state.
//!
//! [`query::StatementQuery`] validates the parameters of a statement-listing
//! read; its `agent` filter reuses the identifier rules but never accepts a
//! full Actor.
//!
//! ```
//! use serde_json::json;
//! use xapi_core::Actor;
//!
//! let actor = Actor::resolve(&json!({ "mbox": "mailto:mal@serenity.org" })).unwrap();
//! assert_eq!(actor.to_value().unwrap()["objectType"], "Agent");
//! ```

pub mod actor;
pub mod agent;
pub mod error;
mod fields;
pub mod group;
pub mod identifier;
pub mod path;
pub mod query;

pub use actor::{Actor, ObjectType};
pub use agent::Agent;
pub use error::{Error, ErrorKind, Result};
pub use group::{AnonymousGroup, Group, GroupShape, IdentifiedGroup};
pub use identifier::{Account, InverseFunctionalIdentifier};
pub use path::FieldPath;
pub use query::{AgentFilter, StatementFormat, StatementQuery};
