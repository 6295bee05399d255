//! Generates GraphQL operations and typed Rust clients from a schema.
//!
//! The core is [`selection::synthesize`] and [`operation::build_operation`]: a
//! root field plus an object-type registry become a self-contained
//! [`operation::OperationDocument`]. Renderers in [`render`] turn documents into
//! text.

pub mod cli;
pub mod config;
pub mod operation;
pub mod registry;
pub mod render;
pub mod schema;
pub mod selection;
pub mod types;

pub use operation::{OperationDocument, OperationKind, build_operation, root_operations};
pub use registry::{ObjectTypeLookup, Registry};
pub use schema::{Schema, SchemaError};
pub use selection::{Selection, synthesize};
