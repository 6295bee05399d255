//! Turns operation documents into text. Nothing here is consulted while building
//! the documents themselves.

pub mod graphql;
pub mod naming;
pub mod rust;

use clap::ValueEnum;
use serde::Serialize;

use crate::operation::{OperationKind, RootOperation};
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Rust module with models, query constants and request builders.
    Rust,
    /// Named GraphQL operations.
    Graphql,
    /// Operation documents as JSON.
    Json,
}

/// `UserQuery`, `CreateTagMutation`.
pub fn operation_type_name(op: &RootOperation) -> String {
    let kind = match op.kind {
        OperationKind::Query => "Query",
        OperationKind::Mutation => "Mutation",
    };
    format!("{}{kind}", naming::pascal_case(&op.field.name))
}

#[derive(Debug, Serialize)]
struct JsonOperation<'a> {
    path: String,
    name: String,
    #[serde(flatten)]
    operation: &'a RootOperation,
    text: String,
}

pub fn render(
    target: Target,
    schema: &Schema,
    operations: &[RootOperation],
) -> anyhow::Result<String> {
    match target {
        Target::Rust => Ok(rust::render_client(schema, operations)),
        Target::Graphql => Ok(graphql::format_document(operations)),
        Target::Json => {
            let items = operations
                .iter()
                .map(|op| JsonOperation {
                    path: op.path(),
                    name: operation_type_name(op),
                    operation: op,
                    text: graphql::format_operation(&op.document, None),
                })
                .collect::<Vec<_>>();
            let mut s = serde_json::to_string_pretty(&items)?;
            s.push('\n');
            Ok(s)
        }
    }
}
