use comfy_table::Cell;
use serde::Serialize;

use crate::operation::{OperationKind, RootOperation, find_operation};
use crate::render::graphql::format_operation;
use crate::render::operation_type_name;

use super::render::{TableRow, print_rows};
use super::{Cli, OutputFormat};

pub(super) fn run_operations(cli: &Cli, operations: &[RootOperation]) -> anyhow::Result<()> {
    let rows = operations.iter().map(OperationRow::from).collect::<Vec<_>>();
    print_rows(cli, &rows)
}

pub(super) fn run_show(cli: &Cli, operations: &[RootOperation], target: &str) -> anyhow::Result<()> {
    let Some(op) = find_operation(operations, target) else {
        anyhow::bail!("no root field named {target}");
    };
    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(op)?),
        OutputFormat::Table => println!(
            "{}",
            format_operation(&op.document, Some(&operation_type_name(op)))
        ),
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
struct OperationRow {
    kind: OperationKind,
    field: String,
    variables: String,
    returns: String,
    leaves: usize,
}

impl From<&RootOperation> for OperationRow {
    fn from(op: &RootOperation) -> Self {
        let variables = op
            .document
            .variables
            .iter()
            .map(|v| format!("${}: {}", v.name, v.ty))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            kind: op.kind,
            field: op.path(),
            variables,
            returns: op.field.ty.to_string(),
            leaves: op.document.selection.leaf_count(),
        }
    }
}

impl TableRow for OperationRow {
    const HEADERS: &'static [&'static str] = &["kind", "field", "variables", "returns", "leaves"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.kind),
            Cell::new(&self.field),
            Cell::new(&self.variables),
            Cell::new(&self.returns),
            Cell::new(self.leaves),
        ]
    }
}
