use std::fmt;

use serde::Serialize;

use crate::registry::ObjectTypeLookup;
use crate::schema::Schema;
use crate::selection::{self, Argument, Selection, synthesize};
use crate::types::{ConstValue, FieldDefinition, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: TypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ConstValue>,
}

/// A single query or mutation, complete enough to be rendered without the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDocument {
    pub kind: OperationKind,
    pub variables: Vec<VariableDefinition>,
    pub selection: Selection,
}

/// Builds the operation that invokes `field` with every argument forwarded from a
/// variable and selects everything reachable from its return type.
pub fn build_operation<L>(
    field: &FieldDefinition,
    kind: OperationKind,
    registry: &L,
) -> OperationDocument
where
    L: ObjectTypeLookup + ?Sized,
{
    let mut variables = Vec::with_capacity(field.arguments.len());
    let mut arguments = Vec::with_capacity(field.arguments.len());
    for arg in &field.arguments {
        variables.push(VariableDefinition {
            name: arg.name.clone(),
            ty: arg.ty.clone(),
            default_value: arg.default_value.clone(),
        });
        arguments.push(Argument::from_variable(&arg.name));
    }

    let return_type = field.ty.base_name();
    let mut children = synthesize(return_type, registry);
    if registry.lookup_object_type(return_type).is_some() {
        children = selection::non_empty(children);
    }

    OperationDocument {
        kind,
        variables,
        selection: Selection {
            name: field.name.clone(),
            arguments,
            children,
        },
    }
}

/// One generated operation per root field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootOperation {
    pub kind: OperationKind,
    pub root_type: String,
    pub field: FieldDefinition,
    pub document: OperationDocument,
}

impl RootOperation {
    /// `Query.user` style label.
    pub fn path(&self) -> String {
        format!("{}.{}", self.root_type, self.field.name)
    }
}

/// Builds every query-root operation, then every mutation-root operation, each in
/// field declaration order.
pub fn root_operations(schema: &Schema) -> Vec<RootOperation> {
    let roots = [
        (OperationKind::Query, schema.query_type()),
        (OperationKind::Mutation, schema.mutation_type()),
    ];

    let mut out = Vec::new();
    for (kind, root_name) in roots {
        let Some(root) = schema.registry().lookup_object_type(root_name) else {
            continue;
        };
        for field in &root.fields {
            out.push(RootOperation {
                kind,
                root_type: root.name.clone(),
                field: field.clone(),
                document: build_operation(field, kind, schema.registry()),
            });
        }
    }
    out
}

/// Finds an operation by `field` or `Root.field`.
pub fn find_operation<'a>(
    operations: &'a [RootOperation],
    target: &str,
) -> Option<&'a RootOperation> {
    match target.split_once('.') {
        Some((root, field)) => operations
            .iter()
            .find(|op| op.root_type == root && op.field.name == field),
        None => operations.iter().find(|op| op.field.name == target),
    }
}
