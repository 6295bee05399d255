use std::collections::HashSet;

use crate::operation::RootOperation;
use crate::schema::Schema;
use crate::types::{ArgumentDefinition, FieldDefinition};

use super::graphql::format_operation;
use super::naming::{
    FieldIdents, RustTypes, pascal_case, rust_ident, screaming_snake_case, snake_case,
};
use super::operation_type_name;

pub const GENERATED_HEADER: &str = "// Code generated by clientgen. DO NOT EDIT.";

/// Renders a self-contained Rust module for `schema` and its root operations.
pub fn render_client(schema: &Schema, operations: &[RootOperation]) -> String {
    let types = RustTypes::new(schema);
    let mut out = String::new();

    out.push_str(GENERATED_HEADER);
    out.push_str("\n\nuse serde::{Deserialize, Serialize};\n\n");
    out.push_str("/// Body of a GraphQL request: operation text plus variables.\n");
    out.push_str("#[derive(Debug, Clone, Serialize)]\n");
    out.push_str("pub struct GraphQLRequest<V> {\n");
    out.push_str("    pub query: &'static str,\n");
    out.push_str("    pub variables: V,\n");
    out.push_str("}\n");

    render_aliases(&mut out, schema);
    for (name, values) in schema.enums() {
        render_enum(&mut out, name, values);
    }
    for (name, fields) in schema.inputs() {
        render_input(&mut out, &types, name, fields);
    }
    let referenced = schema
        .registry()
        .iter()
        .flat_map(|object| object.fields.iter().map(|f| f.ty.base_name()))
        .collect::<HashSet<_>>();
    for object in schema.registry().iter() {
        // Root types only need a model when some field returns them.
        if schema.is_root_type(&object.name) && !referenced.contains(object.name.as_str()) {
            continue;
        }
        render_object(&mut out, &types, &object.name, &object.fields);
    }
    for op in operations {
        render_operation(&mut out, &types, op);
    }
    out
}

fn render_aliases(out: &mut String, schema: &Schema) {
    let opaque = schema
        .scalars()
        .iter()
        .chain(schema.unions().keys())
        .chain(schema.interfaces().iter())
        .collect::<Vec<_>>();
    if opaque.is_empty() {
        return;
    }
    out.push('\n');
    for name in opaque {
        out.push_str(&format!("pub type {} = serde_json::Value;\n", pascal_case(name)));
    }
}

fn render_enum(out: &mut String, name: &str, values: &[String]) {
    let variants = values
        .iter()
        .map(|v| (pascal_case(&v.to_lowercase()), v))
        .collect::<Vec<_>>();
    let catch_all = if variants.iter().any(|(variant, _)| variant == "Other") {
        "Unknown"
    } else {
        "Other"
    };

    out.push_str("\n#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub enum {} {{\n", pascal_case(name)));
    for (variant, raw) in &variants {
        if variant != *raw {
            out.push_str(&format!("    #[serde(rename = \"{raw}\")]\n"));
        }
        out.push_str(&format!("    {},\n", rust_ident(variant)));
    }
    out.push_str("    #[serde(other)]\n");
    out.push_str(&format!("    {catch_all},\n"));
    out.push_str("}\n");
}

fn render_input(
    out: &mut String,
    types: &RustTypes<'_>,
    name: &str,
    fields: &[ArgumentDefinition],
) {
    out.push_str("\n#[derive(Debug, Clone, PartialEq, Serialize)]\n");
    out.push_str(&format!("pub struct {} {{\n", pascal_case(name)));
    let mut idents = FieldIdents::default();
    for field in fields {
        let ty = types.input_field(&field.ty);
        let ident = idents.claim(&field.name);
        push_struct_field(out, &field.name, &ident, &ty, &serde_skip_none(&ty));
    }
    out.push_str("}\n");
}

fn render_object(
    out: &mut String,
    types: &RustTypes<'_>,
    name: &str,
    fields: &[FieldDefinition],
) {
    out.push_str("\n#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub struct {} {{\n", pascal_case(name)));
    let mut idents = FieldIdents::default();
    for field in fields {
        let ty = types.output_field(&field.ty);
        let ident = idents.claim(&field.name);
        let attrs = if types.defaults_when_missing(&field.ty) {
            vec!["default"]
        } else {
            Vec::new()
        };
        push_struct_field(out, &field.name, &ident, &ty, &attrs);
    }
    out.push_str("}\n");
}

fn render_operation(out: &mut String, types: &RustTypes<'_>, op: &RootOperation) {
    let type_name = operation_type_name(op);
    let const_name = screaming_snake_case(&type_name);
    let vars_name = format!("{type_name}Variables");
    let data_name = format!("{type_name}Data");
    let fn_name = snake_case(&type_name);
    let text = format_operation(&op.document, None);

    out.push_str(&format!("\n/// `{}` for `{}`.\n", op.kind, op.path()));
    out.push_str(&format!(
        "pub const {const_name}: &str = {};\n",
        raw_string_literal(&text)
    ));

    out.push_str("\n#[derive(Debug, Clone, PartialEq, Serialize)]\n");
    out.push_str(&format!("pub struct {vars_name} {{\n"));
    let mut params = Vec::with_capacity(op.document.variables.len());
    let mut idents = FieldIdents::default();
    for var in &op.document.variables {
        let ty = types.resolve(&var.ty);
        let ident = idents.claim(&var.name);
        push_struct_field(out, &var.name, &ident, &ty, &serde_skip_none(&ty));
        params.push((ident, ty));
    }
    out.push_str("}\n");

    out.push_str("\n#[derive(Debug, Clone, PartialEq, Deserialize)]\n");
    out.push_str(&format!("pub struct {data_name} {{\n"));
    let ident = FieldIdents::default().claim(&op.field.name);
    push_struct_field(out, &op.field.name, &ident, &types.resolve(&op.field.ty), &[]);
    out.push_str("}\n");

    let signature = params
        .iter()
        .map(|(name, ty)| format!("{name}: {ty}"))
        .collect::<Vec<_>>()
        .join(", ");
    let inits = params
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!(
        "\npub fn {fn_name}({signature}) -> GraphQLRequest<{vars_name}> {{\n"
    ));
    out.push_str("    GraphQLRequest {\n");
    out.push_str(&format!("        query: {const_name},\n"));
    if inits.is_empty() {
        out.push_str(&format!("        variables: {vars_name} {{}},\n"));
    } else {
        out.push_str(&format!("        variables: {vars_name} {{ {inits} }},\n"));
    }
    out.push_str("    }\n");
    out.push_str("}\n");
}

fn serde_skip_none(ty: &str) -> Vec<&'static str> {
    if ty.starts_with("Option<") {
        vec!["skip_serializing_if = \"Option::is_none\""]
    } else {
        Vec::new()
    }
}

fn push_struct_field(
    out: &mut String,
    graphql_name: &str,
    ident: &str,
    ty: &str,
    attrs: &[&str],
) {
    let mut serde_attrs = Vec::new();
    if ident.trim_start_matches("r#") != graphql_name {
        serde_attrs.push(format!("rename = \"{graphql_name}\""));
    }
    serde_attrs.extend(attrs.iter().map(|a| a.to_string()));
    if !serde_attrs.is_empty() {
        out.push_str(&format!("    #[serde({})]\n", serde_attrs.join(", ")));
    }
    out.push_str(&format!("    pub {ident}: {ty},\n"));
}

/// Picks the fewest `#`s that keep `s` intact inside a raw string.
fn raw_string_literal(s: &str) -> String {
    let mut hashes = 1;
    while s.contains(&format!("\"{}", "#".repeat(hashes))) {
        hashes += 1;
    }
    let fence = "#".repeat(hashes);
    format!("r{fence}\"{s}\"{fence}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::root_operations;

    fn render(sdl: &str) -> String {
        let schema = Schema::parse(sdl).unwrap();
        let ops = root_operations(&schema);
        render_client(&schema, &ops)
    }

    #[test]
    fn user_query_client() {
        let out = render(
            r#"
            type Query { user(id: ID!): User }
            type User { id: ID!, name: String, friend: User }
            "#,
        );
        insta::assert_snapshot!(out, @r###"
        // Code generated by clientgen. DO NOT EDIT.

        use serde::{Deserialize, Serialize};

        /// Body of a GraphQL request: operation text plus variables.
        #[derive(Debug, Clone, Serialize)]
        pub struct GraphQLRequest<V> {
            pub query: &'static str,
            pub variables: V,
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct User {
            pub id: String,
            pub name: Option<String>,
            pub friend: Option<Box<User>>,
        }

        /// `query` for `Query.user`.
        pub const USER_QUERY: &str = r#"query ($id: ID!) {
          user(id: $id) {
            id
            name
            friend {
              id
              name
            }
          }
        }"#;

        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct UserQueryVariables {
            pub id: String,
        }

        #[derive(Debug, Clone, PartialEq, Deserialize)]
        pub struct UserQueryData {
            pub user: Option<User>,
        }

        pub fn user_query(id: String) -> GraphQLRequest<UserQueryVariables> {
            GraphQLRequest {
                query: USER_QUERY,
                variables: UserQueryVariables { id },
            }
        }
        "###);
    }

    #[test]
    fn enums_inputs_and_renames() {
        let out = render(
            r#"
            scalar DateTime
            enum Kind { REGULAR INTERNAL_TRANSFER OTHER }
            input EditInput { type: Kind, note: String, at: DateTime! }
            type Txn { id: ID!, createdAt: DateTime, type: Kind, splits: [Txn!]! }
            type Mutation { editTxn(id: ID!, input: EditInput): Txn }
            "#,
        );

        assert!(out.contains("pub type DateTime = serde_json::Value;\n"));
        assert!(out.contains(
            "    #[serde(rename = \"INTERNAL_TRANSFER\")]\n    InternalTransfer,\n"
        ));
        assert!(out.contains("    #[serde(other)]\n    Unknown,\n"));
        assert!(out.contains(
            "    #[serde(skip_serializing_if = \"Option::is_none\")]\n    pub r#type: Option<Kind>,\n"
        ));
        assert!(out.contains("    pub at: DateTime,\n"));
        assert!(out.contains("    #[serde(rename = \"createdAt\")]\n    pub created_at: Option<DateTime>,\n"));
        assert!(out.contains("    #[serde(default)]\n    pub splits: Vec<Txn>,\n"));
        assert!(out.contains("pub const EDIT_TXN_MUTATION: &str = r#\"mutation ($id: ID!, $input: EditInput) {"));
        assert!(out.contains(
            "pub fn edit_txn_mutation(id: String, input: Option<EditInput>) -> GraphQLRequest<EditTxnMutationVariables> {"
        ));
        assert!(out.contains("    #[serde(rename = \"editTxn\")]\n    pub edit_txn: Option<Txn>,\n"));
        assert!(!out.contains("pub struct Mutation "));
    }

    #[test]
    fn root_types_reachable_from_fields_get_models() {
        let out = render(
            r#"
            type Query { viewer: Viewer }
            type Viewer { id: ID root: Query }
            "#,
        );
        assert!(out.contains("    pub root: Option<Box<Query>>,\n"));
        assert!(out.contains("pub struct Query {\n    pub viewer: Option<Box<Viewer>>,\n}\n"));
        assert!(!out.contains("pub struct Mutation "));
    }

    #[test]
    fn underscore_fields_keep_distinct_names() {
        let out = render(
            r#"
            type Query { t(_: Int, id: ID): T }
            type T { _: String _id: ID id: ID createdAt: String created_at: String }
            "#,
        );
        assert!(out.contains(concat!(
            "pub struct T {\n",
            "    #[serde(rename = \"_\")]\n",
            "    pub field_: Option<String>,\n",
            "    pub _id: Option<String>,\n",
            "    pub id: Option<String>,\n",
            "    #[serde(rename = \"createdAt\")]\n",
            "    pub created_at: Option<String>,\n",
            "    #[serde(rename = \"created_at\")]\n",
            "    pub created_at_2: Option<String>,\n",
            "}\n",
        )));
        assert!(out.contains(
            "pub fn t_query(field_: Option<i64>, id: Option<String>) -> GraphQLRequest<TQueryVariables> {"
        ));
        assert!(!out.contains("pub : "));
    }

    #[test]
    fn operations_without_arguments_use_empty_variables() {
        let out = render("type Query { ping: String }");
        assert!(out.contains("pub struct PingQueryVariables {\n}\n"));
        assert!(out.contains("        variables: PingQueryVariables {},\n"));
        assert!(out.contains("pub fn ping_query() -> GraphQLRequest<PingQueryVariables> {"));
    }

    #[test]
    fn raw_strings_grow_their_fence() {
        assert_eq!(raw_string_literal("a"), "r#\"a\"#");
        assert_eq!(raw_string_literal("say \"#hi"), "r##\"say \"#hi\"##");
    }
}
