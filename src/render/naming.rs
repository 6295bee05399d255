use std::collections::HashSet;

use crate::registry::ObjectTypeLookup;
use crate::schema::Schema;
use crate::types::TypeRef;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be written as raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate"];

pub fn pascal_case(s: &str) -> String {
    let mut out = String::new();
    let mut upper = true;
    for ch in s.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper = true;
            continue;
        }
        if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `createdAt` → `created_at`, `HTTPServer` → `http_server`. Leading underscores are kept.
pub fn snake_case(s: &str) -> String {
    let chars = s.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                Some(_) => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn screaming_snake_case(s: &str) -> String {
    snake_case(s).to_uppercase()
}

/// Makes `name` usable as a Rust identifier.
pub fn rust_ident(name: &str) -> String {
    if name.chars().all(|c| c == '_') {
        "field_".to_string()
    } else if RESERVED.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// Hands out distinct Rust field names within one struct.
#[derive(Debug, Default)]
pub struct FieldIdents {
    used: HashSet<String>,
}

impl FieldIdents {
    /// Identifier for `graphql_name`, suffixed `_2`, `_3`, ... when an earlier
    /// field already maps to the same name.
    pub fn claim(&mut self, graphql_name: &str) -> String {
        let base = rust_ident(&snake_case(graphql_name));
        let mut ident = base.clone();
        let mut n = 2;
        while !self.used.insert(ident.clone()) {
            ident = format!("{}_{n}", base.trim_start_matches("r#"));
            n += 1;
        }
        ident
    }
}

/// Maps GraphQL type references onto Rust type expressions for one schema.
pub struct RustTypes<'a> {
    schema: &'a Schema,
}

impl<'a> RustTypes<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Rust name for a named GraphQL type.
    pub fn named(&self, name: &str) -> String {
        match name {
            "ID" | "String" => "String".to_string(),
            "Int" => "i64".to_string(),
            "Float" => "f64".to_string(),
            "Boolean" => "bool".to_string(),
            _ if self.is_declared(name) => pascal_case(name),
            _ => "serde_json::Value".to_string(),
        }
    }

    /// Nullable types become `Option<_>`, lists become `Vec<_>`.
    pub fn resolve(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::NonNull(inner) => self.resolve_non_null(inner),
            other => format!("Option<{}>", self.resolve_non_null(other)),
        }
    }

    fn resolve_non_null(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::NonNull(inner) => self.resolve_non_null(inner),
            TypeRef::List(inner) => format!("Vec<{}>", self.resolve(inner)),
            TypeRef::Named(name) => self.named(name),
        }
    }

    /// Type of a response-model struct field.
    ///
    /// Single object values are always optional and boxed: the type may be
    /// recursive, and a selection cut at a cycle leaves the key out entirely.
    pub fn output_field(&self, ty: &TypeRef) -> String {
        let base = ty.base_name();
        if self.schema.registry().lookup_object_type(base).is_some() && !ty.is_list() {
            format!("Option<Box<{}>>", self.named(base))
        } else {
            self.resolve(ty)
        }
    }

    /// Type of an input-object struct field. Nested inputs are boxed so
    /// self-referencing inputs stay finitely sized.
    pub fn input_field(&self, ty: &TypeRef) -> String {
        let base = ty.base_name();
        if !self.schema.inputs().contains_key(base) || ty.is_list() {
            return self.resolve(ty);
        }
        let boxed = format!("Box<{}>", self.named(base));
        if ty.is_non_null() {
            boxed
        } else {
            format!("Option<{boxed}>")
        }
    }

    /// True when the value may be absent from a response for this field.
    pub fn defaults_when_missing(&self, ty: &TypeRef) -> bool {
        ty.is_list()
            && self
                .schema
                .registry()
                .lookup_object_type(ty.base_name())
                .is_some()
    }

    fn is_declared(&self, name: &str) -> bool {
        self.schema.registry().lookup_object_type(name).is_some()
            || self.schema.enums().contains_key(name)
            || self.schema.inputs().contains_key(name)
            || self.schema.scalars().contains(name)
            || self.schema.unions().contains_key(name)
            || self.schema.interfaces().contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(pascal_case("createTag"), "CreateTag");
        assert_eq!(pascal_case("internal_transfer"), "InternalTransfer");
        assert_eq!(snake_case("createdAt"), "created_at");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("userID"), "user_id");
        assert_eq!(snake_case("CreateTagMutation"), "create_tag_mutation");
        assert_eq!(snake_case("__typename"), "__typename");
        assert_eq!(snake_case("_id"), "_id");
        assert_eq!(screaming_snake_case("UserQuery"), "USER_QUERY");
    }

    #[test]
    fn keywords_become_valid_identifiers() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("name"), "name");
        assert_eq!(rust_ident("3d"), "_3d");
        assert_eq!(rust_ident("_"), "field_");
        assert_eq!(rust_ident("__"), "field_");
    }

    #[test]
    fn colliding_fields_get_distinct_idents() {
        let mut idents = FieldIdents::default();
        assert_eq!(idents.claim("_"), "field_");
        assert_eq!(idents.claim("id"), "id");
        assert_eq!(idents.claim("_id"), "_id");
        assert_eq!(idents.claim("createdAt"), "created_at");
        assert_eq!(idents.claim("created_at"), "created_at_2");
        assert_eq!(idents.claim("CreatedAt"), "created_at_3");
        assert_eq!(idents.claim("type"), "r#type");
        assert_eq!(idents.claim("TYPE"), "type_2");
    }

    #[test]
    fn types_resolve_with_nullability() {
        let schema = Schema::parse(
            r#"
            scalar DateTime
            input Filter { and: Filter tags: [String!] }
            type User { id: ID! friend: User friends: [User!]! seen: DateTime }
            "#,
        )
        .unwrap();
        let types = RustTypes::new(&schema);

        let id = TypeRef::non_null(TypeRef::named("ID"));
        assert_eq!(types.resolve(&id), "String");
        assert_eq!(types.resolve(&TypeRef::named("Int")), "Option<i64>");
        assert_eq!(
            types.resolve(&TypeRef::list(TypeRef::non_null(TypeRef::named("Float")))),
            "Option<Vec<f64>>"
        );
        assert_eq!(types.resolve(&TypeRef::named("DateTime")), "Option<DateTime>");
        assert_eq!(types.resolve(&TypeRef::named("Mystery")), "Option<serde_json::Value>");

        let friend = TypeRef::named("User");
        assert_eq!(types.output_field(&friend), "Option<Box<User>>");
        assert_eq!(
            types.output_field(&TypeRef::non_null(TypeRef::named("User"))),
            "Option<Box<User>>"
        );
        let friends =
            TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("User"))));
        assert_eq!(types.output_field(&friends), "Vec<User>");
        assert!(types.defaults_when_missing(&friends));
        assert!(!types.defaults_when_missing(&friend));

        assert_eq!(types.input_field(&TypeRef::named("Filter")), "Option<Box<Filter>>");
        assert_eq!(
            types.input_field(&TypeRef::list(TypeRef::non_null(TypeRef::named("String")))),
            "Option<Vec<String>>"
        );
    }
}
