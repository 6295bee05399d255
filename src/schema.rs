use std::fs;
use std::path::{Path, PathBuf};

use graphql_parser::schema::{
    Definition, Document, Field, InputValue, SchemaDefinition, Type, TypeDefinition,
    TypeExtension, Value,
};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::registry::Registry;
use crate::types::{
    ArgumentDefinition, ConstValue, FieldDefinition, ObjectTypeDefinition, TypeRef,
};

pub const DEFAULT_QUERY_TYPE: &str = "Query";
pub const DEFAULT_MUTATION_TYPE: &str = "Mutation";

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {origin}: {message}")]
    Parse { origin: String, message: String },
    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),
    #[error("schema definition appears more than once")]
    DuplicateSchemaDefinition,
    #[error("cannot extend undefined type `{0}`")]
    UndefinedExtension(String),
    #[error("field `{field}` is defined more than once on `{ty}`")]
    DuplicateField { ty: String, field: String },
}

/// Everything the generator needs to know about a schema, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    registry: Registry,
    enums: IndexMap<String, Vec<String>>,
    inputs: IndexMap<String, Vec<ArgumentDefinition>>,
    scalars: IndexSet<String>,
    unions: IndexMap<String, Vec<String>>,
    interfaces: IndexSet<String>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl Schema {
    /// Parses a single SDL document.
    pub fn parse(source: &str) -> Result<Self, SchemaError> {
        let doc = parse_document("<input>", source)?;
        let mut schema = Schema::default();
        schema.merge(&[doc])?;
        Ok(schema)
    }

    /// Reads, parses and merges every file in `paths`, in order.
    pub fn load(paths: &[PathBuf]) -> Result<Self, SchemaError> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
                path: path.clone(),
                source,
            })?;
            sources.push((path.as_path(), text));
        }

        let mut docs = Vec::with_capacity(sources.len());
        for (path, text) in &sources {
            debug!(path = %path.display(), "parsing schema file");
            docs.push(parse_document(&origin(path), text)?);
        }

        let mut schema = Schema::default();
        schema.merge(&docs)?;
        Ok(schema)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn query_type(&self) -> &str {
        self.query_type.as_deref().unwrap_or(DEFAULT_QUERY_TYPE)
    }

    pub fn mutation_type(&self) -> &str {
        self.mutation_type.as_deref().unwrap_or(DEFAULT_MUTATION_TYPE)
    }

    pub fn enums(&self) -> &IndexMap<String, Vec<String>> {
        &self.enums
    }

    pub fn inputs(&self) -> &IndexMap<String, Vec<ArgumentDefinition>> {
        &self.inputs
    }

    pub fn scalars(&self) -> &IndexSet<String> {
        &self.scalars
    }

    pub fn unions(&self) -> &IndexMap<String, Vec<String>> {
        &self.unions
    }

    pub fn interfaces(&self) -> &IndexSet<String> {
        &self.interfaces
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        name == self.query_type() || name == self.mutation_type()
    }

    fn merge(&mut self, docs: &[Document<'_, String>]) -> Result<(), SchemaError> {
        let mut seen = IndexSet::new();
        for doc in docs {
            for def in &doc.definitions {
                match def {
                    Definition::SchemaDefinition(sd) => self.set_roots(sd)?,
                    Definition::TypeDefinition(td) => self.define(td, &mut seen)?,
                    Definition::TypeExtension(_) | Definition::DirectiveDefinition(_) => {}
                }
            }
        }

        // Extensions may precede their base definition, so they go last.
        for doc in docs {
            for def in &doc.definitions {
                if let Definition::TypeExtension(ext) = def {
                    self.extend(ext)?;
                }
            }
        }
        Ok(())
    }

    fn set_roots(&mut self, sd: &SchemaDefinition<'_, String>) -> Result<(), SchemaError> {
        if self.query_type.is_some() || self.mutation_type.is_some() {
            return Err(SchemaError::DuplicateSchemaDefinition);
        }
        self.query_type = Some(
            sd.query
                .clone()
                .unwrap_or_else(|| DEFAULT_QUERY_TYPE.to_string()),
        );
        self.mutation_type = Some(
            sd.mutation
                .clone()
                .unwrap_or_else(|| DEFAULT_MUTATION_TYPE.to_string()),
        );
        Ok(())
    }

    fn define(
        &mut self,
        td: &TypeDefinition<'_, String>,
        seen: &mut IndexSet<String>,
    ) -> Result<(), SchemaError> {
        let name = match td {
            TypeDefinition::Scalar(t) => &t.name,
            TypeDefinition::Object(t) => &t.name,
            TypeDefinition::Interface(t) => &t.name,
            TypeDefinition::Union(t) => &t.name,
            TypeDefinition::Enum(t) => &t.name,
            TypeDefinition::InputObject(t) => &t.name,
        };
        if is_builtin_scalar(name) {
            return Ok(());
        }
        if !seen.insert(name.clone()) {
            return Err(SchemaError::DuplicateType(name.clone()));
        }

        match td {
            TypeDefinition::Scalar(_) => {
                self.scalars.insert(name.clone());
            }
            TypeDefinition::Object(t) => {
                let mut fields = Vec::with_capacity(t.fields.len());
                let incoming = t.fields.iter().map(field_definition);
                append_unique(name, &mut fields, incoming, |f| f.name.as_str())?;
                self.registry.insert(ObjectTypeDefinition {
                    name: name.clone(),
                    fields,
                });
            }
            TypeDefinition::Interface(_) => {
                self.interfaces.insert(name.clone());
            }
            TypeDefinition::Union(t) => {
                self.unions.insert(name.clone(), t.types.clone());
            }
            TypeDefinition::Enum(t) => {
                let values = t.values.iter().map(|v| v.name.clone()).collect();
                self.enums.insert(name.clone(), values);
            }
            TypeDefinition::InputObject(t) => {
                let mut fields = Vec::with_capacity(t.fields.len());
                let incoming = t.fields.iter().map(argument_definition);
                append_unique(name, &mut fields, incoming, |f| f.name.as_str())?;
                self.inputs.insert(name.clone(), fields);
            }
        }
        Ok(())
    }

    fn extend(&mut self, ext: &TypeExtension<'_, String>) -> Result<(), SchemaError> {
        match ext {
            TypeExtension::Object(t) => {
                let object = self
                    .registry
                    .get_mut(&t.name)
                    .ok_or_else(|| SchemaError::UndefinedExtension(t.name.clone()))?;
                let incoming = t.fields.iter().map(field_definition);
                append_unique(&t.name, &mut object.fields, incoming, |f| f.name.as_str())?;
            }
            TypeExtension::InputObject(t) => {
                let fields = self
                    .inputs
                    .get_mut(&t.name)
                    .ok_or_else(|| SchemaError::UndefinedExtension(t.name.clone()))?;
                let incoming = t.fields.iter().map(argument_definition);
                append_unique(&t.name, fields, incoming, |f| f.name.as_str())?;
            }
            TypeExtension::Enum(t) => {
                let values = self
                    .enums
                    .get_mut(&t.name)
                    .ok_or_else(|| SchemaError::UndefinedExtension(t.name.clone()))?;
                values.extend(t.values.iter().map(|v| v.name.clone()));
            }
            TypeExtension::Union(t) => {
                let members = self
                    .unions
                    .get_mut(&t.name)
                    .ok_or_else(|| SchemaError::UndefinedExtension(t.name.clone()))?;
                members.extend(t.types.iter().cloned());
            }
            TypeExtension::Scalar(_) | TypeExtension::Interface(_) => {}
        }
        Ok(())
    }
}

/// Appends `incoming` to `fields`, failing on the first name already present.
fn append_unique<T>(
    ty: &str,
    fields: &mut Vec<T>,
    incoming: impl IntoIterator<Item = T>,
    name: impl Fn(&T) -> &str,
) -> Result<(), SchemaError> {
    for field in incoming {
        if fields.iter().any(|f| name(f) == name(&field)) {
            return Err(SchemaError::DuplicateField {
                ty: ty.to_string(),
                field: name(&field).to_string(),
            });
        }
        fields.push(field);
    }
    Ok(())
}

pub fn is_builtin_scalar(name: &str) -> bool {
    matches!(name, "String" | "Int" | "Float" | "Boolean" | "ID")
}

fn origin(path: &Path) -> String {
    path.display().to_string()
}

fn parse_document<'a>(
    origin: &str,
    source: &'a str,
) -> Result<Document<'a, String>, SchemaError> {
    graphql_parser::parse_schema::<String>(source).map_err(|e| SchemaError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

fn field_definition(field: &Field<'_, String>) -> FieldDefinition {
    FieldDefinition {
        name: field.name.clone(),
        arguments: field.arguments.iter().map(argument_definition).collect(),
        ty: type_ref(&field.field_type),
    }
}

fn argument_definition(input: &InputValue<'_, String>) -> ArgumentDefinition {
    ArgumentDefinition {
        name: input.name.clone(),
        ty: type_ref(&input.value_type),
        default_value: input.default_value.as_ref().map(const_value),
    }
}

fn type_ref(ty: &Type<'_, String>) -> TypeRef {
    match ty {
        Type::NamedType(n) => TypeRef::Named(n.clone()),
        Type::ListType(inner) => TypeRef::List(Box::new(type_ref(inner))),
        Type::NonNullType(inner) => TypeRef::NonNull(Box::new(type_ref(inner))),
    }
}

fn const_value(value: &Value<'_, String>) -> ConstValue {
    match value {
        Value::Int(n) => n.as_i64().map_or(ConstValue::Null, ConstValue::Int),
        Value::Float(v) => ConstValue::Float(*v),
        Value::String(s) => ConstValue::String(s.clone()),
        Value::Boolean(b) => ConstValue::Boolean(*b),
        Value::Enum(e) => ConstValue::Enum(e.clone()),
        Value::List(items) => ConstValue::List(items.iter().map(const_value).collect()),
        Value::Object(entries) => ConstValue::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), const_value(v)))
                .collect(),
        ),
        // Variables are not legal in SDL defaults.
        Value::Null | Value::Variable(_) => ConstValue::Null,
    }
}
