use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::registry::ObjectTypeLookup;

/// Selected when an object type ends up with nothing else to select, so the
/// enclosing field still carries a non-empty selection set.
pub const TYPENAME_FIELD: &str = "__typename";

/// An argument bound to the operation variable of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub variable: String,
}

impl Argument {
    pub fn from_variable(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            variable: name.clone(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Selection>,
}

impl Selection {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::with_children(name, Vec::new())
    }

    pub fn with_children(name: impl Into<String>, children: Vec<Selection>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&Selection> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of leaf fields reachable from this node, counting itself if it is one.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Selection::leaf_count).sum()
        }
    }
}

/// Builds the child selections for `type_name`.
///
/// Unknown and non-object types yield no children. Object types yield one child
/// per declared field, in declaration order. The root type itself is not on the
/// active path, so a field pointing back at it is expanded exactly once before
/// the next occurrence is cut.
pub fn synthesize<L>(type_name: &str, registry: &L) -> Vec<Selection>
where
    L: ObjectTypeLookup + ?Sized,
{
    let mut active = IndexSet::new();
    expand(type_name, registry, &mut active)
}

fn expand<'r, L>(
    type_name: &str,
    registry: &'r L,
    active: &mut IndexSet<&'r str>,
) -> Vec<Selection>
where
    L: ObjectTypeLookup + ?Sized,
{
    let Some(object) = registry.lookup_object_type(type_name) else {
        return Vec::new();
    };

    let mut children = Vec::with_capacity(object.fields.len());
    for field in &object.fields {
        let base = field.ty.base_name();
        if registry.lookup_object_type(base).is_none() {
            children.push(Selection::leaf(&field.name));
            continue;
        }

        if active.contains(base) {
            debug!(
                parent = %object.name,
                field = %field.name,
                ty = base,
                "truncating cyclic selection"
            );
            continue;
        }

        active.insert(base);
        let nested = expand(base, registry, active);
        active.pop();

        children.push(Selection::with_children(&field.name, non_empty(nested)));
    }
    children
}

pub(crate) fn non_empty(mut children: Vec<Selection>) -> Vec<Selection> {
    if children.is_empty() {
        children.push(Selection::leaf(TYPENAME_FIELD));
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::{FieldDefinition, ObjectTypeDefinition, TypeRef};

    fn names(sels: &[Selection]) -> Vec<&str> {
        sels.iter().map(|s| s.name.as_str()).collect()
    }

    fn user_registry() -> Registry {
        [
            ObjectTypeDefinition::new("User")
                .with_field(FieldDefinition::new(
                    "id",
                    TypeRef::non_null(TypeRef::named("ID")),
                ))
                .with_field(FieldDefinition::new("name", TypeRef::named("String")))
                .with_field(FieldDefinition::new("address", TypeRef::named("Address")))
                .with_field(FieldDefinition::new(
                    "tags",
                    TypeRef::list(TypeRef::named("String")),
                )),
            ObjectTypeDefinition::new("Address")
                .with_field(FieldDefinition::new("street", TypeRef::named("String")))
                .with_field(FieldDefinition::new("city", TypeRef::named("City"))),
            ObjectTypeDefinition::new("City")
                .with_field(FieldDefinition::new("name", TypeRef::named("String"))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn object_fields_follow_declaration_order() {
        let sels = synthesize("User", &user_registry());
        assert_eq!(names(&sels), ["id", "name", "address", "tags"]);

        let address = &sels[2];
        assert_eq!(names(&address.children), ["street", "city"]);
        assert_eq!(names(&address.children[1].children), ["name"]);
        assert!(sels[0].is_leaf());
        assert!(sels[3].is_leaf());
    }

    #[test]
    fn scalars_enums_and_unknown_names_are_leaves() {
        let registry = user_registry();
        for name in ["String", "ID", "Status", "NotDeclared", ""] {
            assert!(synthesize(name, &registry).is_empty(), "{name}");
        }
    }

    #[test]
    fn self_reference_is_truncated_one_level_down() {
        let registry: Registry = [ObjectTypeDefinition::new("Node")
            .with_field(FieldDefinition::new("id", TypeRef::named("ID")))
            .with_field(FieldDefinition::new("parent", TypeRef::named("Node")))]
        .into_iter()
        .collect();

        let sels = synthesize("Node", &registry);
        assert_eq!(names(&sels), ["id", "parent"]);
        let parent = &sels[1];
        assert_eq!(names(&parent.children), ["id"]);
        assert!(parent.child("parent").is_none());
    }

    #[test]
    fn mutual_cycle_terminates_with_valid_selection() {
        let registry: Registry = [
            ObjectTypeDefinition::new("A")
                .with_field(FieldDefinition::new("b", TypeRef::named("B"))),
            ObjectTypeDefinition::new("B")
                .with_field(FieldDefinition::new("a", TypeRef::named("A"))),
        ]
        .into_iter()
        .collect();

        let sels = synthesize("A", &registry);
        assert_eq!(names(&sels), ["b"]);
        let a = &sels[0].children[0];
        assert_eq!(a.name, "a");
        assert_eq!(names(&a.children), [TYPENAME_FIELD]);
    }

    #[test]
    fn lists_of_objects_select_the_element_type() {
        let registry: Registry = [
            ObjectTypeDefinition::new("Team").with_field(FieldDefinition::new(
                "members",
                TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Member")))),
            )),
            ObjectTypeDefinition::new("Member")
                .with_field(FieldDefinition::new("login", TypeRef::named("String"))),
        ]
        .into_iter()
        .collect();

        let sels = synthesize("Team", &registry);
        assert_eq!(names(&sels[0].children), ["login"]);
    }

    #[test]
    fn sibling_branches_are_not_cut_by_each_other() {
        let registry: Registry = [
            ObjectTypeDefinition::new("Order")
                .with_field(FieldDefinition::new("billing", TypeRef::named("Address")))
                .with_field(FieldDefinition::new("shipping", TypeRef::named("Address"))),
            ObjectTypeDefinition::new("Address")
                .with_field(FieldDefinition::new("zip", TypeRef::named("String"))),
        ]
        .into_iter()
        .collect();

        let sels = synthesize("Order", &registry);
        assert_eq!(names(&sels[0].children), ["zip"]);
        assert_eq!(names(&sels[1].children), ["zip"]);
    }

    #[test]
    fn union_and_interface_fields_are_leaves() {
        let schema = crate::schema::Schema::parse(
            r#"
            interface Node { id: ID! }
            union SearchResult = User | Tag
            type User implements Node { id: ID! name: String }
            type Tag { id: ID! }
            type Q { hit: SearchResult node: Node hits: [SearchResult!]! user: User }
            "#,
        )
        .unwrap();

        let sels = synthesize("Q", schema.registry());
        assert_eq!(names(&sels), ["hit", "node", "hits", "user"]);
        assert!(sels[0].is_leaf());
        assert!(sels[1].is_leaf());
        assert!(sels[2].is_leaf());
        assert_eq!(names(&sels[3].children), ["id", "name"]);
    }

    #[test]
    fn leaf_count_counts_terminal_fields() {
        let sels = synthesize("User", &user_registry());
        let root = Selection::with_children("user", sels);
        // id, name, address.street, address.city.name, tags
        assert_eq!(root.leaf_count(), 5);
    }
}
