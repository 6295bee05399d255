use indexmap::IndexMap;

use crate::types::ObjectTypeDefinition;

/// Resolves a type name to its object type definition.
///
/// `None` is a normal outcome: scalars, enums, unions, interfaces and names the
/// schema never declared all resolve to nothing and are selected as leaves.
pub trait ObjectTypeLookup {
    fn lookup_object_type(&self, name: &str) -> Option<&ObjectTypeDefinition>;
}

/// Object types keyed by name, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    objects: IndexMap<String, ObjectTypeDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `object`, returning the definition it replaced, if any.
    pub fn insert(&mut self, object: ObjectTypeDefinition) -> Option<ObjectTypeDefinition> {
        self.objects.insert(object.name.clone(), object)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ObjectTypeDefinition> {
        self.objects.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectTypeDefinition> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectTypeLookup for Registry {
    fn lookup_object_type(&self, name: &str) -> Option<&ObjectTypeDefinition> {
        self.objects.get(name)
    }
}

impl FromIterator<ObjectTypeDefinition> for Registry {
    fn from_iter<I: IntoIterator<Item = ObjectTypeDefinition>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for object in iter {
            registry.insert(object);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDefinition, TypeRef};

    #[test]
    fn lookup_misses_are_none() {
        let registry: Registry = [ObjectTypeDefinition::new("User")
            .with_field(FieldDefinition::new("id", TypeRef::named("ID")))]
        .into_iter()
        .collect();

        assert!(registry.lookup_object_type("User").is_some());
        assert!(registry.lookup_object_type("String").is_none());
        assert!(registry.lookup_object_type("user").is_none());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let registry: Registry = ["Zebra", "Apple", "Mango"]
            .into_iter()
            .map(ObjectTypeDefinition::new)
            .collect();
        let names = registry.iter().map(|o| o.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Zebra", "Apple", "Mango"]);
    }
}
