use std::collections::{HashMap, HashSet};

use crate::error::{GraphError, Result};
use crate::metadata::{AssociationDescriptor, EntityDescriptor};

type FieldKey = (String, String);

/// Every entity of one diagram, plus the lookups the generator needs.
///
/// Built once from a fixed descriptor set and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ClassStore {
    entities: Vec<EntityDescriptor>,
    by_name: HashMap<String, usize>,
    // (entity, field) -> (target entity, mirror field)
    mirrors: HashMap<FieldKey, FieldKey>,
}

impl ClassStore {
    pub fn new(entities: Vec<EntityDescriptor>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(entities.len());

        for (index, entity) in entities.iter().enumerate() {
            validate_entity(entity)?;
            if by_name.insert(entity.name.clone(), index).is_some() {
                return Err(GraphError::DuplicateEntity {
                    name: entity.name.clone(),
                });
            }
        }

        let mut store = Self {
            entities,
            by_name,
            mirrors: HashMap::new(),
        };
        store.mirrors = store.index_mirrors();

        tracing::debug!(
            entities = store.entities.len(),
            mirrors = store.mirrors.len(),
            "registered class store"
        );
        Ok(store)
    }

    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub(crate) fn require(&self, name: &str) -> Result<&EntityDescriptor> {
        self.get(name).ok_or_else(|| GraphError::unknown_entity(name))
    }

    /// Entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> + '_ {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Immediate parent, if the metadata names one and it is registered.
    pub fn parent_of(&self, entity: &str) -> Result<Option<&EntityDescriptor>> {
        let entity = self.require(entity)?;
        Ok(entity.parent.as_deref().and_then(|p| self.get(p)))
    }

    /// Registered ancestors, nearest first. Stops at the first unregistered
    /// name and never revisits an entity.
    pub fn ancestors_of(&self, entity: &str) -> Result<Vec<&EntityDescriptor>> {
        let mut current = self.require(entity)?;
        let mut seen: HashSet<&str> = HashSet::from([current.name.as_str()]);
        let mut chain = Vec::new();

        while let Some(parent) = current.parent.as_deref().and_then(|p| self.get(p)) {
            if !seen.insert(parent.name.as_str()) {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        Ok(chain)
    }

    /// Association on the other side of a bidirectional pair.
    pub fn mirror_of(&self, entity: &str, field: &str) -> Option<(&str, &str)> {
        self.mirrors
            .get(&(entity.to_string(), field.to_string()))
            .map(|(e, f)| (e.as_str(), f.as_str()))
    }

    fn index_mirrors(&self) -> HashMap<FieldKey, FieldKey> {
        // Inverse sides keyed by the owning field they claim: (owner entity, owning field).
        let mut claimed: HashMap<FieldKey, FieldKey> = HashMap::new();
        for entity in &self.entities {
            for assoc in entity.associations.iter().filter(|a| a.inverse_side) {
                if let Some(mapped_by) = &assoc.mapped_by {
                    claimed
                        .entry((assoc.target.clone(), mapped_by.clone()))
                        .or_insert_with(|| (entity.name.clone(), assoc.field_name.clone()));
                }
            }
        }

        let mut mirrors = HashMap::new();
        for entity in &self.entities {
            for assoc in &entity.associations {
                let Some(target) = self.get(&assoc.target) else {
                    continue;
                };
                let key = (entity.name.clone(), assoc.field_name.clone());

                let candidate = if assoc.owning_side {
                    match assoc.reverse_field() {
                        Some(field) => target.association(field),
                        None => claimed
                            .get(&key)
                            .filter(|(owner, _)| *owner == target.name)
                            .and_then(|(_, field)| target.association(field)),
                    }
                } else if assoc.inverse_side {
                    assoc.reverse_field().and_then(|f| target.association(f))
                } else {
                    None
                };
                let mirror = candidate
                    .filter(|m| points_back(entity, assoc, m))
                    .map(|m| (target.name.clone(), m.field_name.clone()));

                if let Some(mirror) = mirror {
                    mirrors.insert(key, mirror);
                }
            }
        }

        mirrors
    }
}

/// Whether `mirror`, declared on the target of `assoc`, names `assoc` as its
/// counterpart. An owning mirror may leave `inversed_by` unset.
fn points_back(
    owner: &EntityDescriptor,
    assoc: &AssociationDescriptor,
    mirror: &AssociationDescriptor,
) -> bool {
    if mirror.target != owner.name {
        return false;
    }
    if assoc.owning_side {
        mirror.inverse_side && mirror.reverse_field() == Some(assoc.field_name.as_str())
    } else {
        mirror.owning_side && mirror.reverse_field().is_none_or(|f| f == assoc.field_name)
    }
}

fn validate_entity(entity: &EntityDescriptor) -> Result<()> {
    if let Some(id) = entity.identifiers.iter().find(|id| !entity.has_field(id)) {
        return Err(GraphError::invalid(
            &entity.name,
            format!("identifier '{}' is not a declared field", id),
        ));
    }

    let mut names = HashSet::new();
    for assoc in &entity.associations {
        if !names.insert(assoc.field_name.as_str()) {
            return Err(GraphError::invalid(
                &entity.name,
                format!("association '{}' is declared twice", assoc.field_name),
            ));
        }
        if assoc.mapped_by.is_some() && assoc.inversed_by.is_some() {
            return Err(GraphError::invalid(
                &entity.name,
                format!(
                    "association '{}' sets both mapped_by and inversed_by",
                    assoc.field_name
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str) -> EntityDescriptor {
        EntityDescriptor::new(name)
    }

    #[test]
    fn parent_of_returns_registered_parent_only() {
        let store = ClassStore::new(vec![
            entity("Parent\\Entity").with_field("b"),
            entity("Extended\\Entity").with_parent("Parent\\Entity"),
            entity("Orphan").with_parent("Not\\Registered"),
        ])
        .unwrap();

        let parent = store.parent_of("Extended\\Entity").unwrap();
        assert_eq!(parent.map(|p| p.name.as_str()), Some("Parent\\Entity"));
        assert!(store.parent_of("Parent\\Entity").unwrap().is_none());
        assert!(store.parent_of("Orphan").unwrap().is_none());
    }

    #[test]
    fn parent_of_unknown_entity_fails() {
        let store = ClassStore::new(vec![entity("A")]).unwrap();
        match store.parent_of("B").unwrap_err() {
            GraphError::UnknownEntity { name } => assert_eq!(name, "B"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn ancestors_walk_until_unregistered_and_survive_cycles() {
        let store = ClassStore::new(vec![
            entity("C").with_parent("B"),
            entity("B").with_parent("A"),
            entity("A").with_parent("Outside"),
            entity("X").with_parent("Y"),
            entity("Y").with_parent("X"),
        ])
        .unwrap();

        let names: Vec<&str> = store
            .ancestors_of("C")
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);

        let cyclic: Vec<&str> = store
            .ancestors_of("X")
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(cyclic, vec!["Y"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ClassStore::new(vec![entity("A"), entity("A")]).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateEntity { name } if name == "A"));
    }

    #[test]
    fn rejects_identifier_outside_fields() {
        let mut bad = entity("A").with_field("a");
        bad.identifiers.push("z".to_string());

        let err = ClassStore::new(vec![bad]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidDescriptor { entity, .. } if entity == "A"));
    }

    #[test]
    fn rejects_both_mapped_and_inversed() {
        let mut assoc = AssociationDescriptor::owning("b", "B").inversed_by("a");
        assoc.mapped_by = Some("a".to_string());

        let err = ClassStore::new(vec![entity("A").with_association(assoc)]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidDescriptor { .. }));
    }

    #[test]
    fn mirrors_are_indexed_from_both_sides() {
        let store = ClassStore::new(vec![
            entity("A").with_association(AssociationDescriptor::owning("b", "B").inversed_by("a")),
            entity("B").with_association(AssociationDescriptor::inverse("a", "A", Some("b"))),
        ])
        .unwrap();

        assert_eq!(store.mirror_of("A", "b"), Some(("B", "a")));
        assert_eq!(store.mirror_of("B", "a"), Some(("A", "b")));
    }

    #[test]
    fn owning_side_without_inversed_by_finds_claiming_inverse() {
        let store = ClassStore::new(vec![
            entity("A").with_association(AssociationDescriptor::owning("b", "B")),
            entity("B").with_association(AssociationDescriptor::inverse("a", "A", Some("b"))),
        ])
        .unwrap();

        assert_eq!(store.mirror_of("A", "b"), Some(("B", "a")));
    }

    #[test]
    fn mirror_requires_both_sides_to_agree() {
        let store = ClassStore::new(vec![
            entity("A")
                .with_association(AssociationDescriptor::owning("b", "B").inversed_by("a"))
                .with_association(AssociationDescriptor::owning("z", "B")),
            entity("B").with_association(AssociationDescriptor::inverse("a", "A", Some("z"))),
        ])
        .unwrap();

        assert_eq!(store.mirror_of("A", "b"), None);
        assert_eq!(store.mirror_of("A", "z"), Some(("B", "a")));
        assert_eq!(store.mirror_of("B", "a"), Some(("A", "z")));
    }

    #[test]
    fn inverse_side_pointing_at_foreign_owner_is_unpaired() {
        let store = ClassStore::new(vec![
            entity("A").with_association(AssociationDescriptor::owning("b", "B").inversed_by("x")),
            entity("B")
                .with_association(AssociationDescriptor::inverse("a", "A", Some("b")))
                .with_association(AssociationDescriptor::inverse("x", "C", Some("b"))),
            entity("C"),
        ])
        .unwrap();

        assert_eq!(store.mirror_of("A", "b"), None);
        assert_eq!(store.mirror_of("B", "a"), None);
        assert_eq!(store.mirror_of("B", "x"), None);
    }

    #[test]
    fn no_mirror_for_unknown_target_or_missing_field() {
        let store = ClassStore::new(vec![
            entity("A")
                .with_association(AssociationDescriptor::owning("b", "B").inversed_by("a"))
                .with_association(AssociationDescriptor::owning("c", "C").inversed_by("a")),
            entity("B"),
        ])
        .unwrap();

        assert_eq!(store.mirror_of("A", "b"), None);
        assert_eq!(store.mirror_of("A", "c"), None);
    }
}
