use std::collections::HashSet;

use super::notation::{
    AssociationEdge, Cardinality, EdgeLabel, Ownership, TargetKind, bidirectional_arrows,
    box_name, unidirectional_arrows,
};
use super::registry::ClassStore;
use super::visited::VisitedAssociations;
use crate::error::{GraphError, Result};
use crate::options::InheritedFields;

/// Turns registered entities into yUML class boxes and association edges.
///
/// Owns the visited-association log of the current run, so a bidirectional
/// relationship comes out once no matter which side is asked first.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    store: ClassStore,
    visited: VisitedAssociations,
    inherited_fields: InheritedFields,
}

impl StringGenerator {
    pub fn new(store: ClassStore) -> Self {
        Self {
            store,
            visited: VisitedAssociations::new(),
            inherited_fields: InheritedFields::default(),
        }
    }

    pub fn with_inherited_fields(mut self, inherited_fields: InheritedFields) -> Self {
        self.inherited_fields = inherited_fields;
        self
    }

    pub fn store(&self) -> &ClassStore {
        &self.store
    }

    pub fn association_logger(&self) -> &VisitedAssociations {
        &self.visited
    }

    /// Forget every visited association, starting a new run.
    pub fn reset(&mut self) {
        self.visited.clear();
    }

    /// `[Name|+id;field]`, leaving out fields already shown on the parent box.
    pub fn class_box(&self, entity: &str) -> Result<String> {
        let class = self.store.require(entity)?;

        let inherited: HashSet<&str> = match self.inherited_fields {
            InheritedFields::Parent => self
                .store
                .parent_of(entity)?
                .into_iter()
                .flat_map(|p| p.fields.iter().map(String::as_str))
                .collect(),
            InheritedFields::Ancestors => self
                .store
                .ancestors_of(entity)?
                .into_iter()
                .flat_map(|p| p.fields.iter().map(String::as_str))
                .collect(),
        };

        let fields: Vec<String> = class
            .fields
            .iter()
            .filter(|f| !inherited.contains(f.as_str()))
            .map(|f| {
                if class.is_identifier(f) {
                    format!("+{}", f)
                } else {
                    f.clone()
                }
            })
            .collect();

        let name = box_name(&class.name);
        if fields.is_empty() {
            Ok(format!("[{}]", name))
        } else {
            Ok(format!("[{}|{}]", name, fields.join(";")))
        }
    }

    /// Edge for `entity.field` as seen from `entity`, ignoring the visited log.
    pub fn edge(&self, entity: &str, field: &str) -> Result<AssociationEdge> {
        let class = self.store.require(entity)?;
        let association = class
            .association(field)
            .ok_or_else(|| GraphError::UnknownAssociation {
                entity: entity.to_string(),
                field: field.to_string(),
            })?;

        let ownership = Ownership::of(association);
        let target_label = Some(EdgeLabel::new(field, Cardinality::of(association)));

        let mirror = self
            .store
            .mirror_of(entity, field)
            .and_then(|(target, mirror)| self.store.get(target)?.association(mirror));

        if let Some(mirror) = mirror {
            let (source_arrow, target_arrow) = bidirectional_arrows(ownership);
            return Ok(AssociationEdge {
                source: box_name(&class.name),
                source_arrow,
                source_label: Some(EdgeLabel::new(
                    mirror.field_name.as_str(),
                    Cardinality::of(mirror),
                )),
                target_label,
                target_arrow,
                target: box_name(&association.target),
            });
        }

        let target = if self.store.contains(&association.target) {
            TargetKind::Known
        } else {
            TargetKind::Unknown
        };
        let (source_arrow, target_arrow) = unidirectional_arrows(ownership, target);

        Ok(AssociationEdge {
            source: box_name(&class.name),
            source_arrow,
            source_label: None,
            target_label,
            target_arrow,
            target: box_name(&association.target),
        })
    }

    /// Rendered edge for `entity.field`, ignoring the visited log.
    pub fn association_string(&self, entity: &str, field: &str) -> Result<String> {
        Ok(self.edge(entity, field)?.to_string())
    }

    /// Rendered edge for `entity.field`, or `None` if this association (or its
    /// mirror) was already drawn in the current run.
    pub fn association_edge(&mut self, entity: &str, field: &str) -> Result<Option<String>> {
        if self.visited.is_visited(entity, field) {
            tracing::debug!(entity, field, "association already drawn");
            return Ok(None);
        }

        let edge = self.edge(entity, field)?;
        self.visited.mark_visited(entity, field);

        if let Some((target, mirror)) = self.store.mirror_of(entity, field) {
            tracing::debug!(
                entity,
                field,
                mirror_entity = target,
                mirror_field = mirror,
                "merged bidirectional association"
            );
            self.visited.mark_visited(target, mirror);
        }

        let notation = edge.to_string();
        tracing::trace!(%notation, "association edge");
        Ok(Some(notation))
    }
}

/// Read an edge right to left: `[A]<>a 1-b 1>[B]` becomes `[B]<b 1-a 1<>[A]`.
pub fn reverse_notation(notation: &str) -> Result<String> {
    let edge: AssociationEdge = notation.parse()?;
    Ok(edge.reversed().to_string())
}
