use super::generator::StringGenerator;
use super::notation::box_name;
use super::registry::ClassStore;
use crate::error::Result;
use crate::metadata::{EntityDescriptor, MetadataDocument};
use crate::options::GraphOptions;

/// Builds the complete yUML class diagram for one set of entities.
#[derive(Debug, Clone)]
pub struct MetadataGrapher {
    generator: StringGenerator,
    options: GraphOptions,
}

impl MetadataGrapher {
    pub fn new(entities: Vec<EntityDescriptor>, options: GraphOptions) -> Result<Self> {
        let store = ClassStore::new(entities)?;
        let generator = StringGenerator::new(store).with_inherited_fields(options.inherited_fields);
        Ok(Self { generator, options })
    }

    pub fn from_document(document: MetadataDocument, options: GraphOptions) -> Result<Self> {
        Self::new(document.entities, options)
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Every token of the diagram: class boxes, inheritance edges and
    /// association edges, in entity order.
    pub fn generate(&mut self) -> Result<Vec<String>> {
        self.generator.reset();

        let names: Vec<String> = self
            .generator
            .store()
            .entities()
            .map(|e| e.name.clone())
            .collect();

        let mut tokens = Vec::new();
        for name in &names {
            tokens.push(self.generator.class_box(name)?);

            let store = self.generator.store();
            let parent = store.parent_of(name)?;

            if self.options.inheritance {
                if let Some(parent) = parent {
                    tokens.push(format!(
                        "[{}]^[{}]",
                        box_name(&parent.name),
                        box_name(name)
                    ));
                }
            }

            let associations: Vec<String> = store
                .require(name)?
                .association_names()
                .filter(|field| {
                    !(self.options.skip_inherited_associations
                        && parent.is_some_and(|p| p.association(field).is_some()))
                })
                .map(str::to_string)
                .collect();

            for field in &associations {
                if let Some(edge) = self.generator.association_edge(name, field)? {
                    tokens.push(edge);
                }
            }
        }

        tracing::debug!(tokens = tokens.len(), entities = names.len(), "generated diagram");
        Ok(tokens)
    }

    /// The diagram as one string, tokens joined by the configured separator.
    pub fn render(&mut self) -> Result<String> {
        Ok(self.generate()?.join(&self.options.separator))
    }
}
