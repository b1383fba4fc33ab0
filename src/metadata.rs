use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// One mapped class as reported by the metadata source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    /// Direct superclass, registered or not.
    #[serde(default)]
    pub parent: Option<String>,
    /// Plain (non-association) fields in declaration order.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Key fields, a subset of `fields`.
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub associations: Vec<AssociationDescriptor>,
}

/// A typed relationship field. The owner is the entity whose `associations` holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationDescriptor {
    pub field_name: String,
    pub target: String,
    #[serde(default = "default_owning_side")]
    pub owning_side: bool,
    #[serde(default)]
    pub inverse_side: bool,
    #[serde(default)]
    pub collection_valued: bool,
    #[serde(default)]
    pub mapped_by: Option<String>,
    #[serde(default)]
    pub inversed_by: Option<String>,
}

fn default_owning_side() -> bool {
    true
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            identifiers: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Declare a field and mark it as part of the identifier.
    pub fn with_identifier(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.identifiers.push(field.clone());
        self.fields.push(field);
        self
    }

    pub fn with_association(mut self, association: AssociationDescriptor) -> Self {
        self.associations.push(association);
        self
    }

    pub fn is_identifier(&self, field: &str) -> bool {
        self.identifiers.iter().any(|f| f == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn association(&self, field: &str) -> Option<&AssociationDescriptor> {
        self.associations.iter().find(|a| a.field_name == field)
    }

    pub fn association_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.associations.iter().map(|a| a.field_name.as_str())
    }
}

impl AssociationDescriptor {
    /// Owning side, single valued, unidirectional.
    pub fn owning(field_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            target: target.into(),
            owning_side: true,
            inverse_side: false,
            collection_valued: false,
            mapped_by: None,
            inversed_by: None,
        }
    }

    /// Inverse side, single valued. `mapped_by` names the owning field on the target.
    pub fn inverse(
        field_name: impl Into<String>,
        target: impl Into<String>,
        mapped_by: Option<&str>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            target: target.into(),
            owning_side: false,
            inverse_side: true,
            collection_valued: false,
            mapped_by: mapped_by.map(str::to_string),
            inversed_by: None,
        }
    }

    pub fn inversed_by(mut self, field: impl Into<String>) -> Self {
        self.inversed_by = Some(field.into());
        self
    }

    pub fn collection(mut self) -> Self {
        self.collection_valued = true;
        self
    }

    /// Field on the target that points back, if any.
    pub fn reverse_field(&self) -> Option<&str> {
        if self.owning_side {
            self.inversed_by.as_deref()
        } else {
            self.mapped_by.as_deref()
        }
    }
}

/// Serialized set of descriptors, one document per diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
}

impl MetadataDocument {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| GraphError::Metadata {
            format: "JSON",
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| GraphError::Metadata {
            format: "YAML",
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GraphError::Metadata {
            format: "TOML",
            message: e.to_string(),
        })
    }

    /// Try JSON, then YAML, then TOML. Reports the JSON error when all fail.
    pub fn from_str_any(content: &str) -> Result<Self> {
        match Self::from_json_str(content) {
            Ok(doc) => Ok(doc),
            Err(json_err) => Self::from_yaml_str(content)
                .or_else(|_| Self::from_toml_str(content))
                .map_err(|_| json_err),
        }
    }

    /// Load a document, picking the parser from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_str_any(&content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON: &str = r#"{
        "entities": [
            {
                "name": "App\\Entity\\User",
                "fields": ["id", "email"],
                "identifiers": ["id"],
                "associations": [
                    { "field_name": "groups", "target": "App\\Entity\\Group",
                      "collection_valued": true, "inversed_by": "users" }
                ]
            },
            {
                "name": "App\\Entity\\Group",
                "fields": ["id"],
                "identifiers": ["id"],
                "associations": [
                    { "field_name": "users", "target": "App\\Entity\\User",
                      "owning_side": false, "inverse_side": true,
                      "collection_valued": true, "mapped_by": "groups" }
                ]
            }
        ]
    }"#;

    const YAML: &str = r#"
entities:
  - name: App\Entity\User
    fields: [id, email]
    identifiers: [id]
    associations:
      - field_name: groups
        target: App\Entity\Group
        collection_valued: true
        inversed_by: users
  - name: App\Entity\Group
    fields: [id]
    identifiers: [id]
    associations:
      - field_name: users
        target: App\Entity\User
        owning_side: false
        inverse_side: true
        collection_valued: true
        mapped_by: groups
"#;

    const TOML: &str = r#"
[[entities]]
name = 'App\Entity\User'
fields = ["id", "email"]
identifiers = ["id"]

[[entities.associations]]
field_name = "groups"
target = 'App\Entity\Group'
collection_valued = true
inversed_by = "users"

[[entities]]
name = 'App\Entity\Group'
fields = ["id"]
identifiers = ["id"]

[[entities.associations]]
field_name = "users"
target = 'App\Entity\User'
owning_side = false
inverse_side = true
collection_valued = true
mapped_by = "groups"
"#;

    #[test]
    fn all_formats_load_the_same_document() {
        let json = MetadataDocument::from_json_str(JSON).expect("json");
        let yaml = MetadataDocument::from_yaml_str(YAML).expect("yaml");
        let toml = MetadataDocument::from_toml_str(TOML).expect("toml");

        assert_eq!(json, yaml);
        assert_eq!(json, toml);
        assert_eq!(json.entities.len(), 2);
        assert_eq!(json.entities[0].name, "App\\Entity\\User");
    }

    #[test]
    fn association_flags_default_to_owning_single_valued() {
        let doc = MetadataDocument::from_json_str(
            r#"{"entities":[{"name":"A","associations":[{"field_name":"b","target":"B"}]}]}"#,
        )
        .unwrap();
        let assoc = &doc.entities[0].associations[0];

        assert!(assoc.owning_side);
        assert!(!assoc.inverse_side);
        assert!(!assoc.collection_valued);
        assert_eq!(assoc.mapped_by, None);
        assert_eq!(assoc.inversed_by, None);
        assert_eq!(doc.entities[0].parent, None);
    }

    #[test]
    fn from_str_any_falls_back_to_yaml_and_toml() {
        let from_yaml = MetadataDocument::from_str_any(YAML).expect("yaml fallback");
        let from_toml = MetadataDocument::from_str_any(TOML).expect("toml fallback");
        assert_eq!(from_yaml, from_toml);
    }

    #[test]
    fn malformed_document_reports_format() {
        let err = MetadataDocument::from_json_str("{ not json").unwrap_err();
        match err {
            GraphError::Metadata { format, .. } => assert_eq!(format, "JSON"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn from_path_uses_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .expect("temp file");
        file.write_all(YAML.as_bytes()).unwrap();

        let doc = MetadataDocument::from_path(file.path()).expect("load from path");
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[1].associations[0].mapped_by.as_deref(), Some("groups"));
    }

    #[test]
    fn reverse_field_follows_ownership() {
        let owning = AssociationDescriptor::owning("b", "B").inversed_by("a");
        let inverse = AssociationDescriptor::inverse("a", "A", Some("b"));

        assert_eq!(owning.reverse_field(), Some("a"));
        assert_eq!(inverse.reverse_field(), Some("b"));
        assert_eq!(AssociationDescriptor::owning("c", "C").reverse_field(), None);
    }
}
