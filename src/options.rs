use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

const SEPARATOR: &str = ",";

/// Which ancestors hide their fields from a subclass box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritedFields {
    /// Only the immediate registered parent.
    #[default]
    Parent,
    /// Every registered ancestor up the chain.
    Ancestors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphOptions {
    /// Joins tokens in the rendered diagram.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Emit `[Parent]^[Child]` edges.
    #[serde(default = "default_true")]
    pub inheritance: bool,
    /// Which ancestors' fields are left off a subclass box.
    #[serde(default)]
    pub inherited_fields: InheritedFields,
    /// Leave associations the parent already declares to the parent's edges.
    #[serde(default = "default_true")]
    pub skip_inherited_associations: bool,
}

fn default_separator() -> String {
    SEPARATOR.to_string()
}
fn default_true() -> bool {
    true
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            inheritance: true,
            inherited_fields: InheritedFields::Parent,
            skip_inherited_associations: true,
        }
    }
}

impl GraphOptions {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GraphError::Options {
            message: format!("TOML: {}", e),
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| GraphError::Options {
            message: format!("YAML: {}", e),
        })
    }

    /// Read an options file, trying TOML first and then YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        if let Ok(options) = Self::from_toml(&content) {
            Ok(options)
        } else {
            Self::from_yaml(&content)
        }
    }
}
