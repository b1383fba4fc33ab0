//! Error types for the grapher.

/// Errors raised while registering metadata or generating notation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// A query referenced an entity that is not registered.
    #[error("Unknown entity: {name}")]
    UnknownEntity {
        /// Entity name as queried
        name: String,
    },

    /// The entity exists but declares no association with that name.
    #[error("Unknown association: {entity}::{field}")]
    UnknownAssociation {
        /// Entity queried
        entity: String,
        /// Association name queried
        field: String,
    },

    /// Two descriptors share the same entity name.
    #[error("Duplicate entity: {name}")]
    DuplicateEntity {
        /// Repeated entity name
        name: String,
    },

    /// A descriptor breaks one of its own invariants.
    #[error("Invalid descriptor for {entity}: {message}")]
    InvalidDescriptor {
        /// Entity carrying the broken descriptor
        entity: String,
        /// What is wrong with it
        message: String,
    },

    /// A string could not be read back as an association edge.
    #[error("Invalid edge notation '{notation}': {message}")]
    InvalidNotation {
        /// Offending notation
        notation: String,
        /// Which part failed
        message: &'static str,
    },

    /// A metadata document could not be parsed.
    #[error("Failed to parse {format} metadata: {message}")]
    Metadata {
        /// Document format that was attempted
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// Grapher options could not be parsed.
    #[error("Failed to parse options: {message}")]
    Options {
        /// Parser message
        message: String,
    },

    /// I/O error while reading a document or options file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub(crate) fn unknown_entity(name: &str) -> Self {
        Self::UnknownEntity {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid(entity: &str, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            entity: entity.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
