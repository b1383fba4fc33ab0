//! Turn ORM entity metadata into yUML class diagram notation.
//!
//! Entities become boxes (`[App.User|+id;email]`), associations become
//! labeled edges (`[App.User]<>posts *-author 1>[App.Post]`), and the two
//! halves of a bidirectional relationship are merged into one edge.
//!
//! ```rust
//! use ormgraph::{AssociationDescriptor, EntityDescriptor, GraphOptions, MetadataGrapher};
//!
//! let entities = vec![
//!     EntityDescriptor::new("A")
//!         .with_association(AssociationDescriptor::owning("b", "B").inversed_by("a")),
//!     EntityDescriptor::new("B")
//!         .with_association(AssociationDescriptor::inverse("a", "A", Some("b"))),
//! ];
//!
//! let mut grapher = MetadataGrapher::new(entities, GraphOptions::default()).unwrap();
//! assert_eq!(grapher.render().unwrap(), "[A],[A]<>a 1-b 1>[B],[B]");
//! ```

pub mod error;
pub mod metadata;
pub mod options;
pub mod yuml;

pub use error::{GraphError, Result};
pub use metadata::{AssociationDescriptor, EntityDescriptor, MetadataDocument};
pub use options::{GraphOptions, InheritedFields};
pub use yuml::{ClassStore, MetadataGrapher, StringGenerator, VisitedAssociations};
