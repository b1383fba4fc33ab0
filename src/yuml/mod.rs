mod generator;
mod grapher;
mod notation;
mod registry;
mod visited;

pub use generator::{StringGenerator, reverse_notation};
pub use grapher::MetadataGrapher;
pub use notation::{
    Arrow, AssociationEdge, Cardinality, EdgeLabel, Ownership, TargetKind, bidirectional_arrows,
    box_name, unidirectional_arrows,
};
pub use registry::ClassStore;
pub use visited::VisitedAssociations;
