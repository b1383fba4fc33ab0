use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;
use crate::metadata::AssociationDescriptor;

/// Replace namespace separators so the renderer sees a single dotted name.
pub fn box_name(name: &str) -> String {
    name.replace("::", ".").replace(['\\', '/'], ".")
}

/// Cardinality token on one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl Cardinality {
    pub fn of(association: &AssociationDescriptor) -> Self {
        if association.collection_valued {
            Cardinality::Many
        } else {
            Cardinality::One
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::Many => "*",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Cardinality::One),
            "*" => Some(Cardinality::Many),
            _ => None,
        }
    }
}

/// Arrow drawn where an edge meets a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    None,
    /// `<>`
    Diamond,
    /// `<`
    Left,
    /// `>`
    Right,
}

impl Arrow {
    pub fn as_str(self) -> &'static str {
        match self {
            Arrow::None => "",
            Arrow::Diamond => "<>",
            Arrow::Left => "<",
            Arrow::Right => ">",
        }
    }

    /// Same arrow seen from the other end of the edge.
    pub fn mirrored(self) -> Self {
        match self {
            Arrow::Left => Arrow::Right,
            Arrow::Right => Arrow::Left,
            other => other,
        }
    }
}

/// Which half of a relationship an association declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owning,
    Inverse,
    /// Both flags set, or neither.
    Ambiguous,
}

impl Ownership {
    pub fn of(association: &AssociationDescriptor) -> Self {
        match (association.owning_side, association.inverse_side) {
            (true, false) => Ownership::Owning,
            (false, true) => Ownership::Inverse,
            _ => Ownership::Ambiguous,
        }
    }
}

/// Whether the association target is one of the registered entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Known,
    Unknown,
}

/// Arrows for an association drawn from one side only.
///
/// | ownership | target  | notation      |
/// |-----------|---------|---------------|
/// | owning    | known   | `-f 1>`       |
/// | owning    | unknown | `<>-f 1>`     |
/// | inverse   | unknown | `<-f 1<>`     |
/// | otherwise |         | `<>-f 1>`     |
pub fn unidirectional_arrows(ownership: Ownership, target: TargetKind) -> (Arrow, Arrow) {
    match (ownership, target) {
        (Ownership::Owning, TargetKind::Known) => (Arrow::None, Arrow::Right),
        (Ownership::Owning, TargetKind::Unknown) => (Arrow::Diamond, Arrow::Right),
        (Ownership::Inverse, TargetKind::Unknown) => (Arrow::Left, Arrow::Diamond),
        (Ownership::Inverse, TargetKind::Known) | (Ownership::Ambiguous, _) => {
            (Arrow::Diamond, Arrow::Right)
        }
    }
}

/// Arrows for a merged bidirectional edge, from the side being drawn.
pub fn bidirectional_arrows(ownership: Ownership) -> (Arrow, Arrow) {
    match ownership {
        Ownership::Inverse => (Arrow::Left, Arrow::Diamond),
        Ownership::Owning | Ownership::Ambiguous => (Arrow::Diamond, Arrow::Right),
    }
}

/// `field card` label next to one end of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub field: String,
    pub cardinality: Cardinality,
}

impl EdgeLabel {
    pub fn new(field: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            field: field.into(),
            cardinality,
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.cardinality.as_str())
    }
}

/// One association edge: `[source]{arrow}{label}-{label}{arrow}[target]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEdge {
    pub source: String,
    pub source_arrow: Arrow,
    pub source_label: Option<EdgeLabel>,
    pub target_label: Option<EdgeLabel>,
    pub target_arrow: Arrow,
    pub target: String,
}

impl AssociationEdge {
    /// The same edge read right to left.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            source_arrow: self.target_arrow.mirrored(),
            source_label: self.target_label.clone(),
            target_label: self.source_label.clone(),
            target_arrow: self.source_arrow.mirrored(),
            target: self.source.clone(),
        }
    }

    /// Field names carried by the edge, source side first.
    pub fn field_names(&self) -> Vec<&str> {
        self.source_label
            .iter()
            .chain(self.target_label.iter())
            .map(|l| l.field.as_str())
            .collect()
    }
}

impl fmt::Display for AssociationEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.source, self.source_arrow.as_str())?;
        if let Some(label) = &self.source_label {
            write!(f, "{}", label)?;
        }
        f.write_str("-")?;
        if let Some(label) = &self.target_label {
            write!(f, "{}", label)?;
        }
        write!(f, "{}[{}]", self.target_arrow.as_str(), self.target)
    }
}

impl FromStr for AssociationEdge {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message| GraphError::InvalidNotation {
            notation: s.to_string(),
            message,
        };

        let rest = s.strip_prefix('[').ok_or_else(|| invalid("missing source box"))?;
        let close = rest.find(']').ok_or_else(|| invalid("unterminated source box"))?;
        let source = &rest[..close];
        let rest = &rest[close + 1..];

        let rest = rest.strip_suffix(']').ok_or_else(|| invalid("missing target box"))?;
        let open = rest.rfind('[').ok_or_else(|| invalid("unterminated target box"))?;
        let target = &rest[open + 1..];
        let middle = &rest[..open];

        let (source_arrow, middle) = split_leading_arrow(middle);
        let (target_arrow, middle) = split_trailing_arrow(middle);
        let (left, right) = middle
            .split_once('-')
            .ok_or_else(|| invalid("missing edge body"))?;

        Ok(Self {
            source: source.to_string(),
            source_arrow,
            source_label: parse_label(left).map_err(|_| invalid("bad source label"))?,
            target_label: parse_label(right).map_err(|_| invalid("bad target label"))?,
            target_arrow,
            target: target.to_string(),
        })
    }
}

fn split_leading_arrow(s: &str) -> (Arrow, &str) {
    if let Some(rest) = s.strip_prefix("<>") {
        (Arrow::Diamond, rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (Arrow::Left, rest)
    } else if let Some(rest) = s.strip_prefix('>') {
        (Arrow::Right, rest)
    } else {
        (Arrow::None, s)
    }
}

fn split_trailing_arrow(s: &str) -> (Arrow, &str) {
    if let Some(rest) = s.strip_suffix("<>") {
        (Arrow::Diamond, rest)
    } else if let Some(rest) = s.strip_suffix('>') {
        (Arrow::Right, rest)
    } else if let Some(rest) = s.strip_suffix('<') {
        (Arrow::Left, rest)
    } else {
        (Arrow::None, s)
    }
}

fn parse_label(s: &str) -> Result<Option<EdgeLabel>, ()> {
    if s.is_empty() {
        return Ok(None);
    }
    let (field, card) = s.rsplit_once(' ').ok_or(())?;
    let cardinality = Cardinality::parse(card).ok_or(())?;
    Ok(Some(EdgeLabel::new(field, cardinality)))
}
