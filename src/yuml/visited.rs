use std::collections::HashSet;

/// Associations already drawn during one generation run.
#[derive(Debug, Clone, Default)]
pub struct VisitedAssociations {
    visited: HashSet<(String, String)>,
}

impl VisitedAssociations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_visited(&mut self, entity: &str, field: &str) {
        self.visit(entity, field);
    }

    /// Mark the pair, returning `true` if it had not been seen yet.
    pub fn visit(&mut self, entity: &str, field: &str) -> bool {
        self.visited.insert((entity.to_string(), field.to_string()))
    }

    pub fn is_visited(&self, entity: &str, field: &str) -> bool {
        self.visited
            .contains(&(entity.to_string(), field.to_string()))
    }

    pub fn clear(&mut self) {
        self.visited.clear();
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
