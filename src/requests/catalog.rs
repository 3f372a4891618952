use serde::{Deserialize, Serialize};

/// Immutable reference data owned by the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Read-only category catalog collaborator.
pub trait CategoryCatalog: Send + Sync {
    fn categories(&self) -> Vec<Category>;

    fn find(&self, id: &str) -> Option<Category> {
        self.categories().into_iter().find(|c| c.id == id)
    }
}

/// Fixed in-memory catalog handed to the store at wiring time.
pub struct StaticCatalog {
    entries: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<Category>) -> Self {
        Self { entries }
    }
}

impl CategoryCatalog for StaticCatalog {
    fn categories(&self) -> Vec<Category> {
        self.entries.clone()
    }
}
