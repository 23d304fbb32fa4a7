use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryColor, CategoryId, CategoryName};

/// Category used to group trainings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub color: CategoryColor,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub color: CategoryColor,
}

impl NewCategory {
    /// Materializes the record once the store has assigned an id.
    pub fn with_id(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            color: self.color,
        }
    }
}
