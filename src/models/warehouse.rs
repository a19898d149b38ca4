use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// One physical storage unit.
///
/// A business unit code may span several records over time: at most one of them is
/// active (`archived_at == None`), the others are archived predecessors left behind by
/// replacements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "business_unit_code": "MWH.001",
    "location": "ZWOLLE-001",
    "capacity": 40,
    "stock": 10,
    "created_at": "2024-12-09T10:30:00Z",
    "archived_at": null
}))]
pub struct Warehouse {
    /// Stable identifier of the warehouse lineage
    pub business_unit_code: String,
    /// Identifier of the hosting location
    pub location: String,
    /// Maximum stock units the warehouse can hold
    pub capacity: i32,
    /// Current stock units
    pub stock: i32,
    /// Set once, when the record is created
    pub created_at: Option<DateTime<Utc>>,
    /// Set once, when the record is archived
    pub archived_at: Option<DateTime<Utc>>,
}

impl Warehouse {
    /// Builds an unsaved candidate with neither timestamp set.
    pub fn candidate(
        business_unit_code: impl Into<String>,
        location: impl Into<String>,
        capacity: i32,
        stock: i32,
    ) -> Self {
        Self {
            business_unit_code: business_unit_code.into(),
            location: location.into(),
            capacity,
            stock,
            created_at: None,
            archived_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}
