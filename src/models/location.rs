use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A physical site that hosts warehouses. Owned outside this service and never mutated here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// Unique location key
    #[schema(example = "ZWOLLE-001")]
    pub identification: String,
    /// Cap on concurrently active warehouses at this location
    #[schema(example = 1)]
    pub max_number_of_warehouses: usize,
    /// Cap on any single warehouse's capacity at this location
    #[schema(example = 40)]
    pub max_capacity: i32,
}

impl Location {
    pub fn new(
        identification: impl Into<String>,
        max_number_of_warehouses: usize,
        max_capacity: i32,
    ) -> Self {
        Self {
            identification: identification.into(),
            max_number_of_warehouses,
            max_capacity,
        }
    }
}
