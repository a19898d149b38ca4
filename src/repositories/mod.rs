use async_trait::async_trait;

use crate::{errors::ServiceError, models::Warehouse};

pub mod in_memory;
pub mod warehouse_repository;

pub use in_memory::InMemoryWarehouseStore;
pub use warehouse_repository::WarehouseRepository;

/// Persistence port for warehouse records keyed by business unit code.
///
/// A code may map to several records over time (archived predecessors plus at most one
/// active record). Single-record reads prefer the active one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WarehouseStore: Send + Sync {
    /// Every record, archived ones included, oldest first.
    async fn get_all(&self) -> Result<Vec<Warehouse>, ServiceError>;

    /// The active record for `code`, or else the most recently created archived one.
    async fn find_by_business_unit_code(
        &self,
        code: &str,
    ) -> Result<Option<Warehouse>, ServiceError>;

    async fn create(&self, warehouse: &Warehouse) -> Result<(), ServiceError>;

    /// Rewrites the active record carrying `warehouse.business_unit_code`.
    async fn update(&self, warehouse: &Warehouse) -> Result<(), ServiceError>;

    /// Deletes every record carrying `warehouse.business_unit_code`.
    async fn remove(&self, warehouse: &Warehouse) -> Result<(), ServiceError>;
}

pub(crate) fn duplicate_active_code(code: &str) -> ServiceError {
    ServiceError::Conflict(format!(
        "Warehouse with business unit code '{}' already exists.",
        code
    ))
}

pub(crate) fn missing_active_record(code: &str) -> ServiceError {
    ServiceError::NotFound(format!(
        "No active warehouse with business unit code '{}' to update.",
        code
    ))
}
