use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::models::Warehouse;

use super::{duplicate_active_code, missing_active_record, WarehouseStore};

/// Process-local [`WarehouseStore`], used by tests and database-less wiring.
#[derive(Debug, Default)]
pub struct InMemoryWarehouseStore {
    records: RwLock<Vec<Warehouse>>,
}

impl InMemoryWarehouseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_warehouses(warehouses: Vec<Warehouse>) -> Self {
        Self {
            records: RwLock::new(warehouses),
        }
    }
}

#[async_trait]
impl WarehouseStore for InMemoryWarehouseStore {
    async fn get_all(&self) -> Result<Vec<Warehouse>, ServiceError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_business_unit_code(
        &self,
        code: &str,
    ) -> Result<Option<Warehouse>, ServiceError> {
        let records = self.records.read().await;
        let mut matching = records.iter().filter(|w| w.business_unit_code == code);
        let found = match matching.clone().find(|w| w.is_active()) {
            Some(active) => Some(active),
            None => matching.max_by_key(|w| w.created_at),
        };
        Ok(found.cloned())
    }

    async fn create(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        let mut records = self.records.write().await;
        if warehouse.is_active()
            && records
                .iter()
                .any(|w| w.is_active() && w.business_unit_code == warehouse.business_unit_code)
        {
            return Err(duplicate_active_code(&warehouse.business_unit_code));
        }
        records.push(warehouse.clone());
        Ok(())
    }

    async fn update(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        let mut records = self.records.write().await;
        let existing = records
            .iter_mut()
            .find(|w| w.is_active() && w.business_unit_code == warehouse.business_unit_code)
            .ok_or_else(|| missing_active_record(&warehouse.business_unit_code))?;

        existing.location = warehouse.location.clone();
        existing.capacity = warehouse.capacity;
        existing.stock = warehouse.stock;
        existing.archived_at = warehouse.archived_at;
        Ok(())
    }

    async fn remove(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        self.records
            .write()
            .await
            .retain(|w| w.business_unit_code != warehouse.business_unit_code);
        Ok(())
    }
}
