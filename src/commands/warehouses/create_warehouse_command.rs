use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    commands::Command,
    db::{begin_write, finish, DbPool},
    errors::ServiceError,
    events::{Event, EventSender},
    models::Warehouse,
    repositories::{WarehouseRepository, WarehouseStore},
    services::{
        locations::{LocationDirectory, LocationResolver},
        warehouse_validator::WarehouseValidator,
    },
};

/// Registers a new active warehouse at a location.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWarehouseCommand {
    #[validate(length(min = 1))]
    pub business_unit_code: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0))]
    pub capacity: i32,
    /// Treated as 0 when absent
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
}

impl CreateWarehouseCommand {
    /// Checks every creation rule against `store` and persists the new record.
    /// Nothing is written unless all checks pass.
    pub async fn apply<S, L>(&self, store: &S, locations: &L) -> Result<Warehouse, ServiceError>
    where
        S: WarehouseStore + ?Sized,
        L: LocationResolver + ?Sized,
    {
        self.validate()?;

        let validator = WarehouseValidator::new(store, locations);
        validator
            .require_unique_business_unit_code(&self.business_unit_code)
            .await?;
        let location = validator.require_valid_location(&self.location)?;
        validator
            .require_available_slot(&self.location, &location)
            .await?;
        validator.validate_capacity_and_stock(self.capacity, self.stock, &location)?;

        let mut warehouse = Warehouse::candidate(
            self.business_unit_code.clone(),
            self.location.clone(),
            self.capacity,
            self.stock.unwrap_or(0),
        );
        warehouse.created_at = Some(Utc::now());
        store.create(&warehouse).await?;

        Ok(warehouse)
    }

    /// Runs [`Self::apply`] in one write transaction and publishes
    /// [`Event::WarehouseCreated`] once it has committed.
    #[instrument(skip(self, db, locations, event_sender), fields(business_unit_code = %self.business_unit_code))]
    pub async fn run(
        &self,
        db: &DbPool,
        locations: &dyn LocationResolver,
        event_sender: &EventSender,
    ) -> Result<Warehouse, ServiceError> {
        let txn = begin_write(db).await?;
        let result = self.apply(&WarehouseRepository::new(&txn), locations).await;
        let warehouse = finish(txn, result).await?;

        info!(
            business_unit_code = %warehouse.business_unit_code,
            location = %warehouse.location,
            "Warehouse created"
        );
        event_sender
            .publish(Event::WarehouseCreated {
                business_unit_code: warehouse.business_unit_code.clone(),
                location: warehouse.location.clone(),
            })
            .await;

        Ok(warehouse)
    }
}

#[async_trait]
impl Command for CreateWarehouseCommand {
    type Result = Warehouse;

    /// Resolves locations against [`LocationDirectory::builtin`]; use [`Self::run`]
    /// to validate against another directory.
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.run(&db_pool, &LocationDirectory::builtin(), &event_sender)
            .await
    }
}
