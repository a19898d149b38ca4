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

/// Retires the active warehouse carrying a business unit code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ArchiveWarehouseCommand {
    #[validate(length(min = 1))]
    pub business_unit_code: String,
}

impl ArchiveWarehouseCommand {
    pub async fn apply<S, L>(&self, store: &S, locations: &L) -> Result<Warehouse, ServiceError>
    where
        S: WarehouseStore + ?Sized,
        L: LocationResolver + ?Sized,
    {
        self.validate()?;

        let existing = WarehouseValidator::new(store, locations)
            .require_active_warehouse(&self.business_unit_code)
            .await?;
        archive_record(store, existing).await
    }

    #[instrument(skip(self, db, locations, event_sender), fields(business_unit_code = %self.business_unit_code))]
    pub async fn run(
        &self,
        db: &DbPool,
        locations: &dyn LocationResolver,
        event_sender: &EventSender,
    ) -> Result<Warehouse, ServiceError> {
        let txn = begin_write(db).await?;
        let result = self.apply(&WarehouseRepository::new(&txn), locations).await;
        let archived = finish(txn, result).await?;

        info!(business_unit_code = %archived.business_unit_code, "Warehouse archived");
        event_sender
            .publish(Event::WarehouseArchived {
                business_unit_code: archived.business_unit_code.clone(),
            })
            .await;

        Ok(archived)
    }
}

/// Stamps `archived_at` on a record already known to be active and persists it.
pub(crate) async fn archive_record<S>(
    store: &S,
    mut existing: Warehouse,
) -> Result<Warehouse, ServiceError>
where
    S: WarehouseStore + ?Sized,
{
    existing.archived_at = Some(Utc::now());
    store.update(&existing).await?;
    Ok(existing)
}

#[async_trait]
impl Command for ArchiveWarehouseCommand {
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
