use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::archive_warehouse_command::archive_record;
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

/// Archives the active warehouse for a code and creates its successor under the same code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceWarehouseCommand {
    #[validate(length(min = 1))]
    pub business_unit_code: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0))]
    pub capacity: i32,
    /// Must equal the stock of the warehouse being replaced; treated as 0 when absent
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
}

/// Both records touched by a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseReplacement {
    pub archived: Warehouse,
    pub replacement: Warehouse,
}

impl ReplaceWarehouseCommand {
    /// Replacement rules in order: active predecessor, valid new location,
    /// capacity accommodation, stock matching, then the general capacity checks.
    /// The slot limit is only checked when the warehouse moves to another location;
    /// in place, the predecessor's slot is handed over.
    pub async fn apply<S, L>(
        &self,
        store: &S,
        locations: &L,
    ) -> Result<WarehouseReplacement, ServiceError>
    where
        S: WarehouseStore + ?Sized,
        L: LocationResolver + ?Sized,
    {
        self.validate()?;
        let stock = self.stock.unwrap_or(0);

        let validator = WarehouseValidator::new(store, locations);
        let existing = validator
            .require_active_warehouse(&self.business_unit_code)
            .await?;
        let location = validator.require_valid_location(&self.location)?;
        validator.validate_capacity_accommodation(self.capacity, existing.stock)?;
        validator.validate_stock_matching(stock, existing.stock)?;
        validator.validate_capacity_and_stock(self.capacity, Some(stock), &location)?;
        if existing.location != self.location {
            validator
                .require_available_slot(&self.location, &location)
                .await?;
        }

        let archived = archive_record(store, existing).await?;

        let mut replacement = Warehouse::candidate(
            self.business_unit_code.clone(),
            self.location.clone(),
            self.capacity,
            stock,
        );
        replacement.created_at = Some(Utc::now());
        store.create(&replacement).await?;

        Ok(WarehouseReplacement {
            archived,
            replacement,
        })
    }

    /// Archive and create share one transaction, so a failed create leaves the
    /// predecessor active.
    #[instrument(skip(self, db, locations, event_sender), fields(business_unit_code = %self.business_unit_code))]
    pub async fn run(
        &self,
        db: &DbPool,
        locations: &dyn LocationResolver,
        event_sender: &EventSender,
    ) -> Result<Warehouse, ServiceError> {
        let txn = begin_write(db).await?;
        let result = self.apply(&WarehouseRepository::new(&txn), locations).await;
        let WarehouseReplacement {
            archived,
            replacement,
        } = finish(txn, result).await?;

        info!(
            business_unit_code = %replacement.business_unit_code,
            previous_location = %archived.location,
            location = %replacement.location,
            "Warehouse replaced"
        );
        event_sender
            .publish(Event::WarehouseReplaced {
                business_unit_code: replacement.business_unit_code.clone(),
                previous_location: archived.location,
                location: replacement.location.clone(),
            })
            .await;

        Ok(replacement)
    }
}

#[async_trait]
impl Command for ReplaceWarehouseCommand {
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
