//! Business rules guarding every warehouse mutation.
//!
//! Each check covers exactly one rule so the lifecycle commands compose only what
//! they need.

use crate::errors::ServiceError;
use crate::models::{Location, Warehouse};
use crate::repositories::WarehouseStore;
use crate::services::locations::LocationResolver;

pub struct WarehouseValidator<'a, S: ?Sized, L: ?Sized> {
    store: &'a S,
    locations: &'a L,
}

impl<'a, S, L> WarehouseValidator<'a, S, L>
where
    S: WarehouseStore + ?Sized,
    L: LocationResolver + ?Sized,
{
    pub fn new(store: &'a S, locations: &'a L) -> Self {
        Self { store, locations }
    }

    /// Fails with `Conflict` when an active warehouse already uses `code`.
    pub async fn require_unique_business_unit_code(&self, code: &str) -> Result<(), ServiceError> {
        match self.store.find_by_business_unit_code(code).await? {
            Some(existing) if existing.is_active() => Err(ServiceError::Conflict(format!(
                "Warehouse with business unit code '{}' already exists.",
                code
            ))),
            _ => Ok(()),
        }
    }

    /// Returns the active warehouse for `code`.
    ///
    /// `NotFound` when no record exists at all, `Conflict` when the latest record is archived.
    pub async fn require_active_warehouse(&self, code: &str) -> Result<Warehouse, ServiceError> {
        let existing = self
            .store
            .find_by_business_unit_code(code)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Warehouse with business unit code '{}' does not exist.",
                    code
                ))
            })?;

        if existing.is_archived() {
            return Err(ServiceError::Conflict(format!(
                "Warehouse with business unit code '{}' is already archived.",
                code
            )));
        }
        Ok(existing)
    }

    pub fn require_valid_location(&self, identifier: &str) -> Result<Location, ServiceError> {
        self.locations
            .resolve_by_identifier(identifier)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Location '{}' is not a valid location.",
                    identifier
                ))
            })
    }

    /// Archived warehouses do not occupy a slot.
    pub async fn require_available_slot(
        &self,
        identifier: &str,
        location: &Location,
    ) -> Result<(), ServiceError> {
        let active_count = self
            .store
            .get_all()
            .await?
            .iter()
            .filter(|w| w.location == identifier && w.is_active())
            .count();

        if active_count >= location.max_number_of_warehouses {
            return Err(ServiceError::Conflict(format!(
                "Maximum number of warehouses ({}) already reached for location '{}'.",
                location.max_number_of_warehouses, identifier
            )));
        }
        Ok(())
    }

    pub fn validate_capacity_and_stock(
        &self,
        capacity: i32,
        stock: Option<i32>,
        location: &Location,
    ) -> Result<(), ServiceError> {
        if capacity > location.max_capacity {
            return Err(ServiceError::ValidationError(format!(
                "Warehouse capacity ({}) exceeds maximum capacity ({}) for location '{}'.",
                capacity, location.max_capacity, location.identification
            )));
        }

        if let Some(stock) = stock {
            if capacity < stock {
                return Err(ServiceError::ValidationError(format!(
                    "Warehouse capacity ({}) cannot handle the stock ({}).",
                    capacity, stock
                )));
            }
        }
        Ok(())
    }

    pub fn validate_capacity_accommodation(
        &self,
        new_capacity: i32,
        existing_stock: i32,
    ) -> Result<(), ServiceError> {
        if new_capacity < existing_stock {
            return Err(ServiceError::ValidationError(format!(
                "New warehouse capacity ({}) cannot accommodate the existing warehouse's stock ({}).",
                new_capacity, existing_stock
            )));
        }
        Ok(())
    }

    pub fn validate_stock_matching(
        &self,
        new_stock: i32,
        existing_stock: i32,
    ) -> Result<(), ServiceError> {
        if new_stock != existing_stock {
            return Err(ServiceError::ValidationError(format!(
                "New warehouse stock ({}) must match the existing warehouse's stock ({}).",
                new_stock, existing_stock
            )));
        }
        Ok(())
    }
}
