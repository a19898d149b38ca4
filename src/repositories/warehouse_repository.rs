use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::entities::warehouse::{
    ActiveModel as WarehouseActiveModel, Column, Entity as WarehouseEntity,
};
use crate::errors::ServiceError;
use crate::models::Warehouse;

use super::{duplicate_active_code, missing_active_record, WarehouseStore};

/// sea-orm adapter for [`WarehouseStore`], bound to a pool or an open transaction.
#[derive(Debug)]
pub struct WarehouseRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> WarehouseRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> WarehouseStore for WarehouseRepository<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn get_all(&self) -> Result<Vec<Warehouse>, ServiceError> {
        let models = WarehouseEntity::find()
            .order_by_asc(Column::CreatedAt)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Warehouse::from).collect())
    }

    async fn find_by_business_unit_code(
        &self,
        code: &str,
    ) -> Result<Option<Warehouse>, ServiceError> {
        let active = WarehouseEntity::find()
            .filter(Column::BusinessUnitCode.eq(code))
            .filter(Column::ArchivedAt.is_null())
            .one(self.conn)
            .await?;
        if let Some(model) = active {
            return Ok(Some(model.into()));
        }

        let latest_archived = WarehouseEntity::find()
            .filter(Column::BusinessUnitCode.eq(code))
            .order_by_desc(Column::CreatedAt)
            .one(self.conn)
            .await?;
        Ok(latest_archived.map(Warehouse::from))
    }

    #[instrument(skip(self, warehouse), fields(business_unit_code = %warehouse.business_unit_code))]
    async fn create(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        let created_at = warehouse.created_at.ok_or_else(|| {
            ServiceError::InternalError(format!(
                "Warehouse '{}' has no creation timestamp",
                warehouse.business_unit_code
            ))
        })?;

        let model = WarehouseActiveModel {
            id: Set(Uuid::new_v4()),
            business_unit_code: Set(warehouse.business_unit_code.clone()),
            location: Set(warehouse.location.clone()),
            capacity: Set(warehouse.capacity),
            stock: Set(warehouse.stock),
            created_at: Set(created_at),
            archived_at: Set(warehouse.archived_at),
        };

        match model.insert(self.conn).await {
            Ok(saved) => {
                debug!(id = %saved.id, "Warehouse record inserted");
                Ok(())
            }
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(duplicate_active_code(&warehouse.business_unit_code))
                }
                _ => Err(ServiceError::from(err)),
            },
        }
    }

    #[instrument(skip(self, warehouse), fields(business_unit_code = %warehouse.business_unit_code))]
    async fn update(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        let existing = WarehouseEntity::find()
            .filter(Column::BusinessUnitCode.eq(warehouse.business_unit_code.as_str()))
            .filter(Column::ArchivedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or_else(|| missing_active_record(&warehouse.business_unit_code))?;

        let mut active_model = existing.into_active_model();
        active_model.location = Set(warehouse.location.clone());
        active_model.capacity = Set(warehouse.capacity);
        active_model.stock = Set(warehouse.stock);
        active_model.archived_at = Set(warehouse.archived_at);
        active_model.update(self.conn).await?;
        Ok(())
    }

    #[instrument(skip(self, warehouse), fields(business_unit_code = %warehouse.business_unit_code))]
    async fn remove(&self, warehouse: &Warehouse) -> Result<(), ServiceError> {
        let result = WarehouseEntity::delete_many()
            .filter(Column::BusinessUnitCode.eq(warehouse.business_unit_code.as_str()))
            .exec(self.conn)
            .await?;
        debug!(rows_affected = result.rows_affected, "Warehouse records removed");
        Ok(())
    }
}
