use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use crate::{
    commands::warehouses::{
        ArchiveWarehouseCommand, CreateWarehouseCommand, ReplaceWarehouseCommand,
    },
    db::DbPool,
    errors::{ErrorKind, ServiceError},
    events::EventSender,
    models::Warehouse,
    repositories::{WarehouseRepository, WarehouseStore},
    services::{
        audit::{audited, AuditAction, AuditSink, SYSTEM_ACTOR},
        locations::LocationResolver,
    },
    tracing::timed_operation,
};

/// Entry point for warehouse reads and lifecycle operations.
///
/// Each lifecycle call runs in its own transaction, is timed and logged, and is
/// recorded on the audit sink when one is configured.
#[derive(Clone)]
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    locations: Arc<dyn LocationResolver>,
    audit_sink: Option<Arc<dyn AuditSink>>,
}

fn is_business_error(err: &ServiceError) -> bool {
    err.kind() != ErrorKind::Internal
}

fn tags(business_unit_code: &str) -> BTreeMap<&'static str, String> {
    BTreeMap::from([("business_unit_code", business_unit_code.to_string())])
}

impl WarehouseService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        locations: Arc<dyn LocationResolver>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            locations,
            audit_sink: None,
        }
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// All records, archived ones included.
    #[instrument(skip(self))]
    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, ServiceError> {
        WarehouseRepository::new(self.db_pool.as_ref())
            .get_all()
            .await
    }

    /// The active record for `business_unit_code`, or its latest archived one.
    #[instrument(skip(self))]
    pub async fn get_warehouse(&self, business_unit_code: &str) -> Result<Warehouse, ServiceError> {
        WarehouseRepository::new(self.db_pool.as_ref())
            .find_by_business_unit_code(business_unit_code)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Warehouse with business unit code '{}' does not exist.",
                    business_unit_code
                ))
            })
    }

    #[instrument(skip(self, command), fields(business_unit_code = %command.business_unit_code))]
    pub async fn create_warehouse(
        &self,
        command: CreateWarehouseCommand,
    ) -> Result<Warehouse, ServiceError> {
        let code = command.business_unit_code.as_str();
        self.audited(
            code,
            AuditAction::Created,
            timed_operation("warehouse.create", tags(code), is_business_error, || {
                command.run(&self.db_pool, self.locations.as_ref(), &self.event_sender)
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn archive_warehouse(
        &self,
        business_unit_code: &str,
    ) -> Result<Warehouse, ServiceError> {
        let command = ArchiveWarehouseCommand {
            business_unit_code: business_unit_code.to_string(),
        };
        self.audited(
            business_unit_code,
            AuditAction::Archived,
            timed_operation(
                "warehouse.archive",
                tags(business_unit_code),
                is_business_error,
                || command.run(&self.db_pool, self.locations.as_ref(), &self.event_sender),
            ),
        )
        .await
    }

    #[instrument(skip(self, command), fields(business_unit_code = %command.business_unit_code))]
    pub async fn replace_warehouse(
        &self,
        command: ReplaceWarehouseCommand,
    ) -> Result<Warehouse, ServiceError> {
        let code = command.business_unit_code.as_str();
        self.audited(
            code,
            AuditAction::Replaced,
            timed_operation("warehouse.replace", tags(code), is_business_error, || {
                command.run(&self.db_pool, self.locations.as_ref(), &self.event_sender)
            }),
        )
        .await
    }

    async fn audited<T>(
        &self,
        resource_name: &str,
        action: AuditAction,
        operation: impl std::future::Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, ServiceError> {
        audited(
            self.audit_sink.as_deref(),
            resource_name,
            action,
            SYSTEM_ACTOR,
            operation,
        )
        .await
    }
}
