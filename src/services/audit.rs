//! Audit trail for warehouse lifecycle calls.
//!
//! Every attempt is recorded, successful or not. Records are written after the
//! business transaction has finished so a rolled back operation is still audited.

use std::{fmt, future::Future, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::{ActiveModelTrait, Set};
use strum::{AsRefStr, Display};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::audit_log,
    errors::{ErrorKind, ServiceError},
};

/// Actor recorded when no caller identity is available.
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Created,
    Archived,
    Replaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Succeeded,
    Failed(ErrorKind),
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Succeeded => write!(f, "SUCCEEDED"),
            AuditOutcome::Failed(kind) => write!(f, "FAILED:{}", kind),
        }
    }
}

impl<T> From<&Result<T, ServiceError>> for AuditOutcome {
    fn from(result: &Result<T, ServiceError>) -> Self {
        match result {
            Ok(_) => AuditOutcome::Succeeded,
            Err(err) => AuditOutcome::Failed(err.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub resource_name: String,
    pub action: AuditAction,
    pub performed_by: String,
    pub outcome: AuditOutcome,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), ServiceError>;
}

/// Persists records to `audit_logs`.
#[derive(Debug, Clone)]
pub struct DbAuditSink {
    db_pool: Arc<DbPool>,
}

impl DbAuditSink {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AuditSink for DbAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), ServiceError> {
        audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            resource_name: Set(record.resource_name.clone()),
            action: Set(record.action.to_string()),
            performed_by: Set(record.performed_by.clone()),
            outcome: Set(record.outcome.to_string()),
            timestamp: Set(record.timestamp),
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(())
    }
}

/// Emits each record as a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), ServiceError> {
        info!(
            target: "audit",
            resource_name = %record.resource_name,
            action = %record.action,
            performed_by = %record.performed_by,
            outcome = %record.outcome,
            timestamp = %record.timestamp.to_rfc3339(),
            "Audit: {} on '{}'",
            record.action,
            record.resource_name
        );
        Ok(())
    }
}

/// Awaits `operation`, counts it and hands an [`AuditRecord`] to `sink`.
///
/// The operation's result is returned untouched; a sink failure is only logged.
pub async fn audited<T, Fut>(
    sink: Option<&dyn AuditSink>,
    resource_name: &str,
    action: AuditAction,
    performed_by: &str,
    operation: Fut,
) -> Result<T, ServiceError>
where
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let result = operation.await;
    let outcome = AuditOutcome::from(&result);

    counter!(
        "fulfilment.warehouse.operations",
        1,
        "action" => action.to_string(),
        "outcome" => outcome.to_string()
    );

    if let Some(sink) = sink {
        let record = AuditRecord {
            resource_name: resource_name.to_string(),
            action,
            performed_by: performed_by.to_string(),
            outcome,
            timestamp: Utc::now(),
        };
        if let Err(err) = sink.record(&record).await {
            warn!(
                error = %err,
                resource_name = %record.resource_name,
                action = %record.action,
                "Failed to write audit record"
            );
        }
    }

    result
}
