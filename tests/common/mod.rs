#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use fulfilment_api::{
    config::AppConfig,
    db::{self, DbPool},
    entities::audit_log,
    events::{self, Event},
    AppState,
};
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, EntityTrait, QueryOrder, Statement};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Application harness backed by a private in-memory SQLite database.
///
/// The pool holds a single connection, so every request sees the same database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    events: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_audit(true).await
    }

    pub async fn with_audit(audit_enabled: bool) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.audit_enabled = audit_enabled;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_sender, events) = events::channel(64);
        let state = AppState::new(Arc::new(pool), cfg, event_sender);
        let router = fulfilment_api::app_router(state.clone());

        Self {
            router,
            state,
            events,
        }
    }

    pub fn db(&self) -> &DbPool {
        self.state.db.as_ref()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Runs a raw SQLite statement against the test database.
    pub async fn execute(&self, sql: &str) {
        self.db()
            .execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await
            .expect("statement executes");
    }

    pub async fn audit_rows(&self) -> Vec<audit_log::Model> {
        audit_log::Entity::find()
            .order_by_asc(audit_log::Column::Timestamp)
            .all(self.db())
            .await
            .expect("audit rows load")
    }

    /// Events published so far, in order.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
