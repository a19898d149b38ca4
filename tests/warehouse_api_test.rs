//! End-to-end warehouse lifecycle over HTTP.
//!
//! Covers creation, archival and replacement against the built-in locations,
//! the status codes each failure maps to, and the audit trail left behind.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use fulfilment_api::events::Event;
use serde_json::{json, Value};

async fn create(app: &TestApp, code: &str, location: &str, capacity: i32, stock: i32) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({
                "business_unit_code": code,
                "location": location,
                "capacity": capacity,
                "stock": stock,
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED, "creating {}", code);
    response_json(response).await
}

// ==================== Create ====================

#[tokio::test]
async fn create_returns_the_new_active_warehouse() {
    let app = TestApp::new().await;

    let body = create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["business_unit_code"], "MWH.001");
    assert_eq!(body["data"]["location"], "ZWOLLE-001");
    assert_eq!(body["data"]["capacity"], 40);
    assert_eq!(body["data"]["stock"], 10);
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"]["archived_at"].is_null());
}

#[tokio::test]
async fn create_without_stock_defaults_to_zero() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({
                "business_unit_code": "MWH.002",
                "location": "AMSTERDAM-001",
                "capacity": 50,
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["stock"], 0);
}

#[tokio::test]
async fn duplicate_active_code_is_conflict() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "AMSTERDAM-001", 40, 10).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({
                "business_unit_code": "MWH.001",
                "location": "AMSTERDAM-002",
                "capacity": 30,
                "stock": 0,
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Conflict");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Warehouse with business unit code 'MWH.001' already exists."));
}

#[tokio::test]
async fn unknown_location_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({
                "business_unit_code": "MWH.001",
                "location": "Z",
                "capacity": 10,
                "stock": 0,
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Location 'Z' is not a valid location."));
}

#[tokio::test]
async fn full_location_is_conflict() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 20, 0).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({
                "business_unit_code": "MWH.002",
                "location": "ZWOLLE-001",
                "capacity": 10,
                "stock": 0,
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn stock_above_capacity_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({
                "business_unit_code": "MWH.001",
                "location": "AMSTERDAM-001",
                "capacity": 50,
                "stock": 100,
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Warehouse capacity (50) cannot handle the stock (100)."));
}

#[tokio::test]
async fn error_body_echoes_the_request_id() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/warehouses/NOPE",
            None,
            &[("x-request-id", "req-lifecycle-1")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-lifecycle-1"
    );
    let body = response_json(response).await;
    assert_eq!(body["request_id"], "req-lifecycle-1");
}

#[tokio::test]
async fn incomplete_create_body_is_a_bad_request_with_error_body() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            Method::POST,
            "/api/v1/warehouses",
            Some(json!({ "business_unit_code": "X", "location": "ZWOLLE-001" })),
            &[("x-request-id", "req-missing-field")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("capacity"));
    assert_eq!(body["request_id"], "req-missing-field");
    assert!(body["timestamp"].is_string());

    let listed = response_json(app.request(Method::GET, "/api/v1/warehouses", None).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn mistyped_replacement_body_is_a_bad_request() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses/MWH.001/replacement",
            Some(json!({ "location": "ZWOLLE-001", "capacity": "forty", "stock": 10 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn create_without_json_content_type_is_a_bad_request() {
    let app = TestApp::new().await;

    let response = app.request(Method::POST, "/api/v1/warehouses", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

// ==================== Archive ====================

#[tokio::test]
async fn archive_then_get_returns_the_archived_record() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    let response = app
        .request(Method::DELETE, "/api/v1/warehouses/MWH.001", None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::GET, "/api/v1/warehouses/MWH.001", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["data"]["archived_at"].is_string());
}

#[tokio::test]
async fn archiving_twice_is_conflict() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;
    app.request(Method::DELETE, "/api/v1/warehouses/MWH.001", None)
        .await;

    let response = app
        .request(Method::DELETE, "/api/v1/warehouses/MWH.001", None)
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("is already archived."));
}

#[tokio::test]
async fn archiving_unknown_code_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::DELETE, "/api/v1/warehouses/MWH.404", None)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn archiving_frees_the_slot_and_the_code() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;
    app.request(Method::DELETE, "/api/v1/warehouses/MWH.001", None)
        .await;

    create(&app, "MWH.001", "ZWOLLE-001", 30, 5).await;

    let response = app.request(Method::GET, "/api/v1/warehouses", None).await;
    let body = response_json(response).await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records
            .iter()
            .filter(|w| w["archived_at"].is_null())
            .count(),
        1
    );
}

// ==================== Replace ====================

#[tokio::test]
async fn replace_archives_predecessor_and_returns_successor() {
    let mut app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses/MWH.001/replacement",
            Some(json!({ "location": "AMSTERDAM-001", "capacity": 80, "stock": 10 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["location"], "AMSTERDAM-001");
    assert_eq!(body["data"]["capacity"], 80);
    assert!(body["data"]["archived_at"].is_null());

    let response = app.request(Method::GET, "/api/v1/warehouses", None).await;
    let body = response_json(response).await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    let archived: Vec<_> = records
        .iter()
        .filter(|w| w["archived_at"].is_string())
        .collect();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0]["location"], "ZWOLLE-001");

    let events = app.drain_events();
    assert_eq!(
        events.last(),
        Some(&Event::WarehouseReplaced {
            business_unit_code: "MWH.001".into(),
            previous_location: "ZWOLLE-001".into(),
            location: "AMSTERDAM-001".into(),
        })
    );
}

#[tokio::test]
async fn replace_with_mismatched_stock_is_bad_request() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses/MWH.001/replacement",
            Some(json!({ "location": "AMSTERDAM-001", "capacity": 80, "stock": 11 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains(
        "New warehouse stock (11) must match the existing warehouse's stock (10)."
    ));
}

#[tokio::test]
async fn replace_with_too_little_capacity_is_bad_request() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 30).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses/MWH.001/replacement",
            Some(json!({ "location": "AMSTERDAM-001", "capacity": 20, "stock": 30 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains(
        "New warehouse capacity (20) cannot accommodate the existing warehouse's stock (30)."
    ));
}

#[tokio::test]
async fn replace_of_archived_warehouse_is_conflict() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 0).await;
    app.request(Method::DELETE, "/api/v1/warehouses/MWH.001", None)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses/MWH.001/replacement",
            Some(json!({ "location": "AMSTERDAM-001", "capacity": 40, "stock": 0 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_replace_leaves_predecessor_active() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/warehouses/MWH.001/replacement",
            Some(json!({ "location": "Z", "capacity": 40, "stock": 10 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/v1/warehouses/MWH.001", None)
        .await;
    let body = response_json(response).await;
    assert!(body["data"]["archived_at"].is_null());
    assert_eq!(body["data"]["location"], "ZWOLLE-001");
}

// ==================== Locations and probes ====================

#[tokio::test]
async fn locations_are_listed_and_resolved() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/locations", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["data"].as_array().unwrap().len() >= 8);

    let response = app
        .request(Method::GET, "/api/v1/locations/ZWOLLE-002", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["max_number_of_warehouses"], 2);
    assert_eq!(body["data"]["max_capacity"], 50);

    let response = app
        .request(Method::GET, "/api/v1/locations/NOWHERE-001", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["database"], "healthy");
}

#[tokio::test]
async fn status_reports_service_metadata() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/status", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["service"], "fulfilment-api");
    assert_eq!(body["data"]["environment"], "test");
}

// ==================== Audit trail ====================

#[tokio::test]
async fn every_lifecycle_call_is_audited() {
    let app = TestApp::new().await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;
    app.request(
        Method::POST,
        "/api/v1/warehouses",
        Some(json!({
            "business_unit_code": "MWH.001",
            "location": "ZWOLLE-002",
            "capacity": 10,
            "stock": 0,
        })),
    )
    .await;
    app.request(Method::DELETE, "/api/v1/warehouses/MWH.001", None)
        .await;

    let rows = app.audit_rows().await;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.resource_name == "MWH.001"));
    assert!(rows.iter().all(|r| r.performed_by == "system"));

    let mut entries: Vec<(String, String)> = rows
        .into_iter()
        .map(|r| (r.action, r.outcome))
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            ("ARCHIVED".to_string(), "SUCCEEDED".to_string()),
            ("CREATED".to_string(), "FAILED:CONFLICT".to_string()),
            ("CREATED".to_string(), "SUCCEEDED".to_string()),
        ]
    );
}

#[tokio::test]
async fn audit_can_be_disabled() {
    let app = TestApp::with_audit(false).await;
    create(&app, "MWH.001", "ZWOLLE-001", 40, 10).await;

    assert!(app.audit_rows().await.is_empty());
}
