//! Persistence semantics of the sea-orm warehouse store and the transactional commands.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::TestApp;
use fulfilment_api::{
    commands::{
        warehouses::{ArchiveWarehouseCommand, CreateWarehouseCommand, ReplaceWarehouseCommand},
        Command,
    },
    errors::ServiceError,
    events::{self, Event},
    models::{Location, Warehouse},
    repositories::{WarehouseRepository, WarehouseStore},
    services::locations::LocationDirectory,
};
use std::sync::Arc;

fn stamped(code: &str, location: &str, age_minutes: i64) -> Warehouse {
    let mut warehouse = Warehouse::candidate(code, location, 40, 10);
    warehouse.created_at = Some(Utc::now() - Duration::minutes(age_minutes));
    warehouse
}

fn archived(code: &str, location: &str, age_minutes: i64) -> Warehouse {
    let mut warehouse = stamped(code, location, age_minutes);
    warehouse.archived_at = warehouse.created_at.map(|t| t + Duration::minutes(1));
    warehouse
}

#[tokio::test]
async fn find_prefers_the_active_record() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&archived("MWH.001", "ZWOLLE-001", 30))
        .await
        .unwrap();
    repo.create(&stamped("MWH.001", "AMSTERDAM-001", 20))
        .await
        .unwrap();
    repo.create(&archived("MWH.001", "TILBURG-001", 10))
        .await
        .unwrap();

    let found = repo.find_by_business_unit_code("MWH.001").await.unwrap();

    assert_matches!(found, Some(w) if w.is_active() && w.location == "AMSTERDAM-001");
}

#[tokio::test]
async fn find_falls_back_to_the_latest_archived_record() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&archived("MWH.001", "ZWOLLE-001", 30))
        .await
        .unwrap();
    repo.create(&archived("MWH.001", "TILBURG-001", 10))
        .await
        .unwrap();

    let found = repo.find_by_business_unit_code("MWH.001").await.unwrap();

    assert_matches!(found, Some(w) if w.location == "TILBURG-001");
    assert!(repo
        .find_by_business_unit_code("MWH.404")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn second_active_record_violates_the_unique_index() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&stamped("MWH.001", "ZWOLLE-001", 5))
        .await
        .unwrap();

    let result = repo.create(&stamped("MWH.001", "AMSTERDAM-001", 1)).await;

    assert_matches!(result, Err(ServiceError::Conflict(message)) if message.contains("MWH.001"));
}

#[tokio::test]
async fn archived_records_may_share_a_code() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&archived("MWH.001", "ZWOLLE-001", 30))
        .await
        .unwrap();
    repo.create(&archived("MWH.001", "ZWOLLE-001", 20))
        .await
        .unwrap();
    repo.create(&stamped("MWH.001", "ZWOLLE-001", 10))
        .await
        .unwrap();

    assert_eq!(repo.get_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn create_requires_a_creation_timestamp() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());

    let result = repo
        .create(&Warehouse::candidate("MWH.001", "ZWOLLE-001", 40, 0))
        .await;

    assert_matches!(result, Err(ServiceError::InternalError(_)));
}

#[tokio::test]
async fn update_only_touches_the_active_record() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&archived("MWH.001", "ZWOLLE-001", 30))
        .await
        .unwrap();
    repo.create(&stamped("MWH.001", "AMSTERDAM-001", 10))
        .await
        .unwrap();

    let mut changed = stamped("MWH.001", "AMSTERDAM-001", 10);
    changed.stock = 25;
    repo.update(&changed).await.unwrap();

    let all = repo.get_all().await.unwrap();
    let old = all.iter().find(|w| w.is_archived()).unwrap();
    let current = all.iter().find(|w| w.is_active()).unwrap();
    assert_eq!(old.stock, 10);
    assert_eq!(current.stock, 25);
}

#[tokio::test]
async fn update_without_active_record_is_not_found() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&archived("MWH.001", "ZWOLLE-001", 30))
        .await
        .unwrap();

    let result = repo.update(&stamped("MWH.001", "ZWOLLE-001", 0)).await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn remove_deletes_every_record_of_a_code() {
    let app = TestApp::new().await;
    let repo = WarehouseRepository::new(app.db());
    repo.create(&archived("MWH.001", "ZWOLLE-001", 30))
        .await
        .unwrap();
    repo.create(&stamped("MWH.001", "ZWOLLE-001", 10))
        .await
        .unwrap();
    repo.create(&stamped("MWH.002", "ZWOLLE-002", 10))
        .await
        .unwrap();

    repo.remove(&stamped("MWH.001", "ZWOLLE-001", 0))
        .await
        .unwrap();

    let remaining = repo.get_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].business_unit_code, "MWH.002");
}

#[tokio::test]
async fn replace_rolls_back_the_archive_when_the_insert_fails() {
    let app = TestApp::new().await;
    let (sender, mut rx) = events::channel(8);
    let locations = LocationDirectory::builtin();

    CreateWarehouseCommand {
        business_unit_code: "MWH.001".into(),
        location: "ZWOLLE-001".into(),
        capacity: 40,
        stock: Some(10),
    }
    .run(app.db(), &locations, &sender)
    .await
    .unwrap();

    app.execute(
        "CREATE TRIGGER reject_eindhoven BEFORE INSERT ON warehouses \
         WHEN NEW.location = 'EINDHOVEN-001' \
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .await;

    let result = ReplaceWarehouseCommand {
        business_unit_code: "MWH.001".into(),
        location: "EINDHOVEN-001".into(),
        capacity: 40,
        stock: Some(10),
    }
    .run(app.db(), &locations, &sender)
    .await;

    assert_matches!(result, Err(ServiceError::DatabaseError(_)));
    let all = WarehouseRepository::new(app.db()).get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_active());
    assert_eq!(all[0].location, "ZWOLLE-001");

    assert_matches!(rx.try_recv(), Ok(Event::WarehouseCreated { .. }));
    assert!(rx.try_recv().is_err(), "no event for a rolled back replace");
}

#[tokio::test]
async fn commands_execute_against_the_builtin_directory() {
    let app = TestApp::new().await;
    let (sender, mut rx) = events::channel(8);
    let sender = Arc::new(sender);

    let created = CreateWarehouseCommand {
        business_unit_code: "MWH.010".into(),
        location: "HELMOND-001".into(),
        capacity: 45,
        stock: None,
    }
    .execute(app.state.db.clone(), sender.clone())
    .await
    .unwrap();
    assert_eq!(created.stock, 0);

    let archived = ArchiveWarehouseCommand {
        business_unit_code: "MWH.010".into(),
    }
    .execute(app.state.db.clone(), sender.clone())
    .await
    .unwrap();
    assert!(archived.is_archived());

    assert_eq!(
        rx.try_recv().unwrap(),
        Event::WarehouseCreated {
            business_unit_code: "MWH.010".into(),
            location: "HELMOND-001".into(),
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        Event::WarehouseArchived {
            business_unit_code: "MWH.010".into(),
        }
    );

    let custom = CreateWarehouseCommand {
        business_unit_code: "MWH.011".into(),
        location: "UTRECHT-001".into(),
        capacity: 10,
        stock: None,
    };
    let directory = LocationDirectory::new(vec![Location::new("UTRECHT-001", 1, 20)]);
    assert_matches!(
        custom.execute(app.state.db.clone(), sender.clone()).await,
        Err(ServiceError::ValidationError(msg)) if msg.contains("UTRECHT-001")
    );
    let created = custom.run(app.db(), &directory, &sender).await.unwrap();
    assert_eq!(created.location, "UTRECHT-001");
}
