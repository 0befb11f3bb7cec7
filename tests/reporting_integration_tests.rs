//! Integration tests for the location reporting pipeline.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use whereabouts::db::repositories::LocalStore;
use whereabouts::db::{RepositoryError, StoreConfig};
use whereabouts::services::{GridService, LocationService, RouteService};

fn services() -> (Arc<LocalStore>, LocationService, RouteService) {
    let store = Arc::new(LocalStore::new());
    let grids = GridService::new(store.clone(), store.clone(), store.clone());
    let reports = LocationService::new(store.clone(), store.clone(), grids);
    let routes = RouteService::new(store.clone());
    (store, reports, routes)
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}

#[tokio::test]
async fn nearby_repeat_reports_merge_into_one_record() {
    let (store, reports, _) = services();
    store.add_user("alice");

    let first = reports
        .report_at("alice", -79.38, 43.65, at(9, 0))
        .await
        .unwrap()
        .unwrap();
    let second = reports
        .report_at("alice", -79.37999, 43.64999, at(10, 0))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.times_reported(), 2);
    assert_eq!(store.location_count(), 1);
}

#[tokio::test]
async fn distant_reports_create_distinct_records() {
    let (store, reports, _) = services();
    store.add_user("alice");

    let first = reports
        .report_at("alice", -79.38, 43.65, at(9, 0))
        .await
        .unwrap()
        .unwrap();
    // ~1 km north of the first point.
    let second = reports
        .report_at("alice", -79.38, 43.66, at(10, 0))
        .await
        .unwrap()
        .unwrap();

    assert_ne!(second.id, first.id);
    assert_eq!(store.location_count(), 2);
}

#[tokio::test]
async fn unknown_user_report_is_a_no_op() {
    let (store, reports, _) = services();

    let result = reports
        .report_at("nobody", -79.38, 43.65, at(9, 0))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(store.location_count(), 0);
    assert_eq!(store.grid_count(), 0);
}

#[tokio::test]
async fn owners_do_not_share_locations() {
    let (store, reports, _) = services();
    store.add_user("alice");
    store.add_user("bob");

    let alice = reports
        .report_at("alice", -79.38, 43.65, at(9, 0))
        .await
        .unwrap()
        .unwrap();
    let bob = reports
        .report_at("bob", -79.38, 43.65, at(9, 5))
        .await
        .unwrap()
        .unwrap();

    assert_ne!(alice.id, bob.id);
    assert_eq!(store.location_count(), 2);
}

#[tokio::test]
async fn reporting_populates_the_frequency_grid() {
    let (store, reports, _) = services();
    store.add_user("alice");

    // 2024-01-01 is a Monday.
    reports
        .report_at("alice", -79.38, 43.65, at(9, 0))
        .await
        .unwrap()
        .unwrap();

    let grids = GridService::new(store.clone(), store.clone(), store.clone());
    let bucket = grids
        .locations_reported_at("alice", 1, 9)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bucket.len(), 1);
}

#[tokio::test]
async fn history_returns_every_record() {
    let (store, reports, _) = services();
    store.add_user("alice");

    reports
        .report_at("alice", -79.38, 43.65, at(9, 0))
        .await
        .unwrap();
    reports
        .report_at("alice", -79.40, 43.70, at(10, 0))
        .await
        .unwrap();

    let history = reports.history("alice").await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn store_failures_propagate() {
    let (store, reports, _) = services();
    store.add_user("alice");
    store.set_healthy(false);

    let result = reports.report_at("alice", -79.38, 43.65, at(9, 0)).await;
    assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));
    assert!(!reports.health_check().await.unwrap_or(false));
}

#[tokio::test]
async fn coordinate_rounding_coarsens_jittered_fixes() {
    let store = Arc::new(LocalStore::new());
    store.add_user("alice");
    let grids = GridService::new(store.clone(), store.clone(), store.clone());
    let config = StoreConfig {
        proximity_m: 10.0,
        round_decimals: Some(4),
    };
    let reports = LocationService::with_config(store.clone(), store.clone(), grids, config);

    // ~13 meters apart raw, but both fixes snap to the same rounded cell.
    reports
        .report_at("alice", -79.380049, 43.650049, at(9, 0))
        .await
        .unwrap()
        .unwrap();
    let merged = reports
        .report_at("alice", -79.379951, 43.649951, at(9, 30))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(merged.times_reported(), 2);
    assert_eq!(store.location_count(), 1);
}

#[tokio::test]
async fn alice_round_trip() {
    let (store, reports, routes) = services();
    store.add_user("alice");

    let t0 = at(9, 0);
    let t1 = at(9, 30);

    let l1 = reports
        .report_at("alice", -79.38, 43.65, t0)
        .await
        .unwrap()
        .unwrap();
    let merged = reports
        .report_at("alice", -79.37999, 43.64999, t1)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(merged.id, l1.id);
    assert_eq!(merged.reported, vec![t0, t1]);
    assert_eq!(store.location_count(), 1);

    let route = routes.build("alice", None, None).await.unwrap();
    assert_eq!(route.len(), 1);
    assert_eq!(route.points[0].location.id, l1.id);
}
