//! Integration tests for timed route reconstruction.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use whereabouts::db::repositories::LocalStore;
use whereabouts::services::{GridService, LocationService, RouteService};

fn services() -> (Arc<LocalStore>, LocationService, RouteService) {
    let store = Arc::new(LocalStore::new());
    let grids = GridService::new(store.clone(), store.clone(), store.clone());
    let reports = LocationService::new(store.clone(), store.clone(), grids);
    let routes = RouteService::new(store.clone());
    (store, reports, routes)
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, minute, 0).unwrap()
}

#[tokio::test]
async fn window_is_half_open() {
    let (store, reports, routes) = services();
    store.add_user("alice");

    // Four distinct points, ~1 km apart, reported at t=1..=4.
    for i in 1..=4u32 {
        reports
            .report_at("alice", -79.38 - 0.01 * i as f64, 43.65, at(i))
            .await
            .unwrap()
            .unwrap();
    }

    let route = routes
        .build("alice", Some(at(2)), Some(at(4)))
        .await
        .unwrap();

    let times: Vec<_> = route.points.iter().map(|p| p.at).collect();
    assert_eq!(times, vec![at(2), at(3)]);
}

#[tokio::test]
async fn adjacent_repeats_collapse_but_returns_survive() {
    let (store, reports, routes) = services();
    store.add_user("alice");

    // P, P, Q, P at distinct times: the middle repeat of P collapses,
    // the later return does not.
    let p1 = reports
        .report_at("alice", -79.38, 43.65, at(1))
        .await
        .unwrap()
        .unwrap();
    reports
        .report_at("alice", -79.38, 43.65, at(2))
        .await
        .unwrap()
        .unwrap();
    let q = reports
        .report_at("alice", -79.40, 43.70, at(3))
        .await
        .unwrap()
        .unwrap();
    reports
        .report_at("alice", -79.38, 43.65, at(4))
        .await
        .unwrap()
        .unwrap();

    let route = routes.build("alice", None, None).await.unwrap();

    let ids: Vec<_> = route.points.iter().map(|p| p.location.id).collect();
    assert_eq!(ids, vec![p1.id, q.id, p1.id]);
}

#[tokio::test]
async fn unknown_or_empty_owner_yields_an_empty_route() {
    let (store, _, routes) = services();
    store.add_user("alice");

    let empty = routes.build("alice", None, None).await.unwrap();
    assert!(empty.is_empty());

    let unknown = routes.build("ghost", None, None).await.unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn reversed_window_degenerates_to_empty() {
    let (store, reports, routes) = services();
    store.add_user("alice");

    reports
        .report_at("alice", -79.38, 43.65, at(2))
        .await
        .unwrap();

    let route = routes
        .build("alice", Some(at(4)), Some(at(1)))
        .await
        .unwrap();
    assert!(route.is_empty());
}

#[tokio::test]
async fn route_renders_as_geojson_line_string() {
    let (store, reports, routes) = services();
    store.add_user("alice");

    reports
        .report_at("alice", -79.38, 43.65, at(1))
        .await
        .unwrap();
    reports
        .report_at("alice", -79.40, 43.70, at(2))
        .await
        .unwrap();

    let route = routes.build("alice", None, None).await.unwrap();
    let geometry = route.to_geojson();
    let json = serde_json::to_value(&geometry).unwrap();

    assert_eq!(json["type"], "LineString");
    assert_eq!(
        json["coordinates"],
        serde_json::json!([[-79.38, 43.65], [-79.40, 43.70]])
    );
}
