use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use seatplan_api::{app, AppState};
use seatplan_core::SessionSettings;
use seatplan_shared::SeatEvent;
use seatplan_store::SessionStore;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tower::ServiceExt;

fn test_state(unavailable_seats: usize) -> AppState {
    let store = SessionStore::from_settings(SessionSettings {
        unavailable_seats,
        seed: Some(11),
        ..SessionSettings::default()
    })
    .unwrap();
    let (events_tx, _) = broadcast::channel(64);
    AppState::new(store, events_tx)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app(test_state(0));
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_add_passenger_and_assign() {
    let app = app(test_state(0));

    let (status, body) = send(
        &app,
        "POST",
        "/api/add-passenger",
        Some(json!({ "name": "VIP Guest", "age": 45, "vip": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["passengerId"], 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/add-passenger",
        Some(json!({ "name": "Wheels", "age": 60, "accessible": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["passengerId"], 2);

    let (status, body) = send(&app, "POST", "/api/assign-seats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "assigned": 2, "waiting": 0 }));

    let (_, body) = send(&app, "GET", "/api/passengers", None).await;
    assert_eq!(body["passengers"][0]["assignedSeat"], "1A");
    assert_eq!(body["passengers"][1]["assignedSeat"], "20C");
    assert_eq!(body["passengers"][1]["accessibility"], true);
    assert_eq!(body["waitingList"], json!([]));

    let (_, seats) = send(&app, "GET", "/api/seats", None).await;
    assert_eq!(seats["1"]["A"]["occupantName"], "VIP Guest");
    assert_eq!(seats["20"]["C"]["accessible"], true);
    assert_eq!(seats["30"]["F"]["type"], "WINDOW");
}

#[tokio::test]
async fn test_add_group_rejects_bad_sizes() {
    let app = app(test_state(0));

    for size in [1, 8] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/add-group",
            Some(json!({ "name": "Odd", "size": size })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/add-group",
        Some(json!({ "name": "Johnson Family", "size": 3, "children": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groupId"], 1);
    assert_eq!(body["members"], json!([1, 2, 3]));

    let (_, summary) = send(&app, "GET", "/api/summary", None).await;
    assert_eq!(summary["passengers"], 3);
    assert_eq!(summary["groups"], 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app(test_state(0));

    let (status, body) = send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "No Age" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "Old", "age": 150 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "  ", "age": 30 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_override_displaces_and_cancel_releases() {
    let app = app(test_state(0));
    send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "One", "age": 30 }))).await;
    send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "Two", "age": 30 }))).await;
    send(&app, "POST", "/api/assign-seats", None).await;

    let (_, body) = send(&app, "GET", "/api/passengers", None).await;
    let second_seat = body["passengers"][1]["assignedSeat"].as_str().unwrap().to_string();
    let (row, column) = second_seat.split_at(second_seat.len() - 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/override",
        Some(json!({ "passengerId": 1, "row": row.parse::<u32>().unwrap(), "column": column })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["displaced"], 2);

    let (_, body) = send(&app, "GET", "/api/passengers", None).await;
    assert_eq!(body["waitingList"], json!([2]));

    let (status, body) = send(&app, "POST", "/api/cancel", Some(json!({ "passengerId": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["releasedSeat"], second_seat);

    let (status, body) = send(&app, "POST", "/api/cancel", Some(json!({ "passengerId": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_override_unknown_seat_is_not_found() {
    let app = app(test_state(0));
    send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "One", "age": 30 }))).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/override",
        Some(json!({ "passengerId": 1, "row": 40, "column": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/override",
        Some(json!({ "passengerId": 9, "row": 10, "column": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let app = app(test_state(8));
    send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "One", "age": 30 }))).await;
    send(&app, "POST", "/api/add-group", Some(json!({ "name": "Pair", "size": 2 }))).await;
    send(&app, "POST", "/api/assign-seats", None).await;

    let (status, body) = send(&app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, summary) = send(&app, "GET", "/api/summary", None).await;
    assert_eq!(summary["passengers"], 0);
    assert_eq!(summary["groups"], 0);
    assert_eq!(summary["occupiedSeats"], 0);
    assert_eq!(summary["unavailableSeats"], 8);
    assert_eq!(summary["totalSeats"], 180);
}

#[tokio::test]
async fn test_mutations_are_broadcast() {
    let state = test_state(0);
    let mut rx = state.events_tx.subscribe();
    let app = app(state);

    send(&app, "POST", "/api/add-passenger", Some(json!({ "name": "One", "age": 30 }))).await;
    send(&app, "POST", "/api/assign-seats", None).await;

    assert!(matches!(rx.try_recv().unwrap(), SeatEvent::PassengerAdded { .. }));
    assert!(matches!(
        rx.try_recv().unwrap(),
        SeatEvent::AllocationCompleted { assigned: 1, waiting: 0, .. }
    ));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_event_stream_content_type() {
    let app = app(test_state(0));
    let response = app
        .oneshot(Request::builder().uri("/api/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
}
