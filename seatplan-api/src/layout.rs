use axum::{extract::State, routing::get, Json, Router};
use seatplan_core::{OccupancySummary, SeatingLayout};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/seats", get(seating_layout))
        .route("/summary", get(summary))
}

/// GET /api/seats
async fn seating_layout(State(state): State<AppState>) -> Json<SeatingLayout> {
    Json(state.read(|session| session.seating_layout()))
}

/// GET /api/summary
async fn summary(State(state): State<AppState>) -> Json<OccupancySummary> {
    Json(state.read(|session| session.summary()))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
