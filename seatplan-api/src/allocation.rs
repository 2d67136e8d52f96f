use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use seatplan_shared::{PassengerId, SeatId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    pub passenger_id: PassengerId,
    pub row: u32,
    pub column: char,
}

#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub success: bool,
    pub assigned: usize,
    pub waiting: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideResponse {
    pub success: bool,
    pub seat: SeatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacated: Option<SeatId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaced: Option<PassengerId>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assign-seats", post(assign_seats))
        .route("/override", post(admin_override))
        .route("/reset", post(reset))
}

/// POST /api/assign-seats
async fn assign_seats(State(state): State<AppState>) -> Result<Json<AssignResponse>, AppError> {
    let report = state.mutate(|session| session.run_allocation())?;

    Ok(Json(AssignResponse {
        success: true,
        assigned: report.assigned,
        waiting: report.waiting,
    }))
}

/// POST /api/override
async fn admin_override(
    State(state): State<AppState>,
    payload: Result<Json<OverrideRequest>, JsonRejection>,
) -> Result<Json<OverrideResponse>, AppError> {
    let Json(req) = payload?;
    let seat = SeatId::new(req.row, req.column.to_ascii_uppercase());

    let outcome = state.mutate(|session| session.admin_override(req.passenger_id, seat))?;

    Ok(Json(OverrideResponse {
        success: true,
        seat: outcome.seat,
        vacated: outcome.vacated,
        displaced: outcome.displaced,
    }))
}

/// POST /api/reset
async fn reset(State(state): State<AppState>) -> Result<Json<SuccessResponse>, AppError> {
    state.mutate(|session| {
        session.reset();
        Ok(())
    })?;
    info!("Session reset via API");

    Ok(Json(SuccessResponse { success: true }))
}
