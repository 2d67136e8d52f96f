use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use seatplan_core::PassengerList;
use seatplan_manifest::{NewGroup, NewPassenger};
use seatplan_shared::{GroupId, PassengerId, SeatId};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPassengerRequest {
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub vip: bool,
    #[serde(default, alias = "accessible")]
    pub accessibility: bool,
    #[serde(default)]
    pub senior: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupRequest {
    pub name: String,
    pub size: usize,
    #[serde(default)]
    pub children: bool,
    #[serde(default, alias = "accessible")]
    pub accessibility: bool,
    #[serde(default)]
    pub vip: bool,
    #[serde(default)]
    pub senior: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub passenger_id: PassengerId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPassengerResponse {
    pub success: bool,
    pub passenger_id: PassengerId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupResponse {
    pub success: bool,
    pub group_id: GroupId,
    pub members: Vec<PassengerId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_seat: Option<SeatId>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add-passenger", post(add_passenger))
        .route("/add-group", post(add_group))
        .route("/cancel", post(cancel_booking))
        .route("/passengers", get(list_passengers))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/add-passenger
async fn add_passenger(
    State(state): State<AppState>,
    payload: Result<Json<AddPassengerRequest>, JsonRejection>,
) -> Result<Json<AddPassengerResponse>, AppError> {
    let Json(req) = payload?;

    let mut request = NewPassenger::new(req.name, req.age);
    if req.vip {
        request = request.vip();
    }
    if req.accessibility {
        request = request.accessible();
    }
    if req.senior {
        request = request.senior();
    }

    let passenger_id = state.mutate(|session| session.add_solo_passenger(request))?;
    Ok(Json(AddPassengerResponse {
        success: true,
        passenger_id,
    }))
}

/// POST /api/add-group
async fn add_group(
    State(state): State<AppState>,
    payload: Result<Json<AddGroupRequest>, JsonRejection>,
) -> Result<Json<AddGroupResponse>, AppError> {
    let Json(req) = payload?;

    let mut request = NewGroup::new(req.name, req.size);
    if req.vip {
        request = request.vip();
    }
    if req.children {
        request = request.with_children();
    }
    if req.accessibility {
        request = request.accessible();
    }
    if req.senior {
        request = request.with_seniors();
    }

    let (group_id, members) = state.mutate(|session| {
        let id = session.add_group(request)?;
        let members = session
            .registry()
            .group(id)
            .map(|g| g.members.clone())
            .unwrap_or_default();
        Ok((id, members))
    })?;

    Ok(Json(AddGroupResponse {
        success: true,
        group_id,
        members,
    }))
}

/// POST /api/cancel
async fn cancel_booking(
    State(state): State<AppState>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Result<Json<CancelResponse>, AppError> {
    let Json(req) = payload?;
    let released_seat = state.mutate(|session| session.cancel_booking(req.passenger_id))?;

    Ok(Json(CancelResponse {
        success: true,
        released_seat,
    }))
}

/// GET /api/passengers
async fn list_passengers(State(state): State<AppState>) -> Json<PassengerList> {
    Json(state.read(|session| session.passenger_list()))
}
