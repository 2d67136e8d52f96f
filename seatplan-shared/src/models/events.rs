use crate::ids::{GroupId, PassengerId, SeatId};
use chrono::Utc;

/// Change notifications emitted by the allocation session.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatEvent {
    PassengerAdded {
        passenger_id: PassengerId,
        at: i64,
    },
    GroupAdded {
        group_id: GroupId,
        members: Vec<PassengerId>,
        at: i64,
    },
    AllocationCompleted {
        assigned: usize,
        waiting: usize,
        at: i64,
    },
    SeatOverridden {
        passenger_id: PassengerId,
        seat: SeatId,
        at: i64,
    },
    PassengerDisplaced {
        passenger_id: PassengerId,
        seat: SeatId,
        at: i64,
    },
    BookingCancelled {
        passenger_id: PassengerId,
        released_seat: Option<SeatId>,
        at: i64,
    },
    SessionReset {
        unavailable_seats: usize,
        at: i64,
    },
}

impl SeatEvent {
    pub fn now() -> i64 {
        Utc::now().timestamp()
    }

    /// Short name used as the SSE event type.
    pub fn kind(&self) -> &'static str {
        match self {
            SeatEvent::PassengerAdded { .. } => "passenger_added",
            SeatEvent::GroupAdded { .. } => "group_added",
            SeatEvent::AllocationCompleted { .. } => "allocation_completed",
            SeatEvent::SeatOverridden { .. } => "seat_overridden",
            SeatEvent::PassengerDisplaced { .. } => "passenger_displaced",
            SeatEvent::BookingCancelled { .. } => "booking_cancelled",
            SeatEvent::SessionReset { .. } => "session_reset",
        }
    }
}
