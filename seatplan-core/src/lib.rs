pub mod rules;
pub mod allocator;
pub mod session;
pub mod views;

pub use allocator::{AllocationReport, Allocator};
pub use session::{AllocationSession, OverrideOutcome, SessionSettings};
pub use views::{OccupancySummary, PassengerList, PassengerView, SeatView, SeatingLayout};

use seatplan_catalog::InventoryError;
use seatplan_manifest::RegistryError;
use seatplan_shared::SeatId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Seat {0} is not available on this flight")]
    SeatUnavailable(SeatId),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<InventoryError> for CoreError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidLayout(reason) => CoreError::ValidationError(reason),
            InventoryError::SeatNotFound(seat) => CoreError::NotFound(format!("seat {}", seat)),
            InventoryError::SeatUnavailable(seat) => CoreError::SeatUnavailable(seat),
            err @ InventoryError::SeatOccupied { .. } => CoreError::InternalError(err.to_string()),
        }
    }
}

impl From<RegistryError> for CoreError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation(reason) => CoreError::ValidationError(reason),
            RegistryError::PassengerNotFound(id) => CoreError::NotFound(format!("passenger {}", id)),
            RegistryError::Inventory(err) => err.into(),
        }
    }
}
