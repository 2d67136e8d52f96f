pub mod ids;
pub mod models;
pub mod pii;

pub use ids::{GroupId, ParseSeatIdError, PassengerId, SeatId};
pub use models::events::SeatEvent;
pub use pii::Masked;
