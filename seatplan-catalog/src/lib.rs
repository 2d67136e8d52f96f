pub mod layout;
pub mod inventory;

pub use layout::{CabinLayout, CabinSection, SeatClass, SeatType, Zone, ZoneRule};
pub use inventory::{Inventory, InventoryError, Seat};
