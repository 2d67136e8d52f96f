pub mod models;
pub mod registry;
pub mod waitlist;

pub use models::{Group, GroupFlags, Membership, NewGroup, NewPassenger, Passenger, PassengerFlags};
pub use registry::{DemandRegistry, RegistryError};
pub use waitlist::WaitingList;
