use seatplan_catalog::{Inventory, Seat, SeatType};
use seatplan_manifest::{DemandRegistry, Group, Passenger};
use seatplan_shared::SeatId;

/// A single condition a candidate seat must satisfy.
///
/// Every rule implicitly requires the seat to be open (available and empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatRule {
    VipZoneOnly,
    ExcludeVipZone,
    ExcludeQuietZone,
    AccessibleOnly,
    WindowOrAisle,
    AisleOnly,
    /// Skip seats that would sit between two occupied neighbours.
    AvoidIsolation,
}

impl SeatRule {
    pub fn matches(&self, seat: &Seat, inventory: &Inventory) -> bool {
        match self {
            SeatRule::VipZoneOnly => seat.vip_zone,
            SeatRule::ExcludeVipZone => !seat.vip_zone,
            SeatRule::ExcludeQuietZone => !seat.quiet_zone,
            SeatRule::AccessibleOnly => seat.accessible,
            SeatRule::WindowOrAisle => seat.seat_type.is_window_or_aisle(),
            SeatRule::AisleOnly => seat.seat_type == SeatType::Aisle,
            SeatRule::AvoidIsolation => !is_isolated(inventory, &seat.id),
        }
    }
}

/// Zone restrictions that follow a passenger through every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub vip: bool,
    pub avoids_quiet_zone: bool,
}

impl Eligibility {
    pub fn of(passenger: &Passenger, registry: &DemandRegistry) -> Self {
        let group_has_children = registry
            .group_of(passenger)
            .is_some_and(|group| group.flags.has_children);
        Self {
            vip: passenger.flags.is_vip,
            avoids_quiet_zone: passenger.is_child() || group_has_children,
        }
    }

    pub fn of_group(group: &Group) -> Self {
        Self {
            vip: group.flags.is_vip,
            avoids_quiet_zone: group.flags.has_children,
        }
    }

    pub fn allows(&self, seat: &Seat) -> bool {
        (self.vip || !seat.vip_zone) && (!self.avoids_quiet_zone || !seat.quiet_zone)
    }

    /// `rules` plus this passenger's zone exclusions.
    pub fn with(&self, rules: &[SeatRule]) -> Vec<SeatRule> {
        let mut all = rules.to_vec();
        if !self.vip && !all.contains(&SeatRule::VipZoneOnly) {
            all.push(SeatRule::ExcludeVipZone);
        }
        if self.avoids_quiet_zone {
            all.push(SeatRule::ExcludeQuietZone);
        }
        all
    }
}

/// Both row-adjacent seats exist and are occupied.
pub fn is_isolated(inventory: &Inventory, seat: &SeatId) -> bool {
    match inventory.neighbours(seat) {
        (Some(before), Some(after)) => before.is_occupied() && after.is_occupied(),
        _ => false,
    }
}

/// First open seat, in row-major order, that satisfies every rule.
pub fn first_open_seat(inventory: &Inventory, rules: &[SeatRule]) -> Option<SeatId> {
    inventory
        .seats()
        .filter(|seat| seat.is_open())
        .find(|seat| rules.iter().all(|rule| rule.matches(seat, inventory)))
        .map(|seat| seat.id)
}

/// Try each candidate rule set in turn, returning the first seat found.
pub fn first_open_seat_of(inventory: &Inventory, preferences: &[Vec<SeatRule>]) -> Option<SeatId> {
    preferences
        .iter()
        .find_map(|rules| first_open_seat(inventory, rules))
}
