//! Read-only projections of the session state.

use seatplan_catalog::{SeatClass, SeatType};
use seatplan_manifest::Membership;
use seatplan_shared::{GroupId, PassengerId, SeatId};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::session::AllocationSession;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub class: SeatClass,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    pub vip_zone: bool,
    pub accessible: bool,
    pub quiet_zone: bool,
    pub available: bool,
    pub occupant_id: Option<PassengerId>,
    pub occupant_name: Option<String>,
}

/// Row number to column letter to seat.
pub type SeatingLayout = BTreeMap<u32, BTreeMap<char, SeatView>>;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerView {
    pub id: PassengerId,
    pub name: String,
    pub age: u8,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_seat: Option<SeatId>,
    pub vip: bool,
    pub accessibility: bool,
    pub senior: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerList {
    pub passengers: Vec<PassengerView>,
    pub waiting_list: Vec<PassengerId>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassOccupancy {
    pub class: SeatClass,
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub total_seats: usize,
    pub available_seats: usize,
    pub unavailable_seats: usize,
    pub occupied_seats: usize,
    pub utilization: f64,
    pub passengers: usize,
    pub groups: usize,
    pub waiting: usize,
    pub by_class: Vec<ClassOccupancy>,
}

impl AllocationSession {
    pub fn seating_layout(&self) -> SeatingLayout {
        let mut layout = SeatingLayout::new();
        for seat in self.inventory().seats() {
            let occupant_name = seat
                .occupant
                .and_then(|id| self.registry().passenger(id))
                .map(|p| p.name.expose().clone());

            layout.entry(seat.id.row).or_default().insert(
                seat.id.column,
                SeatView {
                    class: seat.class,
                    seat_type: seat.seat_type,
                    vip_zone: seat.vip_zone,
                    accessible: seat.accessible,
                    quiet_zone: seat.quiet_zone,
                    available: seat.available,
                    occupant_id: seat.occupant,
                    occupant_name,
                },
            );
        }
        layout
    }

    pub fn passenger_list(&self) -> PassengerList {
        let passengers = self
            .registry()
            .passengers()
            .map(|p| PassengerView {
                id: p.id,
                name: p.name.expose().clone(),
                age: p.age,
                kind: match p.membership {
                    Membership::Solo => "solo",
                    Membership::GroupMember(_) => "group",
                },
                group_id: p.group_id(),
                assigned_seat: p.assigned_seat,
                vip: p.flags.is_vip,
                accessibility: p.flags.needs_accessibility,
                senior: p.flags.is_senior,
            })
            .collect();

        PassengerList {
            passengers,
            waiting_list: self.waiting_list().to_vec(),
        }
    }

    pub fn summary(&self) -> OccupancySummary {
        let inventory = self.inventory();

        let mut by_class: BTreeMap<SeatClass, ClassOccupancy> = BTreeMap::new();
        for seat in inventory.seats() {
            let entry = by_class.entry(seat.class).or_insert(ClassOccupancy {
                class: seat.class,
                total: 0,
                available: 0,
                occupied: 0,
            });
            entry.total += 1;
            if seat.available {
                entry.available += 1;
            }
            if seat.is_occupied() {
                entry.occupied += 1;
            }
        }

        let available_seats = inventory.available_count();
        OccupancySummary {
            total_seats: inventory.len(),
            available_seats,
            unavailable_seats: inventory.len() - available_seats,
            occupied_seats: inventory.occupied_count(),
            utilization: inventory.utilization(),
            passengers: self.registry().len(),
            groups: self.registry().group_count(),
            waiting: self.waiting_list().len(),
            by_class: by_class.into_values().collect(),
        }
    }
}
