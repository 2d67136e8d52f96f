//! The allocation pipeline.
//!
//! A run clears every assignment and then seats demand in five ordered
//! stages: VIP solo passengers, passengers needing accessibility, VIP groups,
//! regular groups and finally everyone else travelling alone. Each stage is a
//! first-fit scan over the inventory's row-major order, so the same input
//! always produces the same seating.

use seatplan_catalog::Inventory;
use seatplan_manifest::{DemandRegistry, Passenger, WaitingList};
use seatplan_shared::{GroupId, PassengerId, SeatId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::rules::{first_open_seat_of, Eligibility, SeatRule};
use crate::{CoreError, CoreResult};

/// Outcome of one allocation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub assigned: usize,
    pub waiting: usize,
}

/// Runs the priority pipeline over one session's state.
pub struct Allocator<'a> {
    inventory: &'a mut Inventory,
    registry: &'a mut DemandRegistry,
    waiting_list: &'a mut WaitingList,
}

impl<'a> Allocator<'a> {
    pub fn new(
        inventory: &'a mut Inventory,
        registry: &'a mut DemandRegistry,
        waiting_list: &'a mut WaitingList,
    ) -> Self {
        Self {
            inventory,
            registry,
            waiting_list,
        }
    }

    pub fn run(mut self) -> CoreResult<AllocationReport> {
        self.clear_assignments();

        self.place_vip_solos()?;
        self.place_accessibility()?;
        self.place_groups(true)?;
        self.place_groups(false)?;
        self.place_remaining_solos()?;

        Ok(AllocationReport {
            assigned: self.registry.passengers().filter(|p| p.is_assigned()).count(),
            waiting: self.waiting_list.len(),
        })
    }

    fn clear_assignments(&mut self) {
        self.inventory.clear_occupants();
        self.registry.clear_assignments();
        self.waiting_list.clear();
    }

    /// Stage 1: VIP-zone seats, window or aisle first.
    fn place_vip_solos(&mut self) -> CoreResult<()> {
        let candidates = self.unassigned(|p| p.is_solo() && p.flags.is_vip);

        for id in candidates {
            let eligibility = self.eligibility(id)?;
            let preferences = [
                eligibility.with(&[SeatRule::VipZoneOnly, SeatRule::WindowOrAisle]),
                eligibility.with(&[SeatRule::VipZoneOnly]),
            ];
            if let Some(seat) = first_open_seat_of(self.inventory, &preferences) {
                self.seat(id, seat)?;
            }
        }
        Ok(())
    }

    /// Stage 2: accessible seats, falling back to any aisle seat.
    fn place_accessibility(&mut self) -> CoreResult<()> {
        let candidates = self.unassigned(|p| p.flags.needs_accessibility);

        for id in candidates {
            let eligibility = self.eligibility(id)?;
            let preferences = [
                eligibility.with(&[SeatRule::AccessibleOnly]),
                eligibility.with(&[SeatRule::AisleOnly]),
            ];
            if let Some(seat) = first_open_seat_of(self.inventory, &preferences) {
                self.seat(id, seat)?;
            }
        }
        Ok(())
    }

    /// Stages 3 and 4.
    fn place_groups(&mut self, vip: bool) -> CoreResult<()> {
        let groups: Vec<GroupId> = self
            .registry
            .groups()
            .filter(|g| g.flags.is_vip == vip)
            .map(|g| g.id)
            .collect();

        for id in groups {
            self.place_group(id)?;
        }
        Ok(())
    }

    /// Seat a group's unassigned members together in the first row that can
    /// take all of them, otherwise route each member through the solo
    /// procedure.
    fn place_group(&mut self, id: GroupId) -> CoreResult<()> {
        let members = self.registry.unassigned_members(id);
        if members.is_empty() {
            return Ok(());
        }
        let eligibility = self
            .registry
            .group(id)
            .map(Eligibility::of_group)
            .ok_or_else(|| CoreError::InternalError(format!("group {} vanished during allocation", id)))?;

        if let Some(seats) = self.find_row_block(members.len(), eligibility) {
            for (member, seat) in members.iter().zip(seats) {
                self.seat(*member, seat)?;
            }
            return Ok(());
        }

        debug!("Group {} does not fit in one row, splitting {} members", id, members.len());
        for member in members {
            if !self.place_solo(member)? {
                self.wait(member);
            }
        }
        Ok(())
    }

    /// The first `size` open seats of the first row that has at least `size`
    /// open seats, none of them in a zone the group may not use.
    fn find_row_block(&self, size: usize, eligibility: Eligibility) -> Option<Vec<SeatId>> {
        self.inventory.rows().into_iter().find_map(|(_, seats)| {
            let open: Vec<_> = seats.into_iter().filter(|s| s.is_open()).collect();
            if open.len() < 2 || open.len() < size {
                return None;
            }
            let block = &open[..size];
            block
                .iter()
                .all(|seat| eligibility.allows(seat))
                .then(|| block.iter().map(|seat| seat.id).collect())
        })
    }

    /// Stage 5.
    fn place_remaining_solos(&mut self) -> CoreResult<()> {
        let candidates = self.unassigned(|p| p.is_solo());

        for id in candidates {
            if !self.place_solo(id)? {
                self.wait(id);
            }
        }
        Ok(())
    }

    /// Window or aisle without isolating the seat, then window or aisle,
    /// then anything the passenger's zones allow.
    fn place_solo(&mut self, id: PassengerId) -> CoreResult<bool> {
        let eligibility = self.eligibility(id)?;
        let preferences = [
            eligibility.with(&[SeatRule::WindowOrAisle, SeatRule::AvoidIsolation]),
            eligibility.with(&[SeatRule::WindowOrAisle]),
            eligibility.with(&[]),
        ];

        match first_open_seat_of(self.inventory, &preferences) {
            Some(seat) => {
                self.seat(id, seat)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn seat(&mut self, id: PassengerId, seat: SeatId) -> CoreResult<()> {
        self.inventory.occupy(&seat, id)?;
        self.registry.set_assignment(id, Some(seat))?;
        debug!("Passenger {} seated in {}", id, seat);
        Ok(())
    }

    fn wait(&mut self, id: PassengerId) {
        if self.waiting_list.push(id) {
            warn!("No eligible seat for passenger {}, added to waiting list", id);
        }
    }

    fn eligibility(&self, id: PassengerId) -> CoreResult<Eligibility> {
        self.registry
            .passenger(id)
            .map(|p| Eligibility::of(p, self.registry))
            .ok_or_else(|| CoreError::InternalError(format!("passenger {} vanished during allocation", id)))
    }

    fn unassigned(&self, filter: impl Fn(&Passenger) -> bool) -> Vec<PassengerId> {
        self.registry
            .passengers()
            .filter(|p| !p.is_assigned() && filter(p))
            .map(|p| p.id)
            .collect()
    }
}
