use rand::rngs::StdRng;
use rand::SeedableRng;
use seatplan_catalog::{CabinLayout, Inventory};
use seatplan_manifest::{DemandRegistry, Membership, NewGroup, NewPassenger, WaitingList};
use seatplan_shared::{GroupId, PassengerId, SeatEvent, SeatId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocator::{AllocationReport, Allocator};
use crate::{CoreError, CoreResult};

/// How a session builds (and rebuilds) its cabin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub layout: CabinLayout,
    /// Seats taken out of service at startup and on every reset.
    pub unavailable_seats: usize,
    /// Fixes the maintenance pattern; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            layout: CabinLayout::standard(),
            unavailable_seats: 8,
            seed: None,
        }
    }
}

/// Result of a manual reassignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideOutcome {
    pub seat: SeatId,
    /// Seat the passenger held before the override.
    pub vacated: Option<SeatId>,
    /// Previous occupant of the target seat, now on the waiting list.
    pub displaced: Option<PassengerId>,
}

/// The single allocation session: inventory, demand and waiting list.
///
/// All mutation goes through this type so the seat/passenger cross
/// references stay consistent.
pub struct AllocationSession {
    layout: CabinLayout,
    unavailable_seats: usize,
    rng: StdRng,
    inventory: Inventory,
    registry: DemandRegistry,
    waiting_list: WaitingList,
    events: Vec<SeatEvent>,
}

impl AllocationSession {
    pub fn new(settings: SessionSettings) -> CoreResult<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings.layout, settings.unavailable_seats, rng)
    }

    /// Build a session with an explicit random source for the maintenance
    /// sampling.
    pub fn with_rng(layout: CabinLayout, unavailable_seats: usize, mut rng: StdRng) -> CoreResult<Self> {
        let mut inventory = Inventory::initialize(&layout)?;
        let blocked = inventory.mark_unavailable(unavailable_seats, &mut rng);
        info!(
            "Cabin initialized with {} seats, {} out of service",
            inventory.len(),
            blocked.len()
        );

        Ok(Self {
            layout,
            unavailable_seats,
            rng,
            inventory,
            registry: DemandRegistry::new(),
            waiting_list: WaitingList::new(),
            events: Vec::new(),
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn registry(&self) -> &DemandRegistry {
        &self.registry
    }

    pub fn waiting_list(&self) -> &WaitingList {
        &self.waiting_list
    }

    pub fn layout(&self) -> &CabinLayout {
        &self.layout
    }

    pub fn add_solo_passenger(&mut self, request: NewPassenger) -> CoreResult<PassengerId> {
        let id = self.registry.add_solo(request)?;
        self.events.push(SeatEvent::PassengerAdded {
            passenger_id: id,
            at: SeatEvent::now(),
        });
        Ok(id)
    }

    pub fn add_group(&mut self, request: NewGroup) -> CoreResult<GroupId> {
        let id = self.registry.add_group(request)?;
        let members = self
            .registry
            .group(id)
            .map(|g| g.members.clone())
            .unwrap_or_default();
        self.events.push(SeatEvent::GroupAdded {
            group_id: id,
            members,
            at: SeatEvent::now(),
        });
        Ok(id)
    }

    /// Recompute every assignment from scratch.
    pub fn run_allocation(&mut self) -> CoreResult<AllocationReport> {
        let report = Allocator::new(&mut self.inventory, &mut self.registry, &mut self.waiting_list).run()?;
        info!(
            "Allocation completed: {} seated, {} waiting",
            report.assigned, report.waiting
        );
        self.events.push(SeatEvent::AllocationCompleted {
            assigned: report.assigned,
            waiting: report.waiting,
            at: SeatEvent::now(),
        });
        Ok(report)
    }

    /// Force a passenger into a seat, bypassing zone rules.
    ///
    /// Any other occupant of the seat is moved to the waiting list. Fails
    /// without side effects if the passenger or seat is unknown or the seat
    /// is out of service.
    pub fn admin_override(&mut self, passenger_id: PassengerId, seat_id: SeatId) -> CoreResult<OverrideOutcome> {
        let current = self
            .registry
            .passenger(passenger_id)
            .ok_or_else(|| CoreError::NotFound(format!("passenger {}", passenger_id)))?
            .assigned_seat;
        let target = self
            .inventory
            .seat(&seat_id)
            .ok_or_else(|| CoreError::NotFound(format!("seat {}", seat_id)))?;
        if !target.available {
            return Err(CoreError::SeatUnavailable(seat_id));
        }
        let occupant = target.occupant;

        if current == Some(seat_id) {
            self.waiting_list.remove(passenger_id);
            return Ok(OverrideOutcome {
                seat: seat_id,
                vacated: None,
                displaced: None,
            });
        }

        if let Some(previous) = current {
            self.inventory.release(&previous)?;
            self.registry.set_assignment(passenger_id, None)?;
        }

        let displaced = match occupant {
            Some(other) if other != passenger_id => {
                self.inventory.release(&seat_id)?;
                self.registry.set_assignment(other, None)?;
                self.waiting_list.push(other);
                self.events.push(SeatEvent::PassengerDisplaced {
                    passenger_id: other,
                    seat: seat_id,
                    at: SeatEvent::now(),
                });
                Some(other)
            }
            _ => None,
        };

        self.inventory.occupy(&seat_id, passenger_id)?;
        self.registry.set_assignment(passenger_id, Some(seat_id))?;
        self.waiting_list.remove(passenger_id);

        info!(
            "Override: passenger {} moved to {} (from {:?}, displacing {:?})",
            passenger_id, seat_id, current, displaced
        );
        self.events.push(SeatEvent::SeatOverridden {
            passenger_id,
            seat: seat_id,
            at: SeatEvent::now(),
        });

        Ok(OverrideOutcome {
            seat: seat_id,
            vacated: current,
            displaced,
        })
    }

    /// Remove a passenger entirely, freeing their seat.
    ///
    /// Waiting passengers are not moved into the freed seat; the next
    /// allocation run will consider it.
    pub fn cancel_booking(&mut self, passenger_id: PassengerId) -> CoreResult<Option<SeatId>> {
        let removed = self
            .registry
            .remove(passenger_id, &mut self.inventory, &mut self.waiting_list)?;

        info!(
            "Booking cancelled for passenger {}, released {:?}",
            passenger_id, removed.assigned_seat
        );
        self.events.push(SeatEvent::BookingCancelled {
            passenger_id,
            released_seat: removed.assigned_seat,
            at: SeatEvent::now(),
        });
        Ok(removed.assigned_seat)
    }

    /// Clear all demand and draw a fresh maintenance pattern.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.waiting_list.clear();
        self.inventory.clear_occupants();
        self.inventory.restore_availability();
        let blocked = self.inventory.mark_unavailable(self.unavailable_seats, &mut self.rng);

        info!("Session reset, {} seats out of service", blocked.len());
        self.events.push(SeatEvent::SessionReset {
            unavailable_seats: blocked.len(),
            at: SeatEvent::now(),
        });
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SeatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Verify the seat/passenger cross references, group membership and
    /// waiting-list hygiene.
    pub fn check_consistency(&self) -> CoreResult<()> {
        for seat in self.inventory.seats() {
            let Some(occupant) = seat.occupant else { continue };
            let passenger = self
                .registry
                .passenger(occupant)
                .ok_or_else(|| inconsistent(format!("seat {} held by unknown passenger {}", seat.id, occupant)))?;
            if passenger.assigned_seat != Some(seat.id) {
                return Err(inconsistent(format!(
                    "seat {} names passenger {} who holds {:?}",
                    seat.id, occupant, passenger.assigned_seat
                )));
            }
            if !seat.available {
                return Err(inconsistent(format!("out-of-service seat {} is occupied", seat.id)));
            }
        }

        for passenger in self.registry.passengers() {
            if let Some(seat_id) = passenger.assigned_seat {
                let seat = self
                    .inventory
                    .seat(&seat_id)
                    .ok_or_else(|| inconsistent(format!("passenger {} holds unknown seat {}", passenger.id, seat_id)))?;
                if seat.occupant != Some(passenger.id) {
                    return Err(inconsistent(format!(
                        "passenger {} holds {} but the seat names {:?}",
                        passenger.id, seat_id, seat.occupant
                    )));
                }
            }

            if let Membership::GroupMember(group_id) = passenger.membership {
                let listed = self
                    .registry
                    .group(group_id)
                    .is_some_and(|g| g.members.contains(&passenger.id));
                if !listed {
                    return Err(inconsistent(format!(
                        "passenger {} is not listed by group {}",
                        passenger.id, group_id
                    )));
                }
            }
        }

        for group in self.registry.groups() {
            if group.members.is_empty() {
                return Err(inconsistent(format!("group {} has no members", group.id)));
            }
            for member in &group.members {
                let belongs = self
                    .registry
                    .passenger(*member)
                    .is_some_and(|p| p.group_id() == Some(group.id));
                if !belongs {
                    return Err(inconsistent(format!(
                        "group {} lists passenger {} who is not a member",
                        group.id, member
                    )));
                }
            }
        }

        let mut seen = Vec::with_capacity(self.waiting_list.len());
        for id in self.waiting_list.iter() {
            if seen.contains(&id) {
                return Err(inconsistent(format!("passenger {} is waiting twice", id)));
            }
            seen.push(id);
            match self.registry.passenger(id) {
                None => return Err(inconsistent(format!("unknown passenger {} is waiting", id))),
                Some(p) if p.is_assigned() => {
                    return Err(inconsistent(format!("seated passenger {} is also waiting", id)))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

fn inconsistent(detail: String) -> CoreError {
    CoreError::InternalError(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_catalog::{CabinSection, SeatClass};

    fn session(unavailable: usize) -> AllocationSession {
        AllocationSession::with_rng(CabinLayout::standard(), unavailable, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_new_session_blocks_requested_seats() {
        let session = session(8);
        assert_eq!(session.inventory().len(), 180);
        assert_eq!(session.inventory().available_count(), 172);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_seeded_sessions_share_maintenance_pattern() {
        let settings = SessionSettings {
            seed: Some(99),
            ..SessionSettings::default()
        };
        let a = AllocationSession::new(settings.clone()).unwrap();
        let b = AllocationSession::new(settings).unwrap();

        let blocked = |s: &AllocationSession| -> Vec<SeatId> {
            s.inventory().seats().filter(|seat| !seat.available).map(|seat| seat.id).collect()
        };
        assert_eq!(blocked(&a), blocked(&b));
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let layout = CabinLayout {
            sections: vec![CabinSection::new(SeatClass::Economy, 2, 1, &["AB"])],
            zones: vec![],
        };
        let result = AllocationSession::with_rng(layout, 0, StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_override_onto_own_seat_is_a_no_op() {
        let mut session = session(0);
        let id = session.add_solo_passenger(NewPassenger::new("Ann", 30)).unwrap();
        session.run_allocation().unwrap();
        let seat = session.registry().passenger(id).unwrap().assigned_seat.unwrap();

        let outcome = session.admin_override(id, seat).unwrap();
        assert_eq!(outcome.displaced, None);
        assert_eq!(outcome.vacated, None);
        assert_eq!(session.registry().passenger(id).unwrap().assigned_seat, Some(seat));
        session.check_consistency().unwrap();
    }

    #[test]
    fn test_override_rejects_out_of_service_seat() {
        let mut session = session(8);
        let id = session.add_solo_passenger(NewPassenger::new("Ann", 30)).unwrap();
        let blocked = session
            .inventory()
            .seats()
            .find(|seat| !seat.available)
            .map(|seat| seat.id)
            .unwrap();

        assert_eq!(session.admin_override(id, blocked), Err(CoreError::SeatUnavailable(blocked)));
        assert!(session.registry().passenger(id).unwrap().assigned_seat.is_none());
    }

    #[test]
    fn test_events_are_drained_once() {
        let mut session = session(0);
        session.add_solo_passenger(NewPassenger::new("Ann", 30)).unwrap();
        session.run_allocation().unwrap();

        let events = session.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SeatEvent::AllocationCompleted { assigned: 1, waiting: 0, .. }));
        assert!(session.drain_events().is_empty());
    }
}
