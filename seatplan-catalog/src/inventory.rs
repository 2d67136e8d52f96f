use rand::seq::SliceRandom;
use rand::Rng;
use seatplan_shared::{PassengerId, SeatId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layout::{CabinLayout, SeatClass, SeatType, Zone};

/// A single seat with its static attributes and dynamic state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub id: SeatId,
    pub class: SeatClass,
    pub seat_type: SeatType,
    pub vip_zone: bool,
    pub accessible: bool,
    pub quiet_zone: bool,
    /// Offered for sale on this flight. Independent of occupancy.
    pub available: bool,
    pub occupant: Option<PassengerId>,
}

impl Seat {
    /// Available and unoccupied.
    pub fn is_open(&self) -> bool {
        self.available && self.occupant.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// The fixed seat inventory of one cabin
#[derive(Debug, Clone)]
pub struct Inventory {
    seats: BTreeMap<SeatId, Seat>,
}

impl Inventory {
    /// Build every seat described by the layout, all available and empty.
    pub fn initialize(layout: &CabinLayout) -> Result<Self, InventoryError> {
        layout.validate()?;

        let mut seats = BTreeMap::new();
        for section in &layout.sections {
            let columns = section.columns();
            for row in section.first_row..=section.last_row {
                for (column, seat_type) in &columns {
                    let id = SeatId::new(row, *column);
                    seats.insert(
                        id,
                        Seat {
                            id,
                            class: section.class,
                            seat_type: *seat_type,
                            vip_zone: layout.has_zone(Zone::Vip, section.class, row, *column),
                            accessible: layout.has_zone(Zone::Accessible, section.class, row, *column),
                            quiet_zone: layout.has_zone(Zone::Quiet, section.class, row, *column),
                            available: true,
                            occupant: None,
                        },
                    );
                }
            }
        }

        Ok(Self { seats })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, id: &SeatId) -> bool {
        self.seats.contains_key(id)
    }

    pub fn seat(&self, id: &SeatId) -> Option<&Seat> {
        self.seats.get(id)
    }

    /// Seats in row-major, column-letter order.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.values()
    }

    /// Seats grouped by row, rows ascending.
    pub fn rows(&self) -> Vec<(u32, Vec<&Seat>)> {
        let mut rows: Vec<(u32, Vec<&Seat>)> = Vec::new();
        for seat in self.seats.values() {
            match rows.last_mut() {
                Some((row, seats)) if *row == seat.id.row => seats.push(seat),
                _ => rows.push((seat.id.row, vec![seat])),
            }
        }
        rows
    }

    /// The seats immediately before and after `id` in the same row.
    pub fn neighbours(&self, id: &SeatId) -> (Option<&Seat>, Option<&Seat>) {
        let before = self
            .seats
            .range(..*id)
            .next_back()
            .map(|(_, seat)| seat)
            .filter(|seat| seat.id.row == id.row);
        let after = self
            .seats
            .range(*id..)
            .find(|(other, _)| *other != id)
            .map(|(_, seat)| seat)
            .filter(|seat| seat.id.row == id.row);
        (before, after)
    }

    /// Bind a passenger to an open seat.
    pub fn occupy(&mut self, id: &SeatId, passenger: PassengerId) -> Result<(), InventoryError> {
        let seat = self
            .seats
            .get_mut(id)
            .ok_or(InventoryError::SeatNotFound(*id))?;

        if !seat.available {
            return Err(InventoryError::SeatUnavailable(*id));
        }
        if let Some(occupant) = seat.occupant {
            if occupant != passenger {
                return Err(InventoryError::SeatOccupied { seat: *id, occupant });
            }
        }

        seat.occupant = Some(passenger);
        Ok(())
    }

    /// Clear a seat's occupant, returning who was there.
    pub fn release(&mut self, id: &SeatId) -> Result<Option<PassengerId>, InventoryError> {
        let seat = self
            .seats
            .get_mut(id)
            .ok_or(InventoryError::SeatNotFound(*id))?;
        Ok(seat.occupant.take())
    }

    pub fn clear_occupants(&mut self) {
        for seat in self.seats.values_mut() {
            seat.occupant = None;
        }
    }

    pub fn restore_availability(&mut self) {
        for seat in self.seats.values_mut() {
            seat.available = true;
        }
    }

    /// Take `count` randomly chosen available seats out of service.
    ///
    /// Marks `min(count, available)` seats and returns them in seat order.
    pub fn mark_unavailable<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<SeatId> {
        let candidates: Vec<SeatId> = self
            .seats
            .values()
            .filter(|seat| seat.available)
            .map(|seat| seat.id)
            .collect();

        let mut chosen: Vec<SeatId> = candidates.choose_multiple(rng, count).copied().collect();
        chosen.sort();

        for id in &chosen {
            if let Some(seat) = self.seats.get_mut(id) {
                seat.available = false;
            }
        }

        chosen
    }

    pub fn available_count(&self) -> usize {
        self.seats.values().filter(|s| s.available).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.values().filter(|s| s.is_occupied()).count()
    }

    /// Share of available seats currently occupied.
    pub fn utilization(&self) -> f64 {
        let available = self.available_count();
        if available == 0 {
            0.0
        } else {
            self.occupied_count() as f64 / available as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Invalid cabin layout: {0}")]
    InvalidLayout(String),

    #[error("Seat not found: {0}")]
    SeatNotFound(SeatId),

    #[error("Seat {0} is not available on this flight")]
    SeatUnavailable(SeatId),

    #[error("Seat {seat} is occupied by passenger {occupant}")]
    SeatOccupied {
        seat: SeatId,
        occupant: PassengerId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CabinSection, ZoneRule};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_layout() -> CabinLayout {
        CabinLayout {
            sections: vec![
                CabinSection::new(SeatClass::Business, 1, 2, &["AB", "CD"]),
                CabinSection::new(SeatClass::Economy, 3, 4, &["ABC", "DEF"]),
            ],
            zones: vec![
                ZoneRule::rows(Zone::Vip, 1, 1),
                ZoneRule::rows(Zone::Quiet, 2, 2),
                ZoneRule::rows(Zone::Accessible, 4, 4).with_columns("CD"),
            ],
        }
    }

    #[test]
    fn test_initialize_builds_every_seat() {
        let inventory = Inventory::initialize(&small_layout()).unwrap();
        assert_eq!(inventory.len(), 4 + 4 + 6 + 6);
        assert_eq!(inventory.available_count(), inventory.len());

        let seat = inventory.seat(&SeatId::new(1, 'B')).unwrap();
        assert_eq!(seat.class, SeatClass::Business);
        assert_eq!(seat.seat_type, SeatType::Aisle);
        assert!(seat.vip_zone);
        assert!(!seat.quiet_zone);

        let seat = inventory.seat(&SeatId::new(4, 'D')).unwrap();
        assert!(seat.accessible);
        assert_eq!(seat.seat_type, SeatType::Aisle);
        assert!(!inventory.seat(&SeatId::new(3, 'D')).unwrap().accessible);
        assert!(inventory.seat(&SeatId::new(2, 'A')).unwrap().quiet_zone);
    }

    #[test]
    fn test_iteration_is_row_major() {
        let inventory = Inventory::initialize(&small_layout()).unwrap();
        let ids: Vec<String> = inventory.seats().take(6).map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["1A", "1B", "1C", "1D", "2A", "2B"]);

        let rows = inventory.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].0, 3);
        assert_eq!(rows[2].1.len(), 6);
    }

    #[test]
    fn test_neighbours_stay_in_row() {
        let inventory = Inventory::initialize(&small_layout()).unwrap();

        let (before, after) = inventory.neighbours(&SeatId::new(2, 'A'));
        assert!(before.is_none());
        assert_eq!(after.unwrap().id, SeatId::new(2, 'B'));

        let (before, after) = inventory.neighbours(&SeatId::new(2, 'D'));
        assert_eq!(before.unwrap().id, SeatId::new(2, 'C'));
        assert!(after.is_none());
    }

    #[test]
    fn test_occupy_and_release() {
        let mut inventory = Inventory::initialize(&small_layout()).unwrap();
        let seat = SeatId::new(3, 'A');

        inventory.occupy(&seat, PassengerId(1)).unwrap();
        assert_eq!(
            inventory.occupy(&seat, PassengerId(2)),
            Err(InventoryError::SeatOccupied { seat, occupant: PassengerId(1) })
        );
        assert_eq!(inventory.release(&seat).unwrap(), Some(PassengerId(1)));
        assert!(inventory.seat(&seat).unwrap().is_open());

        assert_eq!(
            inventory.occupy(&SeatId::new(9, 'A'), PassengerId(1)),
            Err(InventoryError::SeatNotFound(SeatId::new(9, 'A')))
        );
    }

    #[test]
    fn test_mark_unavailable_is_seeded_and_bounded() {
        let mut first = Inventory::initialize(&small_layout()).unwrap();
        let mut second = Inventory::initialize(&small_layout()).unwrap();

        let a = first.mark_unavailable(5, &mut StdRng::seed_from_u64(7));
        let b = second.mark_unavailable(5, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(first.available_count(), first.len() - 5);

        let unavailable = first.seat(&a[0]).unwrap();
        assert!(!unavailable.available);
        assert_eq!(
            first.occupy(&a[0], PassengerId(1)),
            Err(InventoryError::SeatUnavailable(a[0]))
        );

        // Asking for more than remain only takes what is left.
        let rest = first.mark_unavailable(100, &mut StdRng::seed_from_u64(1));
        assert_eq!(rest.len(), first.len() - 5);
        assert_eq!(first.available_count(), 0);

        first.restore_availability();
        assert_eq!(first.available_count(), first.len());
    }

    #[test]
    fn test_utilization() {
        let mut inventory = Inventory::initialize(&small_layout()).unwrap();
        assert_eq!(inventory.utilization(), 0.0);
        inventory.occupy(&SeatId::new(1, 'A'), PassengerId(1)).unwrap();
        inventory.occupy(&SeatId::new(1, 'B'), PassengerId(2)).unwrap();
        assert!((inventory.utilization() - 0.1).abs() < 0.01);
    }
}
