use crate::models::{
    Group, Membership, NewGroup, NewPassenger, Passenger, GROUP_MEMBER_AGE, MAX_AGE,
    MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
use crate::waitlist::WaitingList;
use seatplan_catalog::{Inventory, InventoryError};
use seatplan_shared::{GroupId, Masked, PassengerId, SeatId};
use std::collections::BTreeMap;
use tracing::debug;

/// Tracks every passenger and group and their current assignment
#[derive(Debug, Clone)]
pub struct DemandRegistry {
    passengers: BTreeMap<PassengerId, Passenger>,
    groups: BTreeMap<GroupId, Group>,
    next_passenger: u32,
    next_group: u32,
}

impl DemandRegistry {
    pub fn new() -> Self {
        Self {
            passengers: BTreeMap::new(),
            groups: BTreeMap::new(),
            next_passenger: 1,
            next_group: 1,
        }
    }

    /// Register a solo passenger, unassigned.
    pub fn add_solo(&mut self, request: NewPassenger) -> Result<PassengerId, RegistryError> {
        let name = validate_name(&request.name)?;
        if request.age > MAX_AGE {
            return Err(RegistryError::Validation(format!(
                "age {} is above the maximum of {}",
                request.age, MAX_AGE
            )));
        }

        let id = self.allocate_passenger_id();
        self.passengers.insert(
            id,
            Passenger {
                id,
                name: Masked::new(name),
                age: request.age,
                membership: Membership::Solo,
                flags: request.flags,
                assigned_seat: None,
            },
        );

        debug!("Registered solo passenger {}", id);
        Ok(id)
    }

    /// Register a group and all of its members in one step.
    ///
    /// Nothing is created when validation fails.
    pub fn add_group(&mut self, request: NewGroup) -> Result<GroupId, RegistryError> {
        let name = validate_name(&request.name)?;
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&request.size) {
            return Err(RegistryError::Validation(format!(
                "group size {} is outside {}-{}",
                request.size, MIN_GROUP_SIZE, MAX_GROUP_SIZE
            )));
        }

        let group_id = GroupId(self.next_group);
        self.next_group += 1;

        let member_flags = request.flags.member_flags();
        let mut members = Vec::with_capacity(request.size);
        for n in 1..=request.size {
            let id = self.allocate_passenger_id();
            self.passengers.insert(
                id,
                Passenger {
                    id,
                    name: Masked::new(format!("{} #{}", name, n)),
                    age: GROUP_MEMBER_AGE,
                    membership: Membership::GroupMember(group_id),
                    flags: member_flags,
                    assigned_seat: None,
                },
            );
            members.push(id);
        }

        self.groups.insert(
            group_id,
            Group {
                id: group_id,
                name: Masked::new(name),
                size: request.size,
                flags: request.flags,
                members,
            },
        );

        debug!("Registered group {} with {} members", group_id, request.size);
        Ok(group_id)
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(&id)
    }

    /// Passengers in registration order.
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.values()
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// The group a passenger belongs to, if any.
    pub fn group_of(&self, passenger: &Passenger) -> Option<&Group> {
        passenger.group_id().and_then(|id| self.groups.get(&id))
    }

    /// Members of a group that do not hold a seat, in member order.
    pub fn unassigned_members(&self, id: GroupId) -> Vec<PassengerId> {
        self.groups
            .get(&id)
            .map(|group| {
                group
                    .members
                    .iter()
                    .filter(|member| {
                        self.passengers
                            .get(member)
                            .is_some_and(|p| !p.is_assigned())
                    })
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Record a passenger's seat, returning the previous one.
    ///
    /// Only the passenger side is touched; callers keep the inventory in step.
    pub fn set_assignment(
        &mut self,
        id: PassengerId,
        seat: Option<SeatId>,
    ) -> Result<Option<SeatId>, RegistryError> {
        let passenger = self
            .passengers
            .get_mut(&id)
            .ok_or(RegistryError::PassengerNotFound(id))?;
        Ok(std::mem::replace(&mut passenger.assigned_seat, seat))
    }

    pub fn clear_assignments(&mut self) {
        for passenger in self.passengers.values_mut() {
            passenger.assigned_seat = None;
        }
    }

    /// Delete a passenger, releasing their seat and waiting-list entry and
    /// detaching them from their group. An emptied group is deleted.
    pub fn remove(
        &mut self,
        id: PassengerId,
        inventory: &mut Inventory,
        waiting_list: &mut WaitingList,
    ) -> Result<Passenger, RegistryError> {
        let seat = self
            .passengers
            .get(&id)
            .ok_or(RegistryError::PassengerNotFound(id))?
            .assigned_seat;

        if let Some(seat) = seat {
            inventory.release(&seat)?;
        }
        waiting_list.remove(id);

        let passenger = self
            .passengers
            .remove(&id)
            .ok_or(RegistryError::PassengerNotFound(id))?;

        if let Some(group_id) = passenger.group_id() {
            let emptied = match self.groups.get_mut(&group_id) {
                Some(group) => {
                    group.members.retain(|member| *member != id);
                    group.members.is_empty()
                }
                None => false,
            };
            if emptied {
                self.groups.remove(&group_id);
                debug!("Group {} deleted after its last member left", group_id);
            }
        }

        Ok(passenger)
    }

    /// Drop every passenger and group and restart id allocation.
    pub fn clear(&mut self) {
        self.passengers.clear();
        self.groups.clear();
        self.next_passenger = 1;
        self.next_group = 1;
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn allocate_passenger_id(&mut self) -> PassengerId {
        let id = PassengerId(self.next_passenger);
        self.next_passenger += 1;
        id
    }
}

impl Default for DemandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<String, RegistryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistryError::Validation("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Passenger not found: {0}")]
    PassengerNotFound(PassengerId),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
