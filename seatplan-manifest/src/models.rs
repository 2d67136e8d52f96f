use seatplan_shared::{GroupId, Masked, PassengerId, SeatId};
use serde::{Deserialize, Serialize};

/// Passengers younger than this may not sit in the quiet zone.
pub const CHILD_AGE_LIMIT: u8 = 12;

/// Age recorded for group members created alongside their group.
pub const GROUP_MEMBER_AGE: u8 = 18;

pub const MAX_AGE: u8 = 120;

pub const MIN_GROUP_SIZE: usize = 2;
pub const MAX_GROUP_SIZE: usize = 7;

/// Whether a passenger travels alone or as part of a group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "groupId", rename_all = "snake_case")]
pub enum Membership {
    Solo,
    GroupMember(GroupId),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassengerFlags {
    pub is_vip: bool,
    pub needs_accessibility: bool,
    pub is_senior: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupFlags {
    pub has_children: bool,
    pub needs_accessibility: bool,
    pub is_vip: bool,
    pub has_senior_members: bool,
}

impl GroupFlags {
    /// Flags each member inherits from the group.
    pub fn member_flags(&self) -> PassengerFlags {
        PassengerFlags {
            is_vip: self.is_vip,
            needs_accessibility: self.needs_accessibility,
            is_senior: self.has_senior_members,
        }
    }
}

/// A single demand unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    pub name: Masked<String>,
    pub age: u8,
    pub membership: Membership,
    pub flags: PassengerFlags,
    pub assigned_seat: Option<SeatId>,
}

impl Passenger {
    pub fn is_solo(&self) -> bool {
        matches!(self.membership, Membership::Solo)
    }

    pub fn group_id(&self) -> Option<GroupId> {
        match self.membership {
            Membership::Solo => None,
            Membership::GroupMember(id) => Some(id),
        }
    }

    pub fn is_child(&self) -> bool {
        self.age < CHILD_AGE_LIMIT
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_seat.is_some()
    }
}

/// A party that prefers to sit together in one row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: Masked<String>,
    /// Size requested at creation. Cancellations shrink `members`, not this.
    pub size: usize,
    pub flags: GroupFlags,
    pub members: Vec<PassengerId>,
}

/// Input for registering a solo passenger
#[derive(Debug, Clone)]
pub struct NewPassenger {
    pub name: String,
    pub age: u8,
    pub flags: PassengerFlags,
}

impl NewPassenger {
    pub fn new(name: impl Into<String>, age: u8) -> Self {
        Self {
            name: name.into(),
            age,
            flags: PassengerFlags::default(),
        }
    }

    pub fn vip(mut self) -> Self {
        self.flags.is_vip = true;
        self
    }

    pub fn accessible(mut self) -> Self {
        self.flags.needs_accessibility = true;
        self
    }

    pub fn senior(mut self) -> Self {
        self.flags.is_senior = true;
        self
    }
}

/// Input for registering a group
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub size: usize,
    pub flags: GroupFlags,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            flags: GroupFlags::default(),
        }
    }

    pub fn vip(mut self) -> Self {
        self.flags.is_vip = true;
        self
    }

    pub fn with_children(mut self) -> Self {
        self.flags.has_children = true;
        self
    }

    pub fn accessible(mut self) -> Self {
        self.flags.needs_accessibility = true;
        self
    }

    pub fn with_seniors(mut self) -> Self {
        self.flags.has_senior_members = true;
        self
    }
}
