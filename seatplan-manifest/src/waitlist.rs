use seatplan_shared::PassengerId;

/// Passengers who could not be seated, in the order they were turned away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitingList {
    entries: Vec<PassengerId>,
}

impl WaitingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a passenger. Returns `false` if they were already waiting.
    pub fn push(&mut self, id: PassengerId) -> bool {
        if self.entries.contains(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Returns `true` if the passenger was waiting.
    pub fn remove(&mut self, id: PassengerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: PassengerId) -> bool {
        self.entries.contains(&id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = PassengerId> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<PassengerId> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_idempotent_and_ordered() {
        let mut list = WaitingList::new();
        assert!(list.push(PassengerId(3)));
        assert!(list.push(PassengerId(1)));
        assert!(!list.push(PassengerId(3)));

        assert_eq!(list.to_vec(), vec![PassengerId(3), PassengerId(1)]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut list = WaitingList::new();
        list.push(PassengerId(1));
        list.push(PassengerId(2));

        assert!(list.remove(PassengerId(1)));
        assert!(!list.remove(PassengerId(1)));
        assert!(!list.contains(PassengerId(1)));
        assert!(list.contains(PassengerId(2)));

        list.clear();
        assert!(list.is_empty());
    }
}
