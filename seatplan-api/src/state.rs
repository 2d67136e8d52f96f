use seatplan_core::{AllocationSession, CoreResult};
use seatplan_shared::SeatEvent;
use seatplan_store::SessionStore;
use tokio::sync::broadcast;

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub events_tx: broadcast::Sender<SeatEvent>,
}

impl AppState {
    pub fn new(store: SessionStore, events_tx: broadcast::Sender<SeatEvent>) -> Self {
        Self { store, events_tx }
    }

    /// Run a session operation under the store lock and publish whatever
    /// events it recorded, in order, before the lock is released.
    pub fn mutate<R>(&self, op: impl FnOnce(&mut AllocationSession) -> CoreResult<R>) -> Result<R, AppError> {
        let result = self.store.write(|session| {
            let result = op(session);
            for event in session.drain_events() {
                // No subscribers is not an error
                let _ = self.events_tx.send(event);
            }
            result
        });
        Ok(result?)
    }

    pub fn read<R>(&self, view: impl FnOnce(&AllocationSession) -> R) -> R {
        self.store.read(view)
    }
}
