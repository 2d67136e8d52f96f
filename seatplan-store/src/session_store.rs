use parking_lot::Mutex;
use seatplan_core::{AllocationSession, CoreResult, SessionSettings};
use std::sync::Arc;
use tracing::info;

/// Shared handle to the one allocation session.
///
/// Every operation runs under a single lock so readers never observe a
/// half-applied allocation or override.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<AllocationSession>>,
}

impl SessionStore {
    pub fn new(session: AllocationSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn from_settings(settings: SessionSettings) -> CoreResult<Self> {
        let session = AllocationSession::new(settings)?;
        info!("Session store ready with {} seats", session.inventory().len());
        Ok(Self::new(session))
    }

    pub fn read<R>(&self, f: impl FnOnce(&AllocationSession) -> R) -> R {
        let session = self.inner.lock();
        f(&session)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut AllocationSession) -> R) -> R {
        let mut session = self.inner.lock();
        let result = f(&mut session);
        debug_assert!(
            session.check_consistency().is_ok(),
            "Invariant violated after write: {:?}",
            session.check_consistency()
        );
        result
    }
}
