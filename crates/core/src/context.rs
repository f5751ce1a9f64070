//! Collaborators shared by every service.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::AuditRecorder;
use crate::clock::{Clock, IdGenerator, SystemClock, UuidV7Generator};
use crate::store::EntityStore;

/// Store, clock and id source, cloned into each service.
#[derive(Clone)]
pub struct ServiceContext {
    /// Persistence gateway.
    pub store: Arc<dyn EntityStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Identity source.
    pub ids: Arc<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a context from explicit collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn EntityStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { store, clock, ids }
    }

    /// Wall clock and UUID v7 ids over `store`.
    #[must_use]
    pub fn system(store: Arc<dyn EntityStore>) -> Self {
        Self::new(store, Arc::new(SystemClock), Arc::new(UuidV7Generator))
    }

    /// Current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A fresh typed id.
    #[must_use]
    pub fn next_id<T: From<Uuid>>(&self) -> T {
        T::from(self.ids.new_id())
    }

    /// Audit recorder over the same store and clock.
    #[must_use]
    pub fn audit(&self) -> AuditRecorder {
        AuditRecorder::new(self.clone())
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}
