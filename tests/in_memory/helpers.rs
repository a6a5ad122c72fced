//! Shared test helpers for in-memory integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use tasktrack::api::{LocalTracker, SharedTracker};
use tasktrack::consistency::services::UserDeletionService;
use tasktrack::mirror::{MirrorLog, MirrorPublisher, adapters::InMemoryMirrorLog};
use tasktrack::store::InMemoryStore;
use tasktrack::task::services::TaskLifecycleService;
use tasktrack::user::services::UserDirectoryService;

/// Clock that advances only when a test says so.
#[derive(Debug)]
pub struct StepClock {
    now: Mutex<DateTime<Utc>>,
}

impl StepClock {
    /// Starts at 2026-03-02 09:00:00 UTC.
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += delta;
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A tracker over a fresh in-memory store with handles for inspection.
pub struct TrackerHarness {
    pub tracker: SharedTracker,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<StepClock>,
    pub log: Arc<InMemoryMirrorLog>,
}

/// Wires the services around `store` and `log`.
pub fn build_tracker(
    store: Arc<InMemoryStore>,
    log: Arc<dyn MirrorLog>,
    clock: Arc<StepClock>,
) -> SharedTracker {
    let mirror = MirrorPublisher::new(log, clock.clone());
    Arc::new(LocalTracker::new(
        UserDirectoryService::new(store.clone(), mirror.clone(), clock.clone()),
        TaskLifecycleService::new(store.clone(), mirror.clone(), clock),
        UserDeletionService::new(store, mirror),
    ))
}

#[fixture]
pub fn harness() -> TrackerHarness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(StepClock::new());
    let log = Arc::new(InMemoryMirrorLog::new());
    TrackerHarness {
        tracker: build_tracker(store.clone(), log.clone(), clock.clone()),
        store,
        clock,
        log,
    }
}
