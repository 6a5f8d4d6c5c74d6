//! In-process action history for debugging
//!
//! [`ActionLog`] is a middleware that records the name of every committed
//! action in a bounded ring. It is diagnostic only and never feeds back
//! into state. For a live feed use `AppStore::subscribe_traces`.

use crate::bounded::BoundedList;
use crate::state::{AppAction, AppState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vibes_core::action::ActionName;
use vibes_core::environment::Clock;
use vibes_runtime::{ActionTrace, Middleware};

/// Upper bound on the history an [`ActionLog`] can be configured to keep
pub const MAX_TRACE_HISTORY: usize = 1000;

type History = BoundedList<ActionTrace, MAX_TRACE_HISTORY>;

/// Bounded history of committed actions
///
/// Clones share the same history: register one clone as middleware and
/// keep another to inspect.
#[derive(Clone)]
pub struct ActionLog {
    entries: Arc<Mutex<History>>,
    sequence: Arc<AtomicU64>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ActionLog {
    /// Keep the newest `capacity` entries, timestamped by `clock`
    ///
    /// `capacity` is clamped to [`MAX_TRACE_HISTORY`].
    #[must_use]
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(History::new())),
            sequence: Arc::new(AtomicU64::new(0)),
            capacity: capacity.min(MAX_TRACE_HISTORY),
            clock,
        }
    }

    /// A panic while recording leaves the ring intact, so keep using it.
    fn history(&self) -> MutexGuard<'_, History> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one action
    pub fn record(&self, name: &'static str) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let trace = ActionTrace {
            sequence,
            name,
            at: self.clock.now(),
        };

        let mut entries = self.history();
        entries.push(trace);
        entries.keep_last(self.capacity);
    }

    /// Recorded entries, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<ActionTrace> {
        self.history().to_vec()
    }

    /// Names of recorded entries, oldest first
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.history().iter().map(|t| t.name).collect()
    }

    /// Number of entries held
    #[must_use]
    pub fn len(&self) -> usize {
        self.history().len()
    }

    /// Whether nothing has been recorded (or everything was cleared)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total actions seen, including those evicted from the ring
    #[must_use]
    pub fn total(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Forget all entries; the sequence keeps counting
    pub fn clear(&self) {
        self.history().clear();
    }

    /// Serialize the history as a JSON array
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries())
    }
}

impl Middleware<AppState, AppAction> for ActionLog {
    fn after_reduce(&self, action: &AppAction, _state: &AppState) {
        let name = action.name();
        tracing::debug!(action = name, "Action committed");
        self.record(name);
    }
}

impl std::fmt::Debug for ActionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionLog")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("total", &self.total())
            .finish_non_exhaustive()
    }
}
