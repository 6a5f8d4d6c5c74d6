//! Dependencies injected into the application reducer

use std::sync::Arc;
use vibes_core::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};

/// Limits applied by the periodic cleanup sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Chat history is trimmed to this many newest messages
    pub message_window: usize,
    /// Notifications at least this old are evicted
    pub notification_max_age: chrono::Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            message_window: 50,
            notification_max_age: chrono::Duration::hours(1),
        }
    }
}

/// Environment shared by every slice reducer
///
/// Cheap to clone; the clock and id generator are shared.
#[derive(Clone)]
pub struct AppEnvironment {
    /// Source of timestamps (notifications, sweep age checks)
    pub clock: Arc<dyn Clock>,
    /// Source of notification ids
    pub ids: Arc<dyn IdGenerator>,
    /// Cleanup sweep limits
    pub retention: RetentionPolicy,
}

impl AppEnvironment {
    /// Create an environment with the default retention policy
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            clock,
            ids,
            retention: RetentionPolicy::default(),
        }
    }

    /// Wall clock and random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    /// Override the retention policy
    #[must_use]
    pub const fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}
