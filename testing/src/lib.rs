//! # Vibes Testing
//!
//! Testing utilities and helpers for the Venue Vibes state store.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//!   ([`FixedClock`], [`ManualClock`], [`SequentialIds`])
//! - [`InMemoryStorage`] for persistence tests
//! - [`ReducerTest`], a Given-When-Then harness for slice reducers
//!
//! ## Example
//!
//! ```ignore
//! use vibes_testing::{test_clock, InMemoryStorage, SequentialIds};
//!
//! #[tokio::test]
//! async fn login_is_persisted() {
//!     let storage = InMemoryStorage::new();
//!     let env = env(test_clock(), SequentialIds::new());
//!     let store = AppStore::open(config, env, storage.clone());
//!     store.login(user()).await.unwrap();
//!     assert!(storage.raw("venue-vibes-store").is_some());
//! }
//! ```

use chrono::{DateTime, Utc};
use vibes_core::environment::{Clock, IdGenerator};

/// Reducer Given-When-Then harness
pub mod reducer_test;

/// In-memory storage backend
pub mod storage_mocks;

/// Deterministic implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use vibes_testing::mocks::FixedClock;
    /// use vibes_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// The instant every [`test_clock`] reports: 2025-01-01 00:00:00 UTC
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp is a valid constant.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// Clock that only moves when the test moves it
    ///
    /// Clones share the same time, so a test can keep one clone and hand
    /// another to the environment.
    ///
    /// # Example
    ///
    /// ```
    /// use vibes_testing::{ManualClock, test_epoch};
    /// use vibes_core::environment::Clock;
    ///
    /// let clock = ManualClock::new(test_epoch());
    /// clock.advance(chrono::Duration::hours(2));
    /// assert_eq!(clock.now() - test_epoch(), chrono::Duration::hours(2));
    /// ```
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }

        /// Jump the clock to `time`
        pub fn set(&self, time: DateTime<Utc>) {
            if let Ok(mut current) = self.time.lock() {
                *current = time;
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Predictable ids: `"<prefix>-1"`, `"<prefix>-2"`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use vibes_testing::SequentialIds;
    /// use vibes_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIds::new();
    /// assert_eq!(ids.next_id(), "id-1");
    /// assert_eq!(ids.next_id(), "id-2");
    /// ```
    #[derive(Debug, Clone)]
    pub struct SequentialIds {
        prefix: String,
        next: Arc<AtomicU64>,
    }

    impl SequentialIds {
        /// Ids prefixed with `"id"`
        #[must_use]
        pub fn new() -> Self {
            Self::with_prefix("id")
        }

        /// Ids with a custom prefix
        #[must_use]
        pub fn with_prefix(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: Arc::new(AtomicU64::new(1)),
            }
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, SequentialIds, test_clock, test_epoch};
pub use reducer_test::ReducerTest;
pub use storage_mocks::InMemoryStorage;
