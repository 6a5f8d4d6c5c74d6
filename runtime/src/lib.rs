//! # Vibes Runtime
//!
//! Runtime implementation for the Venue Vibes state store.
//!
//! This crate provides the Store runtime that owns the state and applies
//! actions to it one at a time.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state and applies each action as one atomic transition
//! - **Middleware**: Post-commit hooks (persistence, devtools logging)
//! - **Action traces**: Named record of every committed action, broadcast to
//!   observers
//!
//! ## Example
//!
//! ```ignore
//! use vibes_runtime::Store;
//!
//! let store = Store::new(initial_state, app_reducer, environment);
//!
//! // Send an action
//! store.send(AppAction::User(UserAction::Logout)).await?;
//!
//! // Read state
//! let signed_in = store.state(|s| s.user.is_authenticated).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use vibes_core::{action::ActionName, reducer::Reducer};

/// Post-commit hooks
pub mod middleware;

pub use middleware::Middleware;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers never fail; the only way a dispatch is refused is shutdown.
    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for an in-flight action to commit
        #[error("Shutdown timed out waiting for an in-flight action")]
        ShutdownTimeout,
    }
}

pub use error::StoreError;

/// Record of one committed action, for devtools and debugging
///
/// `sequence` starts at 1 and increases by one per committed action on a
/// given store (clones share the counter).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ActionTrace {
    /// Position of this action in commit order
    pub sequence: u64,
    /// `"<slice>/<operation>"` name of the action
    pub name: &'static str,
    /// When the action was committed
    pub at: chrono::DateTime<chrono::Utc>,
}

/// Configuration for Store instances
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of traces buffered for slow observers
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the trace broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            default_shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Store runtime for coordinating reducer execution.
pub mod store {
    use super::{
        ActionName, ActionTrace, Arc, AtomicBool, AtomicU64, Duration, Middleware, Ordering,
        Reducer, RwLock, StoreConfig, StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; every action is one write-locked transition)
    /// 2. Reducer (the state transition logic)
    /// 3. Environment (injected dependencies)
    /// 4. Middleware (post-commit hooks, run under the same lock)
    /// 5. Trace broadcast (one [`ActionTrace`] per commit)
    ///
    /// Cloning a Store yields another handle to the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        middleware: Vec<Arc<dyn Middleware<S, A>>>,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        sequence: Arc<AtomicU64>,
        traces: broadcast::Sender<ActionTrace>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: ActionName + Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (traces, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                middleware: Vec::new(),
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                sequence: Arc::new(AtomicU64::new(0)),
                traces,
            }
        }

        /// Register a middleware
        ///
        /// Middleware run in registration order after every committed action.
        /// Register all middleware before cloning the store; clones made
        /// earlier do not see later registrations.
        #[must_use]
        pub fn with_middleware(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
            self.middleware.push(Arc::new(middleware));
            self
        }

        /// The store's configuration
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Whether `shutdown` has been initiated
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Subscribe to the trace of committed actions
        ///
        /// Only actions committed after subscribing are delivered. Slow
        /// observers that fall more than `broadcast_capacity` traces behind
        /// receive `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_traces(&self) -> broadcast::Receiver<ActionTrace> {
            self.traces.subscribe()
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Waits for an action already holding the state lock to commit,
        ///    including its middleware
        ///
        /// Once this returns `Ok`, no further action will commit.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the in-flight action
        /// does not finish within `timeout`.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            if tokio::time::timeout(timeout, self.state.write()).await.is_err() {
                tracing::error!(?timeout, "Shutdown timeout: an action is still committing");
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout);
            }

            tracing::info!("In-flight actions drained, shutdown successful");
            metrics::counter!("store.shutdown.completed").increment(1);
            Ok(())
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Runs every middleware against the new state
        /// 4. Publishes an [`ActionTrace`] and returns it
        ///
        /// Readers never observe a partially applied action. Concurrent
        /// `send()` calls serialize on the lock.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip_all, fields(action = action.name()), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<ActionTrace, StoreError> {
            if self.is_shutting_down() {
                return Err(self.reject());
            }

            let name = action.name();
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            // Shutdown may have begun while this send waited for the lock.
            if self.is_shutting_down() {
                return Err(self.reject());
            }

            metrics::counter!("store.actions.total", "action" => name).increment(1);
            let observed = (!self.middleware.is_empty()).then(|| action.clone());

            let start = std::time::Instant::now();
            self.reducer.reduce(&mut *state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            if let Some(action) = observed {
                for middleware in &self.middleware {
                    middleware.after_reduce(&action, &state);
                }
            }

            let trace = ActionTrace {
                sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
                name,
                at: chrono::Utc::now(),
            };
            let _ = self.traces.send(trace.clone());

            Ok(trace)
        }

        fn reject(&self) -> StoreError {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            StoreError::ShutdownInProgress
        }

        /// Read current state via a closure
        ///
        /// The read lock is held only for the duration of `f`; return owned
        /// copies out of it.
        ///
        /// ```ignore
        /// let followed = store.state(|s| s.venues.followed_venues.clone()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                middleware: self.middleware.clone(),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                sequence: Arc::clone(&self.sequence),
                traces: self.traces.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc;

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
    }

    impl ActionName for TestAction {
        fn name(&self) -> &'static str {
            match self {
                Self::Increment => "test/increment",
                Self::Decrement => "test/decrement",
                Self::NoOp => "test/noOp",
            }
        }
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
            match action {
                TestAction::Increment => state.value += 1,
                TestAction::Decrement => state.value -= 1,
                TestAction::NoOp => {},
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    /// Store whose middleware signals on entry, then holds the lock for `hold`
    fn slow_store(
        hold: Duration,
    ) -> (Store<TestState, TestAction, TestEnv, TestReducer>, mpsc::Receiver<()>, Arc<AtomicBool>) {
        let (entered, entered_rx) = mpsc::channel();
        let finished = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&finished);

        let store = store().with_middleware(move |_: &TestAction, _: &TestState| {
            let _ = entered.send(());
            std::thread::sleep(hold);
            done.store(true, Ordering::SeqCst);
        });
        (store, entered_rx, finished)
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;
        let _ = store.send(TestAction::NoOp).await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_concurrent_sends() {
        let store = store();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::Increment).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        assert_eq!(store.state(|s| s.value).await, 10);
    }

    #[tokio::test]
    async fn test_middleware_sees_committed_state_in_order() -> Result<(), StoreError> {
        let seen: Arc<Mutex<Vec<(&'static str, i32)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let store = store().with_middleware(move |action: &TestAction, state: &TestState| {
            if let Ok(mut seen) = sink.lock() {
                seen.push((action.name(), state.value));
            }
        });

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;

        let seen = seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(
            seen,
            vec![
                ("test/increment", 1),
                ("test/increment", 2),
                ("test/decrement", 1),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_traces_are_named_and_sequenced() -> Result<(), StoreError> {
        let store = store();
        let mut traces = store.subscribe_traces();

        let returned = store.send(TestAction::Increment).await?;
        store.send(TestAction::NoOp).await?;

        let first = traces.recv().await;
        let second = traces.recv().await;
        assert_eq!(returned.sequence, 1);
        assert!(matches!(first, Ok(ActionTrace { sequence: 1, name: "test/increment", .. })));
        assert!(matches!(second, Ok(ActionTrace { sequence: 2, name: "test/noOp", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = store();

        store.shutdown(Duration::from_secs(1)).await?;
        assert!(store.is_shutting_down());

        let result = store.send(TestAction::Increment).await;
        assert_eq!(result, Err(StoreError::ShutdownInProgress));
        assert_eq!(store.state(|s| s.value).await, 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_waits_for_in_flight_commit() -> Result<(), StoreError> {
        let (store, entered, finished) = slow_store(Duration::from_millis(50));

        let sender = store.clone();
        let in_flight = tokio::spawn(async move { sender.send(TestAction::Increment).await });
        let _ = tokio::task::spawn_blocking(move || entered.recv()).await;

        store.shutdown(Duration::from_secs(5)).await?;

        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(store.state(|s| s.value).await, 1);
        assert!(matches!(in_flight.await, Ok(Ok(_))));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_times_out_on_stuck_commit() {
        let (store, entered, _finished) = slow_store(Duration::from_millis(300));

        let sender = store.clone();
        let in_flight = tokio::spawn(async move { sender.send(TestAction::Increment).await });
        let _ = tokio::task::spawn_blocking(move || entered.recv()).await;

        let result = store.shutdown(Duration::from_millis(10)).await;

        assert_eq!(result, Err(StoreError::ShutdownTimeout));
        let _ = in_flight.await;
    }
}
