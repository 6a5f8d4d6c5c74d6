//! # Vibes Core
//!
//! Core traits and types for the Venue Vibes application state store.
//!
//! The store is built from small, independently testable slices. Each slice is
//! a reducer over its own state; slices are scoped into one application state
//! and combined into a single reducer that the runtime drives.
//!
//! ## Core Concepts
//!
//! - **State**: Plain owned data for a slice (user, venues, chat, ...)
//! - **Action**: Every input that can change state, named for tracing
//! - **Reducer**: `(State, Action, Environment) → State`, applied in place
//! - **Environment**: Injected dependencies (clock, id generator, storage)
//!
//! ## Example
//!
//! ```
//! use vibes_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct SidebarState {
//!     open: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum SidebarAction {
//!     SetOpen(bool),
//! }
//!
//! struct SidebarReducer;
//!
//! impl Reducer for SidebarReducer {
//!     type State = SidebarState;
//!     type Action = SidebarAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut SidebarState, action: SidebarAction, _env: &()) {
//!         match action {
//!             SidebarAction::SetOpen(open) => state.open = open,
//!         }
//!     }
//! }
//!
//! let mut state = SidebarState::default();
//! SidebarReducer.reduce(&mut state, SidebarAction::SetOpen(true), &());
//! assert!(state.open);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Reducer composition (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Action module - naming support for dispatched actions
///
/// Every action flowing through the runtime is attributed to its slice and
/// operation (`"user/login"`, `"venue/follow"`) so that traces and logs can
/// identify where a transition came from.
pub mod action {
    /// Stable, human-readable name of an action
    ///
    /// Names follow the `"<slice>/<operation>"` convention.
    ///
    /// # Example
    ///
    /// ```
    /// use vibes_core::action::ActionName;
    ///
    /// enum ThemeAction {
    ///     SetTheme(String),
    /// }
    ///
    /// impl ActionName for ThemeAction {
    ///     fn name(&self) -> &'static str {
    ///         match self {
    ///             Self::SetTheme(_) => "ui/setTheme",
    ///         }
    ///     }
    /// }
    ///
    /// assert_eq!(ThemeAction::SetTheme("dark".into()).name(), "ui/setTheme");
    /// ```
    pub trait ActionName {
        /// The `"<slice>/<operation>"` name of this action
        fn name(&self) -> &'static str;
    }

    impl ActionName for () {
        fn name(&self) -> &'static str {
            "unit"
        }
    }
}

/// Reducer module - the core trait for state transitions
///
/// Reducers are total functions over their state: a missing precondition is
/// a no-op, never an error.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Apply an action to `state` in place
        ///
        /// Never suspends and never fails. All field changes made by one
        /// call are observed together: the runtime holds the state lock for
        /// the whole call.
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies of the store (time, id generation, durable
/// storage) sit behind these traits so tests can substitute deterministic
/// implementations.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Generator of unique identifiers (notification ids, message ids)
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier, distinct from every earlier one
        fn next_id(&self) -> String;
    }

    /// Random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            uuid::Uuid::new_v4().to_string()
        }
    }

    /// Errors raised by a [`Storage`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Underlying I/O failed
        #[error("storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// Backend-specific failure
        #[error("storage backend error: {0}")]
        Backend(String),
    }

    /// Durable key-value storage for serialized snapshots
    ///
    /// Writes are whole-value and last-write-wins.
    pub trait Storage: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Replace the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Delete the value stored under `key`, if any
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}

#[cfg(test)]
mod tests {
    use super::action::ActionName;
    use super::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};

    #[test]
    fn uuid_generator_is_unique() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }

    #[test]
    fn unit_action_has_a_name() {
        assert_eq!(().name(), "unit");
    }
}
