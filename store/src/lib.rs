//! # Vibes Store
//!
//! Client-side application state for Venue Vibes: the signed-in user,
//! venues, map locations, the assistant chat, and UI flags with a
//! notification queue.
//!
//! ## Architecture
//!
//! - **Slices** ([`slices`]): one reducer per concern, each over its own
//!   state and actions. Every slice operation is a total function: a
//!   missing precondition is a no-op, never an error.
//! - **Composition** ([`reducer`]): slices are scoped into [`AppState`] and
//!   combined into one reducer; every action is one atomic transition.
//! - **Persistence** ([`persistence`]): a whitelisted projection is written
//!   after each commit and read back at startup.
//! - **Devtools** ([`devtools`]): every commit is named (`"user/login"`)
//!   and recorded.
//! - **Maintenance** ([`cleanup`], [`migration`]): periodic trimming and
//!   one-shot import of legacy state.
//!
//! ## Example
//!
//! ```no_run
//! use vibes_store::{AppConfig, AppEnvironment, AppStore};
//! use vibes_store::slices::{NewNotification, Venue};
//! use vibes_testing::InMemoryStorage;
//!
//! # async fn example() -> vibes_store::Result<()> {
//! let config = AppConfig::default();
//! let store = AppStore::open(&config, AppEnvironment::production(), InMemoryStorage::new());
//!
//! store.follow_venue(Venue::new("v1", "Cafe", "1 Main", "cafe", 4.2)).await?;
//! store.add_notification(NewNotification::info("Following", "Cafe")).await?;
//!
//! assert_eq!(store.state(|s| s.venues.followed_venues.len()).await, 1);
//! # Ok(())
//! # }
//! ```

pub mod bounded;
pub mod cleanup;
pub mod config;
pub mod devtools;
pub mod environment;
pub mod error;
pub mod file_storage;
pub mod migration;
pub mod persistence;
pub mod reducer;
pub mod selectors;
pub mod slices;
pub mod state;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use environment::{AppEnvironment, RetentionPolicy};
pub use error::{AppError, Result};
pub use state::{AppAction, AppState};
pub use store::AppStore;
