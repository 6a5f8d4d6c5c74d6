//! Error types for the application store

use crate::config::ConfigError;
use crate::persistence::PersistError;
use thiserror::Error;
use vibes_core::environment::StorageError;
use vibes_runtime::StoreError;

/// Result type alias for store setup and lifecycle operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Any error the application store can surface
///
/// Slice actions never produce errors; these come from setup (config,
/// storage) and lifecycle (shutdown).
#[derive(Error, Debug)]
pub enum AppError {
    /// The store refused an action or failed to shut down in time
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Durable storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A snapshot could not be written or read
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Configuration was invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
