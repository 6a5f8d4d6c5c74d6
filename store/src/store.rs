//! The application store
//!
//! [`AppStore`] wires the application reducer into the runtime with
//! persistence and the devtools log attached, and exposes one method per
//! slice operation. It is an explicitly constructed value: create one per
//! session and pass it (or clones of it) to whatever needs the state.
//!
//! # Example
//!
//! ```no_run
//! use vibes_store::{AppConfig, AppEnvironment, AppStore};
//! use vibes_store::slices::User;
//!
//! # async fn example() -> vibes_store::Result<()> {
//! let config = AppConfig::from_env()?;
//! let store = AppStore::open_file_backed(&config, AppEnvironment::production())?;
//!
//! store.login(User::new("u1", "Ada", "ada@example.com")).await?;
//! store.update_points(50).await?;
//! let points = store.state(|s| s.user.user.as_ref().map(|u| u.points)).await;
//! assert_eq!(points, Some(50));
//!
//! store.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use crate::cleanup::MaintenanceAction;
use crate::config::AppConfig;
use crate::devtools::ActionLog;
use crate::environment::AppEnvironment;
use crate::error;
use crate::file_storage::FileStorage;
use crate::persistence::{self, PersistenceMiddleware};
use crate::reducer::{app_reducer, AppReducer};
use crate::slices::{ChatAction, ChatMessage, ChatMode, Location, LocationAction, NewNotification};
use crate::slices::{Theme, UiAction, User, UserAction, UserPatch, Venue, VenueAction, VenuePatch};
use crate::state::{AppAction, AppState};
use std::sync::Arc;
use tokio::sync::broadcast;
use vibes_core::environment::Storage;
use vibes_runtime::{ActionTrace, Store, StoreError};

/// The generic runtime specialized to the application
pub type AppRuntime = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Application state store
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct AppStore {
    runtime: AppRuntime,
    log: ActionLog,
}

impl AppStore {
    /// Rehydrate from `storage` and persist every committed action to it
    ///
    /// If nothing usable is stored under `config.storage_key`, every slice
    /// starts from its default. The retention settings in `config` replace
    /// the environment's.
    #[must_use]
    pub fn open(
        config: &AppConfig,
        environment: AppEnvironment,
        storage: impl Storage + 'static,
    ) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let initial = persistence::rehydrate(
            storage.as_ref(),
            &config.storage_key,
            config.persisted_message_window,
        );
        let persistence = PersistenceMiddleware::new(
            storage,
            config.storage_key.clone(),
            config.persisted_message_window,
        );

        Self::build(config, environment, initial, Some(persistence))
    }

    /// [`open`](Self::open) with a [`FileStorage`] under `config.storage_dir`
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Storage`] if the directory cannot be created.
    pub fn open_file_backed(
        config: &AppConfig,
        environment: AppEnvironment,
    ) -> error::Result<Self> {
        let storage = FileStorage::open(&config.storage_dir)?;
        Ok(Self::open(config, environment, storage))
    }

    /// A store with default state and no persistence
    ///
    /// The retention settings in `config` replace the environment's.
    #[must_use]
    pub fn in_memory(config: &AppConfig, environment: AppEnvironment) -> Self {
        Self::build(config, environment, AppState::default(), None)
    }

    fn build(
        config: &AppConfig,
        environment: AppEnvironment,
        initial: AppState,
        persistence: Option<PersistenceMiddleware>,
    ) -> Self {
        let environment = environment.with_retention(config.retention());
        let log = ActionLog::new(config.trace_history, Arc::clone(&environment.clock));
        let mut runtime =
            Store::with_config(initial, app_reducer(), environment, config.store_config())
                .with_middleware(log.clone());
        if let Some(persistence) = persistence {
            runtime = runtime.with_middleware(persistence);
        }

        Self { runtime, log }
    }

    /// Apply an action and return its commit record
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown has begun.
    pub async fn dispatch(&self, action: impl Into<AppAction>) -> Result<ActionTrace, StoreError> {
        self.runtime.send(action.into()).await
    }

    async fn apply(&self, action: impl Into<AppAction>) -> Result<(), StoreError> {
        self.dispatch(action).await.map(drop)
    }

    /// Read state through a closure
    pub async fn state<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        self.runtime.state(f).await
    }

    /// A copy of the whole state
    pub async fn snapshot(&self) -> AppState {
        self.runtime.state(Clone::clone).await
    }

    /// Devtools history of committed actions
    #[must_use]
    pub const fn action_log(&self) -> &ActionLog {
        &self.log
    }

    /// Live feed of committed actions
    #[must_use]
    pub fn subscribe_traces(&self) -> broadcast::Receiver<ActionTrace> {
        self.runtime.subscribe_traces()
    }

    /// The injected environment
    #[must_use]
    pub fn environment(&self) -> &AppEnvironment {
        self.runtime.environment()
    }

    /// The underlying runtime
    #[must_use]
    pub const fn runtime(&self) -> &AppRuntime {
        &self.runtime
    }

    /// Whether shutdown has begun
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.runtime.is_shutting_down()
    }

    /// Stop accepting actions and wait for an in-flight one to commit
    ///
    /// After this returns `Ok`, the last snapshot has been written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if an action is still
    /// committing after the configured timeout.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        let timeout = self.runtime.config().default_shutdown_timeout;
        self.runtime.shutdown(timeout).await
    }
}

/// One method per slice operation
///
/// Each is a thin wrapper over [`AppStore::dispatch`] and fails only once
/// shutdown has begun.
#[allow(clippy::missing_errors_doc)]
impl AppStore {
    /// Sign in as `user`, replacing any current user
    pub async fn login(&self, user: User) -> Result<(), StoreError> {
        self.apply(UserAction::Login(user)).await
    }

    /// Sign out
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.apply(UserAction::Logout).await
    }

    /// Merge fields into the signed-in user
    pub async fn update_user(&self, patch: UserPatch) -> Result<(), StoreError> {
        self.apply(UserAction::UpdateUser(patch)).await
    }

    /// Set the signed-in user's points balance
    pub async fn update_points(&self, points: u64) -> Result<(), StoreError> {
        self.apply(UserAction::UpdatePoints(points)).await
    }

    /// Replace the venue catalog
    pub async fn set_venues(&self, venues: Vec<Venue>) -> Result<(), StoreError> {
        self.apply(VenueAction::SetVenues(venues)).await
    }

    /// Follow a venue (idempotent)
    pub async fn follow_venue(&self, venue: Venue) -> Result<(), StoreError> {
        self.apply(VenueAction::FollowVenue(venue)).await
    }

    /// Unfollow a venue by id
    pub async fn unfollow_venue(&self, id: impl Into<String>) -> Result<(), StoreError> {
        self.apply(VenueAction::UnfollowVenue(id.into())).await
    }

    /// Replace the venue in view
    pub async fn set_current_venue(&self, venue: Option<Venue>) -> Result<(), StoreError> {
        self.apply(VenueAction::SetCurrentVenue(venue)).await
    }

    /// Merge fields into every view of venue `id`
    pub async fn update_venue(
        &self,
        id: impl Into<String>,
        patch: VenuePatch,
    ) -> Result<(), StoreError> {
        self.apply(VenueAction::UpdateVenue { id: id.into(), patch }).await
    }

    /// Replace all known locations
    pub async fn set_locations(&self, locations: Vec<Location>) -> Result<(), StoreError> {
        self.apply(LocationAction::SetLocations(locations)).await
    }

    /// Replace nearby locations
    pub async fn set_nearby_locations(&self, locations: Vec<Location>) -> Result<(), StoreError> {
        self.apply(LocationAction::SetNearbyLocations(locations)).await
    }

    /// Replace the selected location
    pub async fn set_selected_location(
        &self,
        location: Option<Location>,
    ) -> Result<(), StoreError> {
        self.apply(LocationAction::SetSelectedLocation(location)).await
    }

    /// Replace search results
    pub async fn set_search_results(&self, locations: Vec<Location>) -> Result<(), StoreError> {
        self.apply(LocationAction::SetSearchResults(locations)).await
    }

    /// Set the location slice's loading flag
    pub async fn set_locations_loading(&self, loading: bool) -> Result<(), StoreError> {
        self.apply(LocationAction::SetLoading(loading)).await
    }

    /// Open or close the chat panel
    pub async fn set_chat_open(&self, open: bool) -> Result<(), StoreError> {
        self.apply(ChatAction::SetChatOpen(open)).await
    }

    /// Set the assistant typing flag
    pub async fn set_typing(&self, typing: bool) -> Result<(), StoreError> {
        self.apply(ChatAction::SetTyping(typing)).await
    }

    /// Set the request-in-flight flag
    pub async fn set_processing(&self, processing: bool) -> Result<(), StoreError> {
        self.apply(ChatAction::SetProcessing(processing)).await
    }

    /// Set the speech capture flag
    pub async fn set_listening(&self, listening: bool) -> Result<(), StoreError> {
        self.apply(ChatAction::SetListening(listening)).await
    }

    /// Replace the speech-to-text buffer
    pub async fn set_transcript(&self, transcript: impl Into<String>) -> Result<(), StoreError> {
        self.apply(ChatAction::SetTranscript(transcript.into())).await
    }

    /// Switch conversation context
    pub async fn set_chat_mode(&self, mode: ChatMode) -> Result<(), StoreError> {
        self.apply(ChatAction::SetChatMode(mode)).await
    }

    /// Replace chat history
    pub async fn set_messages(&self, messages: Vec<ChatMessage>) -> Result<(), StoreError> {
        self.apply(ChatAction::SetMessages(messages)).await
    }

    /// Append to chat history
    pub async fn add_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        self.apply(ChatAction::AddMessage(message)).await
    }

    /// Empty chat history
    pub async fn clear_messages(&self) -> Result<(), StoreError> {
        self.apply(ChatAction::ClearMessages).await
    }

    /// Set the global loading flag
    pub async fn set_loading(&self, loading: bool) -> Result<(), StoreError> {
        self.apply(UiAction::SetLoading(loading)).await
    }

    /// Expand or collapse the sidebar
    pub async fn set_sidebar_open(&self, open: bool) -> Result<(), StoreError> {
        self.apply(UiAction::SetSidebarOpen(open)).await
    }

    /// Change the color scheme
    pub async fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.apply(UiAction::SetTheme(theme)).await
    }

    /// Queue a notification
    pub async fn add_notification(&self, notification: NewNotification) -> Result<(), StoreError> {
        self.apply(UiAction::AddNotification(notification)).await
    }

    /// Remove a notification by id
    pub async fn remove_notification(&self, id: impl Into<String>) -> Result<(), StoreError> {
        self.apply(UiAction::RemoveNotification(id.into())).await
    }

    /// Empty the notification queue
    pub async fn clear_notifications(&self) -> Result<(), StoreError> {
        self.apply(UiAction::ClearNotifications).await
    }

    /// Run the cleanup sweep once
    pub async fn sweep(&self) -> Result<(), StoreError> {
        self.apply(MaintenanceAction::Sweep).await
    }
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("log", &self.log)
            .field("shutting_down", &self.is_shutting_down())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::slices::{test_env, MessageRole};
    use vibes_testing::{test_epoch, InMemoryStorage, ManualClock, SequentialIds};

    #[tokio::test]
    async fn every_commit_is_logged_and_persisted_once_changed() {
        let storage = InMemoryStorage::new();
        let store = AppStore::open(&AppConfig::default(), test_env(), storage.clone());

        store.set_theme(Theme::Dark).await.unwrap();
        store.set_loading(true).await.unwrap();
        store.set_transcript("rooftop").await.unwrap();

        assert_eq!(
            store.action_log().names(),
            vec!["ui/setTheme", "ui/setLoading", "chat/setTranscript"]
        );
        assert_eq!(storage.write_count(), 1);
        assert!(storage.raw("venue-vibes-store").unwrap().contains("\"currentTheme\":\"dark\""));
    }

    #[tokio::test]
    async fn sweep_uses_retention_from_config() {
        let clock = ManualClock::new(test_epoch());
        let env = AppEnvironment::new(Arc::new(clock.clone()), Arc::new(SequentialIds::new()));
        let config = AppConfig {
            notification_max_age: std::time::Duration::from_secs(60),
            cleanup_message_window: 5,
            ..AppConfig::default()
        };
        let store = AppStore::in_memory(&config, env);

        store.add_notification(NewNotification::info("T", "M")).await.unwrap();
        for n in 0..10 {
            let id = format!("m{n}");
            let message = ChatMessage::new(id, MessageRole::User, "hi", test_epoch());
            store.add_message(message).await.unwrap();
        }
        clock.advance(chrono::Duration::minutes(10));
        store.sweep().await.unwrap();

        let (notifications, messages) =
            store.state(|s| (s.ui.notifications.len(), s.chat.messages.len())).await;
        assert_eq!(notifications, 0);
        assert_eq!(messages, 5);
    }

    #[tokio::test]
    async fn in_memory_store_writes_nothing() {
        let store = AppStore::in_memory(&AppConfig::default(), test_env());
        store.set_sidebar_open(true).await.unwrap();
        assert!(store.state(|s| s.ui.is_sidebar_open).await);
        assert_eq!(store.action_log().len(), 1);
    }

    #[tokio::test]
    async fn rejects_actions_after_shutdown() {
        let store = AppStore::in_memory(&AppConfig::default(), test_env());
        store.shutdown().await.unwrap();

        let result = store.logout().await;

        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert!(store.action_log().is_empty());
    }

    #[tokio::test]
    async fn file_backed_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let store = AppStore::open_file_backed(&config, test_env()).unwrap();
        store.login(User::new("u1", "A", "a@x.com")).await.unwrap();
        store.shutdown().await.unwrap();

        let reopened = AppStore::open_file_backed(&config, test_env()).unwrap();
        assert!(reopened.state(|s| s.user.is_authenticated).await);
    }
}
