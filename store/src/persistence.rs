//! Whitelist persistence
//!
//! After every committed action [`PersistenceMiddleware`] serializes a fixed
//! projection of the state ([`PersistedState`]) and writes it to storage
//! under one key. At startup [`rehydrate`] reads it back to seed the
//! initial state. Anything outside the projection (catalogs, locations,
//! loading flags, notifications) starts from its default on every launch.
//!
//! The stored value is a versioned JSON envelope:
//!
//! ```json
//! {"state": {"user": null, "isAuthenticated": false, ...}, "version": 1}
//! ```
//!
//! Writes are whole-snapshot and last-write-wins, and a snapshot identical
//! to the previous one is not written again. Failures on either side
//! never reach the dispatcher: writes are logged and counted, and reads
//! that cannot be used fall back to defaults.

use crate::slices::{ChatMessage, ChatMode, Theme, User, Venue};
use crate::state::{AppAction, AppState};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use vibes_core::environment::{Storage, StorageError};
use vibes_runtime::Middleware;

/// Version written into every envelope
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors encoding or decoding a snapshot
#[derive(Error, Debug)]
pub enum PersistError {
    /// The projection could not be serialized
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored text is not a valid envelope
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    /// The envelope was written by an incompatible version
    #[error("unsupported snapshot version {0} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u32),

    /// Storage could not be read or written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// UI fields that survive a restart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedUi {
    /// Color scheme
    pub current_theme: Theme,
    /// Sidebar expanded
    pub is_sidebar_open: bool,
}

/// Chat fields that survive a restart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedChat {
    /// Conversation context
    pub chat_mode: ChatMode,
    /// Newest messages, oldest first
    pub messages: Vec<ChatMessage>,
}

/// The whitelisted projection of [`AppState`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    /// Signed-in user
    pub user: Option<User>,
    /// Auth flag as written; recomputed from `user` on load
    pub is_authenticated: bool,
    /// Followed venues in follow order
    pub followed_venues: Vec<Venue>,
    /// Theme and sidebar
    pub ui: PersistedUi,
    /// Chat mode and recent history
    pub chat_state: PersistedChat,
}

impl PersistedState {
    /// Project `state`, keeping the newest `message_window` messages
    #[must_use]
    pub fn project(state: &AppState, message_window: usize) -> Self {
        Self {
            user: state.user.user.clone(),
            is_authenticated: state.user.is_authenticated,
            followed_venues: state.venues.followed_venues.clone(),
            ui: PersistedUi {
                current_theme: state.ui.current_theme,
                is_sidebar_open: state.ui.is_sidebar_open,
            },
            chat_state: PersistedChat {
                chat_mode: state.chat.chat_mode,
                messages: state.chat.messages.newest(message_window).cloned().collect(),
            },
        }
    }

    /// Seed a fresh [`AppState`] from this projection
    ///
    /// Restores the invariants a hand-edited or stale snapshot could break:
    /// the auth flag follows `user`, followed venues are unique by id and
    /// flagged, and at most `message_window` messages are kept.
    #[must_use]
    pub fn into_state(self, message_window: usize) -> AppState {
        let mut state = AppState::default();

        state.user.is_authenticated = self.user.is_some();
        state.user.user = self.user;

        for mut venue in self.followed_venues {
            if !state.venues.is_following(&venue.id) {
                venue.is_followed = true;
                state.venues.followed_venues.push(venue);
            }
        }

        state.ui.current_theme = self.ui.current_theme;
        state.ui.is_sidebar_open = self.ui.is_sidebar_open;

        let messages = self.chat_state.messages;
        let skip = messages.len().saturating_sub(message_window);
        state.chat.chat_mode = self.chat_state.chat_mode;
        state.chat.messages.replace(messages.into_iter().skip(skip));

        state
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    state: &'a PersistedState,
    version: u32,
}

#[derive(Deserialize)]
struct RawEnvelope {
    state: serde_json::Value,
    version: u32,
}

/// Serialize a projection into a versioned envelope
///
/// # Errors
///
/// Returns [`PersistError::Encode`] if serialization fails.
pub fn encode(state: &PersistedState) -> Result<String, PersistError> {
    serde_json::to_string(&Envelope {
        state,
        version: SNAPSHOT_VERSION,
    })
    .map_err(PersistError::Encode)
}

/// Parse a versioned envelope
///
/// # Errors
///
/// Returns [`PersistError::Decode`] for malformed JSON and
/// [`PersistError::UnsupportedVersion`] for any version other than
/// [`SNAPSHOT_VERSION`].
pub fn decode(raw: &str) -> Result<PersistedState, PersistError> {
    let envelope: RawEnvelope = serde_json::from_str(raw).map_err(PersistError::Decode)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(PersistError::UnsupportedVersion(envelope.version));
    }
    serde_json::from_value(envelope.state).map_err(PersistError::Decode)
}

/// Load the persisted projection under `key`
///
/// `Ok(None)` means nothing was stored.
///
/// # Errors
///
/// Returns [`PersistError`] if storage cannot be read or the snapshot
/// cannot be decoded.
pub fn load(storage: &dyn Storage, key: &str) -> Result<Option<PersistedState>, PersistError> {
    storage.get(key)?.map(|raw| decode(&raw)).transpose()
}

/// Build the initial state from storage, falling back to defaults
///
/// Never fails: a missing key, unreadable storage, corrupt JSON and an
/// unknown version all yield [`AppState::default()`].
#[must_use]
pub fn rehydrate(storage: &dyn Storage, key: &str, message_window: usize) -> AppState {
    match load(storage, key) {
        Ok(Some(persisted)) => {
            tracing::debug!(key, "Rehydrated persisted state");
            metrics::counter!("persist.rehydrate", "outcome" => "restored").increment(1);
            persisted.into_state(message_window)
        },
        Ok(None) => {
            tracing::debug!(key, "No persisted state, starting from defaults");
            metrics::counter!("persist.rehydrate", "outcome" => "empty").increment(1);
            AppState::default()
        },
        Err(error) => {
            let outcome = match &error {
                PersistError::Storage(_) => "unreadable",
                PersistError::UnsupportedVersion(_) => "unsupported_version",
                PersistError::Encode(_) | PersistError::Decode(_) => "corrupt",
            };
            tracing::warn!(key, %error, "Discarding persisted state, starting from defaults");
            metrics::counter!("persist.rehydrate", "outcome" => outcome).increment(1);
            AppState::default()
        },
    }
}

/// Writes the whitelisted projection after every committed action
///
/// The write runs inside the store's write lock, so its latency is paid by
/// every dispatch that changes the projection. With [`FileStorage`] that is
/// one file write and fsync. Commits that leave the projection unchanged
/// (typing, loading flags, catalogs) skip storage entirely.
///
/// [`FileStorage`]: crate::file_storage::FileStorage
pub struct PersistenceMiddleware {
    storage: Arc<dyn Storage>,
    key: String,
    message_window: usize,
    last_written: Mutex<Option<String>>,
}

impl PersistenceMiddleware {
    /// Persist under `key`, keeping the newest `message_window` messages
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>, message_window: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            message_window,
            last_written: Mutex::new(None),
        }
    }

    /// The storage key written to
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Project, encode and write `state`
    ///
    /// Returns `Ok(false)` without touching storage when the snapshot is the
    /// one last written successfully. A failed write is retried on the next
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or the storage write fails.
    pub fn write(&self, state: &AppState) -> Result<bool, PersistError> {
        let snapshot = encode(&PersistedState::project(state, self.message_window))?;
        let mut last = self.last_written.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_deref() == Some(snapshot.as_str()) {
            return Ok(false);
        }
        self.storage.set(&self.key, &snapshot)?;
        *last = Some(snapshot);
        Ok(true)
    }
}

impl Middleware<AppState, AppAction> for PersistenceMiddleware {
    fn after_reduce(&self, action: &AppAction, state: &AppState) {
        use vibes_core::action::ActionName;

        match self.write(state) {
            Ok(true) => {
                metrics::counter!("persist.writes").increment(1);
            },
            Ok(false) => {
                metrics::counter!("persist.unchanged").increment(1);
            },
            Err(error) => {
                tracing::warn!(
                    action = action.name(),
                    key = %self.key,
                    %error,
                    "Failed to persist state"
                );
                metrics::counter!("persist.failures").increment(1);
            },
        }
    }
}

impl std::fmt::Debug for PersistenceMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceMiddleware")
            .field("key", &self.key)
            .field("message_window", &self.message_window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::slices::{MessageRole, Subscription};
    use vibes_testing::{test_epoch, InMemoryStorage};

    const KEY: &str = "venue-vibes-store";

    fn message(n: usize) -> ChatMessage {
        ChatMessage::new(format!("m{n}"), MessageRole::User, format!("msg {n}"), test_epoch())
    }

    fn populated() -> AppState {
        let mut state = AppState::default();
        state.user.user = Some(User {
            points: 120,
            subscription: Subscription::Vip,
            ..User::new("u1", "A", "a@x.com")
        });
        state.user.is_authenticated = true;
        state.venues.venues = vec![Venue::new("v9", "Catalog", "9 Main", "bar", 3.0)];
        state.venues.followed_venues = vec![Venue {
            is_followed: true,
            ..Venue::new("v1", "Cafe", "1 Main", "cafe", 4.2)
        }];
        state.ui.current_theme = Theme::Dark;
        state.ui.is_sidebar_open = true;
        state.ui.is_loading = true;
        state.chat.chat_mode = ChatMode::Venues;
        state.chat.is_open = true;
        state.chat.messages.replace((0..70).map(message));
        state
    }

    #[test]
    fn round_trip_keeps_whitelist_only() {
        let original = populated();
        let raw = encode(&PersistedState::project(&original, 50)).unwrap();
        let restored = decode(&raw).unwrap().into_state(50);

        assert_eq!(restored.user, original.user);
        assert_eq!(restored.venues.followed_venues, original.venues.followed_venues);
        assert_eq!(restored.ui.current_theme, Theme::Dark);
        assert!(restored.ui.is_sidebar_open);
        assert_eq!(restored.chat.chat_mode, ChatMode::Venues);
        assert_eq!(
            restored.chat.messages.to_vec(),
            original.chat.messages.newest(50).cloned().collect::<Vec<_>>()
        );

        assert!(restored.venues.venues.is_empty());
        assert!(!restored.ui.is_loading);
        assert!(!restored.chat.is_open);
    }

    #[test]
    fn envelope_shape() {
        let raw = encode(&PersistedState::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["state"]["ui"]["currentTheme"], "system");
        assert_eq!(json["state"]["chatState"]["chatMode"], "general");
        assert_eq!(json["state"]["isAuthenticated"], false);
    }

    #[test]
    fn decode_rejects_other_versions() {
        let err = decode(r#"{"state":{},"version":2}"#).unwrap_err();
        assert!(matches!(err, PersistError::UnsupportedVersion(2)));
    }

    #[test]
    fn into_state_normalizes() {
        let duplicate = Venue::new("v1", "Cafe", "1 Main", "cafe", 4.2);
        let persisted = PersistedState {
            user: None,
            is_authenticated: true,
            followed_venues: vec![duplicate.clone(), duplicate],
            chat_state: PersistedChat {
                messages: (0..200).map(message).collect(),
                ..PersistedChat::default()
            },
            ..PersistedState::default()
        };

        let state = persisted.into_state(50);

        assert!(!state.user.is_authenticated);
        assert_eq!(state.venues.followed_venues.len(), 1);
        assert!(state.venues.followed_venues[0].is_followed);
        assert_eq!(state.chat.messages.len(), 50);
        assert_eq!(state.chat.messages.first().map(|m| m.id.as_str()), Some("m150"));
    }

    #[test]
    fn rehydrate_falls_back_on_garbage() {
        let storage = InMemoryStorage::with_value(KEY, "{not json");
        assert_eq!(rehydrate(&storage, KEY, 50), AppState::default());
    }

    #[test]
    fn rehydrate_falls_back_on_unreadable_storage() {
        let storage = InMemoryStorage::new();
        storage.fail_reads(true);
        assert_eq!(rehydrate(&storage, KEY, 50), AppState::default());
    }

    #[test]
    fn rehydrate_tolerates_missing_fields() {
        let raw = r#"{"state":{"ui":{"currentTheme":"light"}},"version":1}"#;
        let storage = InMemoryStorage::with_value(KEY, &raw);
        let state = rehydrate(&storage, KEY, 50);
        assert_eq!(state.ui.current_theme, Theme::Light);
        assert!(!state.ui.is_sidebar_open);
        assert!(state.user.user.is_none());
    }

    #[test]
    fn middleware_write_failure_is_swallowed() {
        let storage = InMemoryStorage::new();
        storage.fail_writes(true);
        let middleware = PersistenceMiddleware::new(Arc::new(storage.clone()), KEY, 50);

        let action = AppAction::Maintenance(crate::cleanup::MaintenanceAction::Sweep);
        middleware.after_reduce(&action, &populated());

        assert!(storage.raw(KEY).is_none());
        assert!(middleware.write(&populated()).is_err());

        storage.fail_writes(false);
        assert!(middleware.write(&populated()).unwrap());
        assert!(storage.raw(KEY).is_some());
    }

    #[test]
    fn unchanged_projection_is_not_rewritten() {
        let storage = InMemoryStorage::new();
        let middleware = PersistenceMiddleware::new(Arc::new(storage.clone()), KEY, 50);
        let mut state = populated();

        assert!(middleware.write(&state).unwrap());

        state.chat.transcript = "rooftop b".to_string();
        state.ui.is_loading = false;
        state.venues.venues.clear();
        assert!(!middleware.write(&state).unwrap());
        assert_eq!(storage.write_count(), 1);

        state.ui.current_theme = Theme::Light;
        assert!(middleware.write(&state).unwrap());
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn nan_rating_survives_a_reload() {
        let mut state = populated();
        state.venues.followed_venues[0].rating = f64::NAN;

        let raw = encode(&PersistedState::project(&state, 50)).unwrap();
        let storage = InMemoryStorage::with_value(KEY, &raw);
        let restored = rehydrate(&storage, KEY, 50);

        assert!(restored.user.is_authenticated);
        assert_eq!(restored.user.user, state.user.user);
        assert_eq!(restored.venues.followed_venues.len(), 1);
        assert_eq!(restored.venues.followed_venues[0].id, "v1");
        assert!(restored.venues.followed_venues[0].rating.is_nan());
    }
}
