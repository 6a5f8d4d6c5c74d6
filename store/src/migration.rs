//! One-shot import of legacy, component-held state
//!
//! Screens written before the shared store kept their own copies of chat
//! history, auth flags, followed venues and UI preferences. These helpers
//! push such state into an [`AppStore`] through the ordinary actions, so
//! every slice rule (caps, follow idempotence, auth consistency) still
//! applies. They validate nothing beyond what those actions do.

use crate::slices::{ChatMessage, Theme, User, Venue};
use crate::store::AppStore;
use vibes_runtime::StoreError;

/// UI preferences a legacy screen may have held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyUiPreferences {
    /// Chosen color scheme, if any
    pub theme: Option<Theme>,
    /// Sidebar state, if tracked
    pub sidebar_open: Option<bool>,
}

/// Append legacy chat history in order
///
/// Returns how many messages were dispatched. The chat cap applies as
/// usual, so only the newest 100 of the combined history remain.
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn migrate_chat_messages(
    store: &AppStore,
    messages: impl IntoIterator<Item = ChatMessage>,
) -> Result<usize, StoreError> {
    let mut migrated = 0;
    for message in messages {
        store.add_message(message).await?;
        migrated += 1;
    }
    tracing::info!(migrated, "Migrated legacy chat messages");
    Ok(migrated)
}

/// Import a legacy `(is_authenticated, user)` pair
///
/// - `(true, Some(user))` logs `user` in
/// - `(false, _)` logs out
/// - `(true, None)` cannot be represented and is skipped
///
/// Returns whether an action was dispatched.
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn migrate_auth(
    store: &AppStore,
    is_authenticated: bool,
    user: Option<User>,
) -> Result<bool, StoreError> {
    match (is_authenticated, user) {
        (true, Some(user)) => {
            store.login(user).await?;
            Ok(true)
        },
        (false, _) => {
            store.logout().await?;
            Ok(true)
        },
        (true, None) => {
            tracing::warn!("Legacy auth flag set without a user payload, skipping");
            Ok(false)
        },
    }
}

/// Follow each legacy followed venue
///
/// Duplicates collapse as usual. Returns how many follow actions were
/// dispatched.
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn migrate_followed_venues(
    store: &AppStore,
    venues: impl IntoIterator<Item = Venue>,
) -> Result<usize, StoreError> {
    let mut migrated = 0;
    for venue in venues {
        store.follow_venue(venue).await?;
        migrated += 1;
    }
    tracing::info!(migrated, "Migrated legacy followed venues");
    Ok(migrated)
}

/// Apply whichever legacy UI preferences are present
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
pub async fn migrate_ui_preferences(
    store: &AppStore,
    preferences: LegacyUiPreferences,
) -> Result<(), StoreError> {
    if let Some(theme) = preferences.theme {
        store.set_theme(theme).await?;
    }
    if let Some(open) = preferences.sidebar_open {
        store.set_sidebar_open(open).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::AppConfig;
    use crate::slices::{test_env, MessageRole};
    use vibes_testing::test_epoch;

    fn store() -> AppStore {
        AppStore::in_memory(&AppConfig::default(), test_env())
    }

    #[tokio::test]
    async fn chat_history_is_appended_in_order() {
        let store = store();
        let legacy = (0..3)
            .map(|n| ChatMessage::new(format!("m{n}"), MessageRole::User, "x", test_epoch()));

        assert_eq!(migrate_chat_messages(&store, legacy).await.unwrap(), 3);

        let ids = store
            .state(|s| s.chat.messages.iter().map(|m| m.id.clone()).collect::<Vec<_>>())
            .await;
        assert_eq!(ids, vec!["m0", "m1", "m2"]);
    }

    #[tokio::test]
    async fn auth_pair_maps_to_login_or_logout() {
        let store = store();

        assert!(migrate_auth(&store, true, Some(User::new("u1", "A", "a@x.com"))).await.unwrap());
        assert!(store.state(|s| s.user.is_authenticated).await);

        assert!(!migrate_auth(&store, true, None).await.unwrap());
        assert!(store.state(|s| s.user.is_authenticated).await);

        assert!(migrate_auth(&store, false, None).await.unwrap());
        assert!(!store.state(|s| s.user.is_authenticated).await);
    }

    #[tokio::test]
    async fn duplicate_legacy_follows_collapse() {
        let store = store();
        let cafe = Venue::new("v1", "Cafe", "1 Main", "cafe", 4.2);

        let dispatched = migrate_followed_venues(&store, vec![cafe.clone(), cafe]).await.unwrap();

        assert_eq!(dispatched, 2);
        assert_eq!(store.state(|s| s.venues.followed_venues.len()).await, 1);
    }

    #[tokio::test]
    async fn only_present_preferences_are_applied() {
        let store = store();

        migrate_ui_preferences(
            &store,
            LegacyUiPreferences {
                theme: Some(Theme::Light),
                sidebar_open: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(store.state(|s| s.ui.current_theme).await, Theme::Light);
        assert_eq!(store.action_log().names(), vec!["ui/setTheme"]);
    }
}
