//! Read-only views derived from [`AppState`]
//!
//! Use with `AppStore::state`:
//!
//! ```ignore
//! let following = store.state(|s| selectors::is_following(s, "v1")).await;
//! ```

use crate::slices::{ChatMessage, Notification, NotificationKind};
use crate::state::AppState;

/// Whether a user is signed in
#[must_use]
pub const fn is_authenticated(state: &AppState) -> bool {
    state.user.is_authenticated
}

/// Points balance of the signed-in user
#[must_use]
pub fn points(state: &AppState) -> Option<u64> {
    state.user.user.as_ref().map(|user| user.points)
}

/// Whether the venue `id` is followed
#[must_use]
pub fn is_following(state: &AppState, id: &str) -> bool {
    state.venues.is_following(id)
}

/// Number of followed venues
#[must_use]
pub fn followed_count(state: &AppState) -> usize {
    state.venues.followed_venues.len()
}

/// Most recent chat message
#[must_use]
pub fn latest_message(state: &AppState) -> Option<&ChatMessage> {
    state.chat.messages.last()
}

/// Queued notifications of one kind, oldest first
#[must_use]
pub fn notifications_of_kind(state: &AppState, kind: NotificationKind) -> Vec<&Notification> {
    state
        .ui
        .notifications
        .iter()
        .filter(|n| n.kind == kind)
        .collect()
}

/// Whether the assistant is doing anything the user should wait for
///
/// True if any of typing, processing or listening is set.
#[must_use]
pub const fn chat_is_busy(state: &AppState) -> bool {
    state.chat.is_typing || state.chat.is_processing || state.chat.is_listening
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::{MessageRole, User, Venue};
    use vibes_testing::test_epoch;

    #[test]
    fn signed_out_defaults() {
        let state = AppState::default();
        assert!(!is_authenticated(&state));
        assert_eq!(points(&state), None);
        assert_eq!(followed_count(&state), 0);
        assert!(latest_message(&state).is_none());
        assert!(!chat_is_busy(&state));
    }

    #[test]
    fn reads_populated_state() {
        let mut state = AppState::default();
        state.user.user = Some(User {
            points: 75,
            ..User::new("u1", "A", "a@x.com")
        });
        state.user.is_authenticated = true;
        state.venues.followed_venues.push(Venue::new("v1", "Cafe", "1 Main", "cafe", 4.2));
        state.chat.is_listening = true;
        for (id, role) in [("m1", MessageRole::User), ("m2", MessageRole::Assistant)] {
            let _ = state.chat.messages.push(ChatMessage::new(id, role, "a", test_epoch()));
        }
        let kinds = [
            ("n1", NotificationKind::Error),
            ("n2", NotificationKind::Info),
            ("n3", NotificationKind::Error),
        ];
        for (id, kind) in kinds {
            let _ = state.ui.notifications.push(Notification {
                id: id.to_string(),
                kind,
                title: String::new(),
                message: String::new(),
                timestamp: test_epoch(),
            });
        }

        assert!(is_authenticated(&state));
        assert_eq!(points(&state), Some(75));
        assert!(is_following(&state, "v1"));
        assert!(!is_following(&state, "v2"));
        assert_eq!(latest_message(&state).map(|m| m.id.as_str()), Some("m2"));
        assert!(chat_is_busy(&state));

        let errors: Vec<_> = notifications_of_kind(&state, NotificationKind::Error)
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(errors, vec!["n1", "n3"]);
    }
}
