//! The five state slices
//!
//! Each slice owns its state, its actions and a reducer over them. Slices
//! never see each other; they are scoped into [`crate::state::AppState`]
//! by [`crate::reducer::app_reducer`].

pub mod chat;
pub mod location;
pub mod ui;
pub mod user;
pub mod venue;

pub use chat::{ChatAction, ChatMessage, ChatMode, ChatReducer, ChatState, MessageRole};
pub use location::{Coordinates, Location, LocationAction, LocationReducer, LocationState};
pub use ui::{NewNotification, Notification, NotificationKind, Theme, UiAction, UiReducer, UiState};
pub use user::{Subscription, User, UserAction, UserPatch, UserReducer, UserState};
pub use venue::{Venue, VenueAction, VenuePatch, VenueReducer, VenueState};

/// Deterministic environment for reducer tests: fixed clock, `id-N` ids
#[cfg(test)]
pub(crate) fn test_env() -> crate::environment::AppEnvironment {
    use std::sync::Arc;

    crate::environment::AppEnvironment::new(
        Arc::new(vibes_testing::test_clock()),
        Arc::new(vibes_testing::SequentialIds::new()),
    )
}
