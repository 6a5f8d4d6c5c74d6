//! The application reducer: every slice scoped into [`AppState`]

use crate::cleanup::MaintenanceReducer;
use crate::environment::AppEnvironment;
use crate::slices::{ChatAction, ChatReducer, ChatState, LocationAction, LocationReducer};
use crate::slices::{LocationState, UiAction, UiReducer, UiState, UserAction, UserReducer};
use crate::slices::{UserState, VenueAction, VenueReducer, VenueState};
use crate::state::{AppAction, AppState};
use vibes_core::composition::{combine_reducers, scope_reducer, CombinedReducer};

/// Reducer driving the whole store
pub type AppReducer = CombinedReducer<AppState, AppAction, AppEnvironment>;

/// Build the application reducer
///
/// Each slice reducer sees only its own field and its own actions.
/// Maintenance runs last, over the whole state.
#[must_use]
pub fn app_reducer() -> AppReducer {
    combine_reducers(vec![
        Box::new(scope_reducer(UserReducer, user, user_action)),
        Box::new(scope_reducer(VenueReducer, venues, venue_action)),
        Box::new(scope_reducer(LocationReducer, locations, location_action)),
        Box::new(scope_reducer(ChatReducer, chat, chat_action)),
        Box::new(scope_reducer(UiReducer, ui, ui_action)),
        Box::new(MaintenanceReducer),
    ])
}

fn user(state: &mut AppState) -> &mut UserState {
    &mut state.user
}

fn user_action(action: AppAction) -> Option<UserAction> {
    match action {
        AppAction::User(action) => Some(action),
        _ => None,
    }
}

fn venues(state: &mut AppState) -> &mut VenueState {
    &mut state.venues
}

fn venue_action(action: AppAction) -> Option<VenueAction> {
    match action {
        AppAction::Venue(action) => Some(action),
        _ => None,
    }
}

fn locations(state: &mut AppState) -> &mut LocationState {
    &mut state.locations
}

fn location_action(action: AppAction) -> Option<LocationAction> {
    match action {
        AppAction::Location(action) => Some(action),
        _ => None,
    }
}

fn chat(state: &mut AppState) -> &mut ChatState {
    &mut state.chat
}

fn chat_action(action: AppAction) -> Option<ChatAction> {
    match action {
        AppAction::Chat(action) => Some(action),
        _ => None,
    }
}

fn ui(state: &mut AppState) -> &mut UiState {
    &mut state.ui
}

fn ui_action(action: AppAction) -> Option<UiAction> {
    match action {
        AppAction::Ui(action) => Some(action),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::{test_env, NewNotification, User, Venue};
    use vibes_core::reducer::Reducer;

    #[test]
    fn routes_each_action_to_its_slice() {
        let reducer = app_reducer();
        let env = test_env();
        let mut state = AppState::default();

        reducer.reduce(
            &mut state,
            UserAction::Login(User::new("u1", "A", "a@x.com")).into(),
            &env,
        );
        reducer.reduce(
            &mut state,
            VenueAction::FollowVenue(Venue::new("v1", "Cafe", "1 Main", "cafe", 4.2)).into(),
            &env,
        );
        reducer.reduce(
            &mut state,
            UiAction::AddNotification(NewNotification::info("Followed", "Cafe")).into(),
            &env,
        );

        assert!(state.user.is_authenticated);
        assert_eq!(state.venues.followed_venues.len(), 1);
        assert_eq!(state.ui.notifications.len(), 1);
        assert!(state.chat.messages.is_empty());
        assert!(state.locations.locations.is_empty());
    }

    #[test]
    fn combines_every_slice() {
        assert_eq!(app_reducer().len(), 6);
    }
}
