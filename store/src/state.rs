//! Application state and the unified action surface

use crate::cleanup::MaintenanceAction;
use crate::slices::{ChatAction, ChatState, LocationAction, LocationState, UiAction, UiState};
use crate::slices::{UserAction, UserState, VenueAction, VenueState};
use serde::Serialize;
use vibes_core::action::ActionName;

/// Everything the store holds, one named field per slice
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Identity and points
    pub user: UserState,
    /// Catalog, followed list, current venue
    pub venues: VenueState,
    /// Map and search results
    pub locations: LocationState,
    /// Assistant conversation
    pub chat: ChatState,
    /// Flags, theme, notifications
    pub ui: UiState,
}

/// Any action the store accepts
///
/// Slice actions convert into this with `From`, so call sites can write
/// `store.dispatch(UserAction::Logout)`.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// User slice
    User(UserAction),
    /// Venue slice
    Venue(VenueAction),
    /// Location slice
    Location(LocationAction),
    /// Chat slice
    Chat(ChatAction),
    /// UI slice
    Ui(UiAction),
    /// Cross-slice housekeeping
    Maintenance(MaintenanceAction),
}

impl ActionName for AppAction {
    fn name(&self) -> &'static str {
        match self {
            Self::User(action) => action.name(),
            Self::Venue(action) => action.name(),
            Self::Location(action) => action.name(),
            Self::Chat(action) => action.name(),
            Self::Ui(action) => action.name(),
            Self::Maintenance(action) => action.name(),
        }
    }
}

impl From<UserAction> for AppAction {
    fn from(action: UserAction) -> Self {
        Self::User(action)
    }
}

impl From<VenueAction> for AppAction {
    fn from(action: VenueAction) -> Self {
        Self::Venue(action)
    }
}

impl From<LocationAction> for AppAction {
    fn from(action: LocationAction) -> Self {
        Self::Location(action)
    }
}

impl From<ChatAction> for AppAction {
    fn from(action: ChatAction) -> Self {
        Self::Chat(action)
    }
}

impl From<UiAction> for AppAction {
    fn from(action: UiAction) -> Self {
        Self::Ui(action)
    }
}

impl From<MaintenanceAction> for AppAction {
    fn from(action: MaintenanceAction) -> Self {
        Self::Maintenance(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::Theme;

    #[test]
    fn names_come_from_the_slice() {
        assert_eq!(AppAction::from(UserAction::Logout).name(), "user/logout");
        assert_eq!(AppAction::from(UiAction::SetTheme(Theme::Dark)).name(), "ui/setTheme");
        assert_eq!(AppAction::from(MaintenanceAction::Sweep).name(), "maintenance/sweep");
    }

    #[test]
    fn defaults_match_a_fresh_session() {
        let state = AppState::default();
        assert!(state.user.user.is_none());
        assert!(!state.user.is_authenticated);
        assert!(state.venues.followed_venues.is_empty());
        assert_eq!(state.ui.current_theme, Theme::System);
        assert!(!state.chat.is_open);
    }
}
