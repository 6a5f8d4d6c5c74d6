//! UI slice: global flags, theme, and the notification queue
//!
//! Notifications get their id and timestamp from the environment when they
//! are added. The queue holds at most [`MAX_NOTIFICATIONS`]; the oldest are
//! evicted first.

use crate::bounded::BoundedList;
use crate::environment::AppEnvironment;
use serde::{Deserialize, Serialize};
use vibes_core::{action::ActionName, reducer::Reducer, DateTime, Utc};

/// Most notifications kept in the queue
pub const MAX_NOTIFICATIONS: usize = 10;

/// Notification queue, oldest first
pub type NotificationQueue = BoundedList<Notification, MAX_NOTIFICATIONS>;

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme
    Light,
    /// Dark scheme
    Dark,
    /// Follow the operating system
    #[default]
    System,
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// An operation succeeded
    Success,
    /// Something needs attention
    Warning,
    /// An operation failed
    Error,
}

/// Caller-supplied part of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Severity
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
}

impl NewNotification {
    /// Create a notification request
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    /// An `info` notification
    #[must_use]
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    /// An `error` notification
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }
}

/// A notification in the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Generated id
    pub id: String,
    /// Severity
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// When it was added
    pub timestamp: DateTime<Utc>,
}

/// UI slice state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// A global operation is in flight
    pub is_loading: bool,
    /// Sidebar is expanded
    pub is_sidebar_open: bool,
    /// Color scheme
    pub current_theme: Theme,
    /// Notification queue
    pub notifications: NotificationQueue,
}

/// UI slice actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Set the global loading flag
    SetLoading(bool),
    /// Expand or collapse the sidebar
    SetSidebarOpen(bool),
    /// Change the color scheme
    SetTheme(Theme),
    /// Queue a notification with a fresh id and timestamp
    AddNotification(NewNotification),
    /// Remove one notification; no-op for unknown ids
    RemoveNotification(String),
    /// Empty the queue
    ClearNotifications,
}

impl ActionName for UiAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SetLoading(_) => "ui/setLoading",
            Self::SetSidebarOpen(_) => "ui/setSidebarOpen",
            Self::SetTheme(_) => "ui/setTheme",
            Self::AddNotification(_) => "ui/addNotification",
            Self::RemoveNotification(_) => "ui/removeNotification",
            Self::ClearNotifications => "ui/clearNotifications",
        }
    }
}

/// Reducer for [`UiState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UiReducer;

impl Reducer for UiReducer {
    type State = UiState;
    type Action = UiAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        match action {
            UiAction::SetLoading(loading) => state.is_loading = loading,
            UiAction::SetSidebarOpen(open) => state.is_sidebar_open = open,
            UiAction::SetTheme(theme) => state.current_theme = theme,
            UiAction::AddNotification(new) => {
                let _ = state.notifications.push(Notification {
                    id: env.ids.next_id(),
                    kind: new.kind,
                    title: new.title,
                    message: new.message,
                    timestamp: env.clock.now(),
                });
            },
            UiAction::RemoveNotification(id) => {
                let _ = state.notifications.retain(|n| n.id != id);
            },
            UiAction::ClearNotifications => state.notifications.clear(),
        }
    }
}
