//! User slice: signed-in identity, profile, points balance
//!
//! `user` and `is_authenticated` always change together: the flag is true
//! exactly when a user is present.

use crate::environment::AppEnvironment;
use serde::{Deserialize, Serialize};
use vibes_core::{action::ActionName, reducer::Reducer};

/// Subscription tier of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    /// Free tier
    #[default]
    Free,
    /// Paid tier
    Premium,
    /// Top tier
    Vip,
}

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user id
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Subscription tier
    #[serde(default)]
    pub subscription: Subscription,
    /// Rewards balance
    #[serde(default)]
    pub points: u64,
}

impl User {
    /// Create a free-tier user with no points and no avatar
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
            subscription: Subscription::Free,
            points: 0,
        }
    }
}

/// Fields to merge into the signed-in user
///
/// `None` leaves a field unchanged. `avatar: Some(None)` clears the avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New display name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New avatar (or `Some(None)` to remove it)
    pub avatar: Option<Option<String>>,
    /// New subscription tier
    pub subscription: Option<Subscription>,
    /// New points balance
    pub points: Option<u64>,
}

impl UserPatch {
    /// Set the display name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set or clear the avatar
    #[must_use]
    pub fn avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// Set the subscription tier
    #[must_use]
    pub const fn subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = Some(subscription);
        self
    }

    /// Set the points balance
    #[must_use]
    pub const fn points(mut self, points: u64) -> Self {
        self.points = Some(points);
        self
    }

    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(subscription) = self.subscription {
            user.subscription = subscription;
        }
        if let Some(points) = self.points {
            user.points = points;
        }
    }
}

/// User slice state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    /// Signed-in user, if any
    pub user: Option<User>,
    /// True exactly when `user` is present
    pub is_authenticated: bool,
}

/// User slice actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Replace the current user and mark the session authenticated
    Login(User),
    /// Remove the user and mark the session unauthenticated
    Logout,
    /// Merge fields into the current user; no-op when signed out
    UpdateUser(UserPatch),
    /// Set the points balance (absolute); no-op when signed out
    UpdatePoints(u64),
}

impl ActionName for UserAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "user/login",
            Self::Logout => "user/logout",
            Self::UpdateUser(_) => "user/updateUser",
            Self::UpdatePoints(_) => "user/updatePoints",
        }
    }
}

/// Reducer for [`UserState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UserReducer;

impl Reducer for UserReducer {
    type State = UserState;
    type Action = UserAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            UserAction::Login(user) => {
                state.user = Some(user);
                state.is_authenticated = true;
            },
            UserAction::Logout => {
                state.user = None;
                state.is_authenticated = false;
            },
            UserAction::UpdateUser(patch) => {
                if let Some(user) = state.user.as_mut() {
                    patch.apply(user);
                }
            },
            UserAction::UpdatePoints(points) => {
                if let Some(user) = state.user.as_mut() {
                    user.points = points;
                }
            },
        }
    }
}
