//! Venue slice: the catalog, the followed list, and the venue in view
//!
//! The followed list is its own collection, not a filter over the catalog.
//! Entries in it always carry `is_followed = true`. An update by id is
//! applied to every view holding that id so the three never diverge.

use crate::environment::AppEnvironment;
use serde::{Deserialize, Deserializer, Serialize};
use vibes_core::{action::ActionName, reducer::Reducer};

/// A venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Unique venue id
    pub id: String,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Category label (`"cafe"`, `"bar"`, ...)
    pub category: String,
    /// Average rating
    #[serde(deserialize_with = "rating_or_nan")]
    pub rating: f64,
    /// Whether the user follows this venue
    #[serde(default)]
    pub is_followed: bool,
}

/// `serde_json` writes a non-finite rating as `null`; read it back as NaN.
pub(crate) fn rating_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Venue {
    /// Create an unfollowed venue
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        category: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            category: category.into(),
            rating,
            is_followed: false,
        }
    }
}

/// Fields to merge into every view of a venue
///
/// Follow status is not patchable; it is owned by follow/unfollow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenuePatch {
    /// New display name
    pub name: Option<String>,
    /// New address
    pub address: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New rating
    pub rating: Option<f64>,
}

impl VenuePatch {
    /// Set the display name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the address
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the category
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the rating
    #[must_use]
    pub const fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    fn apply(&self, venue: &mut Venue) {
        if let Some(name) = &self.name {
            venue.name.clone_from(name);
        }
        if let Some(address) = &self.address {
            venue.address.clone_from(address);
        }
        if let Some(category) = &self.category {
            venue.category.clone_from(category);
        }
        if let Some(rating) = self.rating {
            venue.rating = rating;
        }
    }
}

/// Venue slice state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueState {
    /// Full catalog
    pub venues: Vec<Venue>,
    /// Venues the user follows, in follow order
    pub followed_venues: Vec<Venue>,
    /// Venue currently in view
    pub current_venue: Option<Venue>,
}

impl VenueState {
    /// Whether `id` is in the followed list
    #[must_use]
    pub fn is_following(&self, id: &str) -> bool {
        self.followed_venues.iter().any(|v| v.id == id)
    }
}

/// Venue slice actions
#[derive(Debug, Clone, PartialEq)]
pub enum VenueAction {
    /// Replace the catalog; followed list and current venue are untouched
    SetVenues(Vec<Venue>),
    /// Add to the followed list unless already there
    FollowVenue(Venue),
    /// Remove from the followed list; no-op for unknown ids
    UnfollowVenue(String),
    /// Replace the venue in view
    SetCurrentVenue(Option<Venue>),
    /// Merge fields into every view holding `id`
    UpdateVenue {
        /// Venue to update
        id: String,
        /// Fields to merge
        patch: VenuePatch,
    },
}

impl ActionName for VenueAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SetVenues(_) => "venue/setVenues",
            Self::FollowVenue(_) => "venue/followVenue",
            Self::UnfollowVenue(_) => "venue/unfollowVenue",
            Self::SetCurrentVenue(_) => "venue/setCurrentVenue",
            Self::UpdateVenue { .. } => "venue/updateVenue",
        }
    }
}

/// Reducer for [`VenueState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct VenueReducer;

impl Reducer for VenueReducer {
    type State = VenueState;
    type Action = VenueAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            VenueAction::SetVenues(venues) => {
                state.venues = venues;
            },
            VenueAction::FollowVenue(mut venue) => {
                if !state.is_following(&venue.id) {
                    venue.is_followed = true;
                    state.followed_venues.push(venue);
                }
            },
            VenueAction::UnfollowVenue(id) => {
                state.followed_venues.retain(|v| v.id != id);
            },
            VenueAction::SetCurrentVenue(venue) => {
                state.current_venue = venue;
            },
            VenueAction::UpdateVenue { id, patch } => {
                let views = state
                    .venues
                    .iter_mut()
                    .chain(state.followed_venues.iter_mut())
                    .chain(state.current_venue.iter_mut());
                for venue in views.filter(|v| v.id == id) {
                    patch.apply(venue);
                }
            },
        }
    }
}
