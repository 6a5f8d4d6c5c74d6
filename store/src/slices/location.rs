//! Location slice: four independent collections, each replaced wholesale

use crate::environment::AppEnvironment;
use serde::{Deserialize, Serialize};
use vibes_core::{action::ActionName, reducer::Reducer};

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// A place shown on the map or in search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Unique location id
    pub id: String,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Position
    pub coordinates: Coordinates,
    /// Category label
    pub category: String,
    /// Average rating
    #[serde(deserialize_with = "super::venue::rating_or_nan")]
    pub rating: f64,
    /// Image URLs, in display order
    #[serde(default)]
    pub images: Vec<String>,
}

/// Location slice state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationState {
    /// All known locations
    pub locations: Vec<Location>,
    /// Locations near the user
    pub nearby_locations: Vec<Location>,
    /// Results of the last search
    pub search_results: Vec<Location>,
    /// Location the user picked
    pub selected_location: Option<Location>,
    /// A location fetch is in flight
    pub is_loading: bool,
}

/// Location slice actions
#[derive(Debug, Clone, PartialEq)]
pub enum LocationAction {
    /// Replace all known locations
    SetLocations(Vec<Location>),
    /// Replace nearby locations
    SetNearbyLocations(Vec<Location>),
    /// Replace the selected location
    SetSelectedLocation(Option<Location>),
    /// Replace search results
    SetSearchResults(Vec<Location>),
    /// Set the loading flag
    SetLoading(bool),
}

impl ActionName for LocationAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SetLocations(_) => "location/setLocations",
            Self::SetNearbyLocations(_) => "location/setNearbyLocations",
            Self::SetSelectedLocation(_) => "location/setSelectedLocation",
            Self::SetSearchResults(_) => "location/setSearchResults",
            Self::SetLoading(_) => "location/setLoading",
        }
    }
}

/// Reducer for [`LocationState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationReducer;

impl Reducer for LocationReducer {
    type State = LocationState;
    type Action = LocationAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            LocationAction::SetLocations(locations) => state.locations = locations,
            LocationAction::SetNearbyLocations(locations) => state.nearby_locations = locations,
            LocationAction::SetSelectedLocation(location) => state.selected_location = location,
            LocationAction::SetSearchResults(locations) => state.search_results = locations,
            LocationAction::SetLoading(loading) => state.is_loading = loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::test_env;
    use vibes_testing::ReducerTest;

    fn place(id: &str) -> Location {
        Location {
            id: id.to_string(),
            name: format!("Place {id}"),
            address: "1 Main".to_string(),
            coordinates: Coordinates { lat: 40.7, lng: -74.0 },
            category: "park".to_string(),
            rating: 4.0,
            images: vec!["a.jpg".to_string()],
        }
    }

    #[test]
    fn setters_replace_without_merging() {
        ReducerTest::new(LocationReducer)
            .with_env(test_env())
            .given_state(LocationState::default())
            .when_actions([
                LocationAction::SetLocations(vec![place("1"), place("2")]),
                LocationAction::SetLocations(vec![place("3")]),
            ])
            .then_state(|state| {
                assert_eq!(state.locations, vec![place("3")]);
            })
            .run();
    }

    #[test]
    fn collections_are_independent() {
        ReducerTest::new(LocationReducer)
            .with_env(test_env())
            .given_state(LocationState::default())
            .when_actions([
                LocationAction::SetNearbyLocations(vec![place("n")]),
                LocationAction::SetSearchResults(vec![place("s")]),
                LocationAction::SetSelectedLocation(Some(place("x"))),
                LocationAction::SetLoading(true),
            ])
            .then_state(|state| {
                assert!(state.locations.is_empty());
                assert_eq!(state.nearby_locations, vec![place("n")]);
                assert_eq!(state.search_results, vec![place("s")]);
                assert_eq!(state.selected_location, Some(place("x")));
                assert!(state.is_loading);
            })
            .run();
    }

    #[test]
    fn selected_location_can_be_cleared() {
        ReducerTest::new(LocationReducer)
            .with_env(test_env())
            .given_state(LocationState {
                selected_location: Some(place("1")),
                ..LocationState::default()
            })
            .when_action(LocationAction::SetSelectedLocation(None))
            .then_state(|state| assert!(state.selected_location.is_none()))
            .run();
    }
}
