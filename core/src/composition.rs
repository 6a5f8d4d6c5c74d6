//! Reducer composition utilities
//!
//! This module provides utilities for composing slice reducers into one
//! application reducer:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a slice reducer on one field of a larger
//!   state and one variant of a larger action
//!
//! # Examples
//!
//! ```
//! use vibes_core::composition::{combine_reducers, scope_reducer};
//! use vibes_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct ThemeState {
//!     dark: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ThemeAction {
//!     Toggle,
//! }
//!
//! struct ThemeReducer;
//!
//! impl Reducer for ThemeReducer {
//!     type State = ThemeState;
//!     type Action = ThemeAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut ThemeState, _action: ThemeAction, _env: &()) {
//!         state.dark = !state.dark;
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     theme: ThemeState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Theme(ThemeAction),
//! }
//!
//! fn theme(state: &mut AppState) -> &mut ThemeState {
//!     &mut state.theme
//! }
//!
//! fn theme_action(action: AppAction) -> Option<ThemeAction> {
//!     match action {
//!         AppAction::Theme(action) => Some(action),
//!     }
//! }
//!
//! let app = combine_reducers(vec![Box::new(scope_reducer(ThemeReducer, theme, theme_action))]);
//!
//! let mut state = AppState::default();
//! app.reduce(&mut state, AppAction::Theme(ThemeAction::Toggle), &());
//! assert!(state.theme.dark);
//! ```

use crate::reducer::Reducer;

/// A reducer that can live behind a trait object shared across threads
pub type BoxedReducer<S, A, E> =
    Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, in the order given. Every reducer sees
/// the state left behind by the previous one.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of combined reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        for reducer in &self.reducers {
            reducer.reduce(state, action.clone(), env);
        }
    }
}

/// Scopes a slice reducer into a parent state and parent action.
///
/// - `state` borrows the slice's field out of the parent state
/// - `extract` picks the slice's action out of a parent action, or `None`
///   if the action belongs to another slice
///
/// The slice state is mutated in place, so a slice transition is part of the
/// same atomic update as the parent's.
pub fn scope_reducer<S, A, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
) -> ScopedReducer<S, A, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        extract,
    }
}

/// A scoped reducer that operates on one slice of a parent state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
}

impl<S, A, R> Reducer for ScopedReducer<S, A, R>
where
    R: Reducer,
{
    type State = S;
    type Action = A;
    type Environment = R::Environment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        if let Some(local) = (self.extract)(action) {
            self.reducer.reduce((self.state)(state), local, env);
        }
    }
}
