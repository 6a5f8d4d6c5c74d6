//! Post-commit hooks for the Store
//!
//! A [`Middleware`] observes every committed transition. It runs after the
//! reducer returns and before the write lock is released, so it sees exactly
//! the state the action produced and runs in dispatch order. Persistence and
//! devtools logging are built on this hook.
//!
//! Middleware must not block for long: every dispatch waits for it.

/// Observer of committed state transitions
///
/// # Example
///
/// ```
/// use vibes_runtime::middleware::Middleware;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct CountCommits(AtomicUsize);
///
/// impl Middleware<i32, ()> for CountCommits {
///     fn after_reduce(&self, _action: &(), _state: &i32) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait Middleware<S, A>: Send + Sync {
    /// Called once per dispatched action, after the reducer has applied it
    fn after_reduce(&self, action: &A, state: &S);
}

impl<S, A, F> Middleware<S, A> for F
where
    F: Fn(&A, &S) + Send + Sync,
{
    fn after_reduce(&self, action: &A, state: &S) {
        self(action, state);
    }
}
