//! Periodic memory sweep
//!
//! Long-lived sessions accumulate chat history and notifications. The sweep
//! trims history to the retention window and evicts notifications older
//! than the maximum age. Survivors keep their original id and timestamp.
//!
//! The inline caps in the chat and UI slices already bound both lists; the
//! sweep only tightens them further.

use crate::environment::AppEnvironment;
use crate::state::{AppAction, AppState};
use crate::store::AppStore;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use vibes_core::{action::ActionName, reducer::Reducer};

/// Housekeeping actions that span slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceAction {
    /// Trim chat history and evict stale notifications
    Sweep,
}

impl ActionName for MaintenanceAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Sweep => "maintenance/sweep",
        }
    }
}

/// Applies [`MaintenanceAction`]s to the whole [`AppState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceReducer;

impl Reducer for MaintenanceReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        let AppAction::Maintenance(MaintenanceAction::Sweep) = action else {
            return;
        };

        let now = env.clock.now();
        let max_age = env.retention.notification_max_age;

        let messages = state.chat.messages.keep_last(env.retention.message_window);
        let notifications = state
            .ui
            .notifications
            .retain(|n| now.signed_duration_since(n.timestamp) < max_age);

        if messages > 0 || notifications > 0 {
            tracing::info!(messages, notifications, "Cleanup sweep dropped stale entries");
        } else {
            tracing::debug!("Cleanup sweep found nothing to drop");
        }
    }
}

/// Run the sweep every `period` until the store shuts down
///
/// The first sweep happens one full period after the call. Ticks missed
/// while a sweep was waiting on the store are not replayed.
#[must_use = "dropping the handle detaches the cleanup task"]
pub fn spawn_cleanup(store: AppStore, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let _ = ticker.tick().await;
            if store.is_shutting_down() || store.sweep().await.is_err() {
                tracing::debug!("Store shutting down, stopping cleanup task");
                break;
            }
        }
    })
}
