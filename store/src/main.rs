//! Venue Vibes store demo
//!
//! Opens the file-backed store (rehydrating any previous run), plays a short
//! session, prints the resulting state and the action history, and shuts
//! down. Run it twice to see the followed venues and theme survive.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibes_store::cleanup::spawn_cleanup;
use vibes_store::persistence::PersistedState;
use vibes_store::slices::{
    ChatMessage, ChatMode, MessageRole, NewNotification, Theme, User, UserPatch, Venue, VenuePatch,
};
use vibes_store::{selectors, AppConfig, AppEnvironment, AppStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibes_store=debug,vibes_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Venue Vibes Store Demo ===\n");

    let config = AppConfig::from_env()?;
    let store = AppStore::open_file_backed(&config, AppEnvironment::production())?;
    let cleanup = spawn_cleanup(store.clone(), config.cleanup_interval);

    let restored = store.state(selectors::followed_count).await;
    println!("Storage: {}", config.storage_dir.display());
    println!("Followed venues restored from last run: {restored}");

    println!("\n>>> login, updateUser, updatePoints");
    store.login(User::new("u1", "Ada", "ada@example.com")).await?;
    store.update_user(UserPatch::default().name("Ada L.")).await?;
    store.update_points(50).await?;

    println!(">>> setVenues, followVenue, setCurrentVenue, updateVenue");
    let cafe = Venue::new("v1", "Cafe Luna", "1 Main St", "cafe", 4.2);
    let bar = Venue::new("v2", "Night Owl", "9 Elm St", "bar", 3.9);
    store.set_venues(vec![cafe.clone(), bar]).await?;
    store.follow_venue(cafe.clone()).await?;
    store.set_current_venue(Some(cafe)).await?;
    store.update_venue("v1", VenuePatch::default().rating(4.5)).await?;

    println!(">>> chat session");
    let now = store.environment().clock.now();
    store.set_chat_open(true).await?;
    store.set_chat_mode(ChatMode::Venues).await?;
    store
        .add_message(ChatMessage::new("m1", MessageRole::User, "Any rooftop bars?", now))
        .await?;
    store.set_processing(true).await?;
    store
        .add_message(ChatMessage::new("m2", MessageRole::Assistant, "Try Night Owl.", now))
        .await?;
    store.set_processing(false).await?;

    println!(">>> theme and notifications");
    store.set_theme(Theme::Dark).await?;
    store
        .add_notification(NewNotification::info("Following", "Cafe Luna"))
        .await?;

    let state = store.snapshot().await;
    println!("\nState:\n{}", serde_json::to_string_pretty(&state)?);

    let persisted = PersistedState::project(&state, config.persisted_message_window);
    println!("\nPersisted projection:\n{}", serde_json::to_string_pretty(&persisted)?);

    println!("\nAction history:");
    for trace in store.action_log().entries() {
        println!("  #{:<3} {}", trace.sequence, trace.name);
    }

    store.shutdown().await?;
    cleanup.abort();

    println!("\n=== Demo Complete ===");
    Ok(())
}
