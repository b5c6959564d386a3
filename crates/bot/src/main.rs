use std::sync::Arc;
use std::time::Duration;

use tarubot_bot::background;
use tarubot_bot::commands::REGISTRY;
use tarubot_bot::config::BotConfig;
use tarubot_bot::discord::DiscordRoleProvider;
use tarubot_core::clock::SystemClock;
use tarubot_lodestone::LodestoneApi;
use tarubot_sync::{PgStore, SyncContext};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tarubot_bot=debug,tarubot_sync=debug,tarubot_lodestone=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = BotConfig::from_env();
    tracing::info!(
        lodestone_url = %config.lodestone_url,
        fc_refresh_interval_secs = config.fc_refresh_interval_secs,
        "Loaded bot configuration"
    );

    // --- Database ---
    let pool = tarubot_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    tarubot_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    tarubot_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- HTTP clients ---
    let lodestone_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.lodestone_timeout_secs))
        .build()
        .expect("Failed to build Lodestone HTTP client");
    let lodestone = LodestoneApi::with_client(lodestone_client, config.lodestone_url.clone());

    let discord = DiscordRoleProvider::new(
        reqwest::Client::new(),
        config.discord_api_url.clone(),
        config.discord_token.clone(),
    );

    // --- Sync context ---
    let ctx = SyncContext::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(lodestone),
        Arc::new(discord),
        Arc::new(SystemClock),
    );

    let commands: Vec<_> = REGISTRY.iter().map(|c| c.name()).collect();
    tracing::info!(?commands, "Commands registered");

    // --- Background jobs ---
    let cancel = CancellationToken::new();
    let refresh_handle = tokio::spawn(background::fc_refresh::run(
        ctx.clone(),
        Duration::from_secs(config.fc_refresh_interval_secs),
        cancel.clone(),
    ));

    // --- Run until shutdown ---
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");

    cancel.cancel();
    if let Err(e) = refresh_handle.await {
        tracing::error!(error = %e, "FC refresh job panicked");
    }
    tracing::info!("Shutdown complete");
}
