use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rewards_api::background;
use rewards_api::config::{LogFormat, ServerConfig};
use rewards_api::router::build_app_router;
use rewards_api::state::AppState;
use rewards_coordinator::{CoordinatorConfig, MutationCoordinator};
use rewards_economy::{Economy, EconomyConfig};
use rewards_events::{
    EventBus, LogChannel, NotificationChannel, NotificationDispatcher, WebhookDelivery,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    let coordinator_config =
        CoordinatorConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    let economy_config =
        EconomyConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));

    // --- Tracing ---
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rewards_api=debug,rewards_coordinator=debug,rewards_economy=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    tracing::info!(
        instance_id = %coordinator_config.instance_id,
        lock_ttl_ms = coordinator_config.lock_ttl.as_millis() as u64,
        "Loaded coordinator configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = rewards_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    rewards_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    rewards_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    let mut channels: Vec<Arc<dyn NotificationChannel>> = vec![Arc::new(LogChannel)];
    if let Some(url) = &config.notify_webhook_url {
        let webhook = WebhookDelivery::new(url.clone()).expect("Failed to build webhook client");
        channels.push(Arc::new(webhook));
    }
    let dispatcher = NotificationDispatcher::new(channels);
    tracing::info!(channels = ?dispatcher.channel_names(), "Notification dispatcher created");
    let dispatcher_handle = tokio::spawn(dispatcher.run(event_bus.subscribe()));

    // --- Coordinator and processors ---
    let coordinator = MutationCoordinator::new(pool.clone(), &coordinator_config);
    let economy = Economy::new(coordinator.clone(), Arc::clone(&event_bus), economy_config);

    // --- Background jobs ---
    let cancel = tokio_util::sync::CancellationToken::new();
    let cleanup_handle = tokio::spawn(background::lock_cleanup::run(
        coordinator.locks().clone(),
        Duration::from_secs(config.lock_cleanup_interval_secs),
        cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        economy,
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Lock cleanup job stopped");

    // The router (and with it every other bus handle) is gone; dropping the
    // last sender closes the channel and lets the dispatcher drain and exit.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;
    tracing::info!("Notification dispatcher shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
