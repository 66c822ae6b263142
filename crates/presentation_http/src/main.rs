//! Arcana HTTP Server
//!
//! Main entry point for the bot webhook server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{
    AccountSettings, CacheService, Clock, RateLimitService, ReadingService, ReadingSettings,
    TextGenerationPort, UserRepositoryPort, UserService,
};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, OpenAiGenerationAdapter, SqliteUserRepository,
    SystemClock, init_tracing, select_backend,
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration faults are fatal, there are no silent defaults here
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate()?;

    init_tracing(&config.telemetry)?;
    info!("🔮 Arcana v{} starting...", env!("CARGO_PKG_VERSION"));

    // Key stores, bound once for the process lifetime
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let backends = select_backend(&config.redis, &config.cache.key_prefix, Arc::clone(&clock)).await;
    info!(backend = %backends.kind, "Key stores ready");

    // Account database
    let database = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database)).await?;
    if config.database.migrate_on_start {
        database.migrate().await?;
    }
    let repository: Arc<dyn UserRepositoryPort> =
        Arc::new(SqliteUserRepository::new(database.pool().clone()));

    // Services
    let cache = CacheService::new(Arc::clone(&backends.cache))
        .with_default_ttl(config.cache.default_ttl());

    let policies = config
        .rate_limit
        .resolve_policies()
        .context("Invalid rate limit policy")?;
    let rate_limiter = RateLimitService::with_policies(
        Arc::clone(&backends.rate_limit),
        Arc::clone(&clock),
        policies,
    );

    let generator: Arc<dyn TextGenerationPort> =
        Arc::new(OpenAiGenerationAdapter::new(&config.generation)?);
    let readings = ReadingService::new(
        cache.clone(),
        generator,
        ReadingSettings {
            generation_timeout: config.generation.timeout(),
            deck_ttl: config.cache.deck_ttl(),
            generation_ttl: config.cache.generation_ttl(),
        },
    );

    let users = UserService::new(
        Arc::clone(&repository),
        cache.clone(),
        AccountSettings {
            default_balance: config.account.default_balance,
            referral_bonus: config.account.referral_bonus,
            cache_ttl: config.cache.user_ttl(),
            bot_username: config.account.bot_username.clone(),
        },
    );

    let state = AppState {
        users: Arc::new(users),
        readings: Arc::new(readings),
        cache,
        rate_limiter: Arc::new(rate_limiter),
        repository,
        rate_limit_enabled: config.rate_limit.enabled,
        max_body_bytes: config.server.max_body_bytes,
        referral_bonus: config.account.referral_bonus,
    };

    // Build router (order matters: last added = outermost)
    let app = routes::create_router(state)
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout()))
        .await?;

    database.close().await;
    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);
}
