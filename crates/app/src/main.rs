mod api;
mod runtime;

use crate::runtime::{start_tick_task, start_world_task};
use anyhow::Context;
use axum::serve;
use nightmare_core::config::{GameConfig, Viewport};
use nightmare_core::error::ConfigError;
use nightmare_core::world::GameSnapshot;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{RwLock, mpsc, watch};
use tokio::time::interval;
use tracing::{error, info};

#[derive(Debug)]
struct Config {
    tick_hz: f64,
    port: u16,
    viewport: Viewport,
    auto_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            port: 3000,
            viewport: Viewport::default(),
            auto_start: false,
        }
    }
}

/// Reads `key`, falling back to `default` when unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick_hz: env_or("TICK_HZ", defaults.tick_hz),
            port: env_or("PORT", defaults.port),
            viewport: Viewport::new(
                env_or("VIEWPORT_WIDTH", defaults.viewport.width),
                env_or("VIEWPORT_HEIGHT", defaults.viewport.height),
            ),
            auto_start: env_or("AUTO_START", defaults.auto_start),
        }
    }

    fn game_config(&self) -> Result<GameConfig, ConfigError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }
        GameConfig::new(self.viewport)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing with timestamped logs
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("Starting...");

    let config = Config::from_env();
    let game_config = config.game_config().context("invalid configuration")?;
    info!(?config, "Configuration loaded");

    // Create channels
    let (event_tx, event_rx) = mpsc::channel(256);
    let (state_tx, state_rx) = watch::channel(GameSnapshot::empty());

    // Spawn tasks
    let auto_start = config.auto_start;
    tokio::spawn(async move {
        if let Err(e) = start_world_task(game_config, auto_start, event_rx, state_tx).await {
            error!("World task failed: {}", e);
        }
    });
    tokio::spawn(start_tick_task(event_tx.clone(), config.tick_hz));

    // State logger task: log snapshot every 1 second
    let state_rx_clone = state_rx.clone();
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            let borrowed = state_rx_clone.borrow();
            info!(
                "State: phase={:?}, level={}, score={}, health={:.1}, sanity={:.1}, enemies={}, difficulty={:.3}",
                borrowed.phase,
                borrowed.level,
                borrowed.score,
                borrowed.health,
                borrowed.sanity,
                borrowed.enemies.len(),
                borrowed.difficulty
            );
        }
    });

    // Start API server
    // Create shared snapshot for API handlers
    let initial_snapshot = state_rx.borrow().clone();
    let current_snapshot = Arc::new(RwLock::new(initial_snapshot));

    // Start snapshot task to keep API snapshot updated
    let state_rx_for_api = state_rx.clone();
    let current_snapshot_for_task = Arc::clone(&current_snapshot);
    tokio::spawn(api::start_snapshot_task(
        state_rx_for_api,
        current_snapshot_for_task,
    ));

    let app = api::create_router(event_tx, current_snapshot, state_rx);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!("API server listening on http://localhost:{}", config.port);
    tokio::spawn(async move {
        if let Err(e) = serve(listener, app).await {
            error!("API server stopped: {}", e);
        }
    });

    // Keep the main task alive
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    Ok(())
}
