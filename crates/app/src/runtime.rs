use nightmare_core::config::GameConfig;
use nightmare_core::engine::GameEngine;
use nightmare_core::events::{Event, FrameEvent};
use nightmare_core::world::GameSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, Instant, interval};
use tracing::{debug, info};

/// Starts the world task that owns the engine and publishes snapshots.
///
/// This task:
/// - Receives events from the event channel.
/// - Applies them to the GameEngine.
/// - Logs the frame events the engine reports.
/// - Sends updated snapshots to the state channel.
/// - Exits gracefully if the event channel closes.
pub async fn start_world_task(
    config: GameConfig,
    auto_start: bool,
    mut event_rx: mpsc::Receiver<Event>,
    state_tx: watch::Sender<GameSnapshot>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut engine = GameEngine::new(config);
    info!(seed = engine.generator().seed(), "World task started");
    if auto_start {
        engine.apply(Event::Start { speedrun: false });
        state_tx.send(engine.get_snapshot())?;
    }

    loop {
        match event_rx.recv().await {
            Some(event) => {
                engine.apply(event);
                for frame_event in engine.drain_frame_events() {
                    log_frame_event(&frame_event);
                }
                state_tx.send(engine.get_snapshot())?;
            }
            None => {
                info!("Event channel closed, exiting world task");
                break;
            }
        }
    }

    Ok(())
}

fn log_frame_event(event: &FrameEvent) {
    match event {
        FrameEvent::GameOver {
            score,
            level,
            time_ms,
            mode,
        } => info!(score, level, time_ms, ?mode, "Run ended"),
        FrameEvent::LevelCompleted { new_level } => info!(new_level, "Level completed"),
        other => debug!(?other, "Frame event"),
    }
}

/// Starts the tick sender task that periodically sends Tick events.
///
/// This task:
/// - Runs at the specified frequency (Hz).
/// - Computes the time delta since the last tick in milliseconds.
/// - Sends Event::Tick to the event channel.
/// - Keeps running separately to avoid blocking the world task.
pub async fn start_tick_task(
    event_tx: mpsc::Sender<Event>,
    hz: f64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let interval_secs = 1.0 / hz;
    let mut interval = interval(Duration::from_secs_f64(interval_secs));
    let mut last_time = Instant::now();
    info!(
        "Tick task started with frequency {:.2} Hz (interval {:.3}s)",
        hz, interval_secs
    );

    loop {
        interval.tick().await;
        let now = Instant::now();
        let dt_ms = now.duration_since(last_time).as_secs_f64() * 1000.0;
        last_time = now;

        let event = Event::Tick { dt_ms };
        if event_tx.send(event).await.is_err() {
            info!("Event channel closed, stopping tick task");
            break;
        }
    }

    Ok(())
}
