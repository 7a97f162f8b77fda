use axum::{
    Json, Router,
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use futures_util::{SinkExt, StreamExt};
use nightmare_core::events::{Event, InputState};
use nightmare_core::world::GameSnapshot;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, watch};
use tokio_stream::wrappers::WatchStream;
use tower_http::cors::CorsLayer;
use tracing::debug;

/// Task that keeps the current snapshot updated from the watch channel.
/// This allows async handlers to read the latest snapshot without blocking.
pub async fn start_snapshot_task(
    mut state_rx: watch::Receiver<GameSnapshot>,
    current_snapshot: Arc<RwLock<GameSnapshot>>,
) {
    loop {
        // Wait for a new snapshot from the engine
        if state_rx.changed().await.is_err() {
            // Channel closed, exit
            break;
        }

        let snapshot = state_rx.borrow().clone();
        *current_snapshot.write().await = snapshot;
    }
}

#[derive(Clone)]
pub struct AppState {
    pub event_tx: mpsc::Sender<Event>,
    pub current_snapshot: Arc<RwLock<GameSnapshot>>,
    pub state_rx: watch::Receiver<GameSnapshot>,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventRequest {
    Start {
        #[serde(default)]
        speedrun: bool,
    },
    Restart,
    Pause,
    Resume,
    Input(InputState),
}

impl From<EventRequest> for Event {
    fn from(req: EventRequest) -> Self {
        match req {
            EventRequest::Start { speedrun } => Event::Start { speedrun },
            EventRequest::Restart => Event::Restart,
            EventRequest::Pause => Event::Pause,
            EventRequest::Resume => Event::Resume,
            EventRequest::Input(input) => Event::Input(input),
        }
    }
}

pub fn create_router(
    event_tx: mpsc::Sender<Event>,
    current_snapshot: Arc<RwLock<GameSnapshot>>,
    state_rx: watch::Receiver<GameSnapshot>,
) -> Router {
    let state = AppState {
        event_tx,
        current_snapshot,
        state_rx,
    };
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/event", post(event))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "ok"
}

#[axum::debug_handler]
async fn get_state(State(app_state): State<AppState>) -> impl IntoResponse {
    let snapshot = app_state.current_snapshot.read().await.clone();
    Json(snapshot)
}

async fn event(
    State(app_state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> impl IntoResponse {
    match app_state.event_tx.send(req.into()).await {
        Ok(_) => (StatusCode::OK, "Event sent").into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send event: channel closed",
        )
            .into_response(),
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_snapshots(socket, app_state.state_rx))
}

/// Pushes every new snapshot to the client until either side hangs up.
async fn stream_snapshots(socket: WebSocket, state_rx: watch::Receiver<GameSnapshot>) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = WatchStream::new(state_rx);

    loop {
        tokio::select! {
            Some(snapshot) = updates.next() => {
                let json = match serde_json::to_string(&snapshot) {
                    Ok(json) => json,
                    Err(e) => {
                        debug!("Skipping unserializable snapshot: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            else => break,
        }
    }
    debug!("WebSocket client disconnected");
}
