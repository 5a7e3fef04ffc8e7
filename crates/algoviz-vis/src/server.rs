//! Axum web server with WebSocket streaming for playback.

use std::sync::Arc;

use algoviz_steps::{catalog, AlgorithmInfo, AlgorithmInput, AlgorithmKind};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::driver::{spawn_playback, PlaybackHandle};
use crate::error::{Error, Result};
use crate::events::PlaybackEvent;
use crate::playback::{PlaybackController, PlaybackReport};
use crate::sink::BroadcastSink;

/// Shared application state.
pub struct AppState {
    playback: PlaybackHandle,
    events: broadcast::Sender<PlaybackEvent>,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl VisServer {
    /// Create a server and spawn its playback task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let mut controller = PlaybackController::new(config.playback.clone())?;
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        controller.on_step(BroadcastSink::new(events.clone()));
        let completed = events.clone();
        controller.on_complete(move |summary| {
            let _ = completed.send(PlaybackEvent::Completed(*summary));
        });
        let cancelled = events.clone();
        controller.on_cancel(move |summary| {
            let _ = cancelled.send(PlaybackEvent::Cancelled(*summary));
        });

        Ok(Self {
            state: Arc::new(AppState {
                playback: spawn_playback(controller),
                events,
            }),
            config,
        })
    }

    /// Handle to the playback task behind this server.
    pub fn playback(&self) -> PlaybackHandle {
        self.state.playback.clone()
    }

    /// Subscribe to published playback events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.state.events.subscribe()
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/algorithms/{kind}", get(algorithm_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/resume", post(resume_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/cancel", post(cancel_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;
        info!("Visualization server running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Algorithm(_) | Error::SpeedOutOfRange { .. } | Error::InvalidConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::ControllerStopped => StatusCode::SERVICE_UNAVAILABLE,
            Error::Serialization(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    subscribers: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        subscribers: state.events.receiver_count(),
    })
}

async fn algorithms_handler() -> Json<[&'static AlgorithmInfo; 3]> {
    Json(catalog())
}

async fn algorithm_handler(Path(kind): Path<String>) -> Result<Json<&'static AlgorithmInfo>> {
    let kind: AlgorithmKind = kind.parse()?;
    Ok(Json(kind.info()))
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.report().await?))
}

#[derive(Debug, Deserialize)]
struct PlayRequest {
    algorithm: String,
    /// Omitted means the preset; an explicit `null` is an empty tree.
    #[serde(default, deserialize_with = "present_input")]
    input: Option<AlgorithmInput>,
}

/// Deserialize a present `input` field as-is, so `null` reaches
/// `AlgorithmInput` instead of collapsing into "field missing".
fn present_input<'de, D>(deserializer: D) -> std::result::Result<Option<AlgorithmInput>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    AlgorithmInput::deserialize(deserializer).map(Some)
}

impl PlayRequest {
    fn resolve(self) -> Result<(AlgorithmKind, AlgorithmInput)> {
        let kind: AlgorithmKind = self.algorithm.parse()?;
        let input = self.input.unwrap_or_else(|| AlgorithmInput::preset(kind));
        Ok((kind, input))
    }
}

async fn play_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<PlaybackReport>> {
    let (kind, input) = req.resolve()?;
    Ok(Json(state.playback.play(kind, input).await?))
}

async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.resume().await?))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.pause().await?))
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.reset().await?))
}

async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.cancel().await?))
}

async fn step_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.step().await?))
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    speed: i64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<PlaybackReport>> {
    Ok(Json(state.playback.set_speed(req.speed).await?))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    Play {
        algorithm: String,
        #[serde(default, deserialize_with = "present_input")]
        input: Option<AlgorithmInput>,
    },
    Resume,
    Pause,
    Reset,
    Cancel,
    Step,
    SetSpeed { speed: i64 },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsReply {
    Status(PlaybackReport),
    Error { message: String },
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut events = state.events.subscribe();

    // Send initial status
    let initial = match state.playback.report().await {
        Ok(report) => WsReply::Status(report),
        Err(e) => WsReply::Error { message: e.to_string() },
    };
    if send_json(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<WsCommand>(text.as_str()) {
                        Ok(cmd) => handle_ws_command(&state, cmd).await,
                        Err(e) => WsReply::Error { message: e.to_string() },
                    };
                    if send_json(&mut socket, &reply).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("WebSocket client disconnected");
                    break;
                }
                Some(Err(e)) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if send_json(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "WebSocket subscriber lagging, frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsReply {
    let playback = &state.playback;
    let result = match cmd {
        WsCommand::GetStatus => playback.report().await,
        WsCommand::Play { algorithm, input } => match (PlayRequest { algorithm, input }).resolve() {
            Ok((kind, input)) => playback.play(kind, input).await,
            Err(e) => Err(e),
        },
        WsCommand::Resume => playback.resume().await,
        WsCommand::Pause => playback.pause().await,
        WsCommand::Reset => playback.reset().await,
        WsCommand::Cancel => playback.cancel().await,
        WsCommand::Step => playback.step().await,
        WsCommand::SetSpeed { speed } => playback.set_speed(speed).await,
    };
    match result {
        Ok(report) => WsReply::Status(report),
        Err(e) => WsReply::Error { message: e.to_string() },
    }
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    if let Err(e) = socket.send(Message::Text(json.into())).await {
        warn!("Failed to send WebSocket message: {}", e);
        return Err(Error::Io(std::io::Error::other(e.to_string())));
    }
    Ok(())
}
