//! HTTP + WebSocket API, one tracker per session
//!
//! Endpoints:
//! - POST /session/new - Create session (optional tracker config body)
//! - GET /session/{id} - Get session status
//! - POST /session/{id}/frame - Process one keypoint frame
//! - POST /session/{id}/ear - Feed one average EAR
//! - POST /session/{id}/reset - Reset tracker
//! - DELETE /session/{id} - Drop session
//! - WS /ws/{id} - Live updates
//! - GET /health - Health check

use axum::{
    body::Bytes,
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::core::FrameAnalyzer;
use crate::types::{ConfigError, EarError, FrameInput, FrameOutput, TrackerConfig, TrackerPhase};

/// Session state
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub analyzer: FrameAnalyzer,
    pub frames_rejected: u64,
    pub update_tx: broadcast::Sender<SessionUpdate>,
}

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub session_id: String,
    pub frame: FrameOutput,
    pub frames_processed: u64,
    pub blinks_confirmed: u64,
}

/// App state
#[derive(Debug)]
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    /// Thresholds for sessions created without a config body
    pub default_config: TrackerConfig,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub config: TrackerConfig,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub phase: TrackerPhase,
    pub blinking: bool,
    pub consecutive_low_count: u32,
    pub last_ear: Option<f64>,
    pub frames_processed: u64,
    pub frames_rejected: u64,
    pub blinks_confirmed: u64,
    pub config: TrackerConfig,
}

impl SessionStatusResponse {
    fn from_session(session: &Session) -> Self {
        let tracker = session.analyzer.tracker();
        Self {
            session_id: session.id.clone(),
            phase: tracker.phase(),
            blinking: tracker.last_result(),
            consecutive_low_count: tracker.consecutive_low_count(),
            last_ear: tracker.last_ear(),
            frames_processed: tracker.frames_processed(),
            frames_rejected: session.frames_rejected,
            blinks_confirmed: tracker.blinks_confirmed(),
            config: *tracker.config(),
        }
    }
}

/// Feed EAR request
#[derive(Debug, Deserialize)]
pub struct EarRequest {
    pub avg_ear: f64,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Errors surfaced by handlers
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound,
    Frame(EarError),
    Config(ConfigError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "session not found".to_string(),
                    code: "E404_SESSION_NOT_FOUND".to_string(),
                },
            ),
            ApiError::Frame(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: err.to_string(),
                    code: err.code().to_string(),
                },
            ),
            ApiError::Config(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: err.to_string(),
                    code: err.code().to_string(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the API router
pub fn create_router(default_config: TrackerConfig) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        default_config,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/frame", post(add_frame))
        .route("/session/:id/ear", post(add_ear))
        .route("/session/:id/reset", post(reset_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session; without a body the server defaults apply
async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<NewSessionResponse>, ApiError> {
    let config = session_config(&body, state.default_config).map_err(ApiError::Config)?;
    let analyzer = FrameAnalyzer::with_config(config).map_err(ApiError::Config)?;

    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let session = Session {
        id: session_id.clone(),
        analyzer,
        frames_rejected: 0,
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(session_id = %session_id, sessions_active = sessions.len(), "session created");

    Ok(Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
        config,
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(Json(SessionStatusResponse::from_session(session)))
}

/// Drop a session and its tracker
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.write().await;
    sessions.remove(&id).ok_or(ApiError::SessionNotFound)?;
    info!(session_id = %id, sessions_active = sessions.len(), "session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Process one keypoint frame
async fn add_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<FrameInput>,
) -> Result<Json<FrameOutput>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let output = match session.analyzer.process(input.keypoints()) {
        Ok(output) => output,
        Err(err) => {
            session.frames_rejected += 1;
            return Err(ApiError::Frame(err));
        }
    };

    broadcast_update(session, &output);
    Ok(Json(output))
}

/// Feed a precomputed average EAR
async fn add_ear(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<EarRequest>,
) -> Result<Json<FrameOutput>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let output = session.analyzer.process_ear(req.avg_ear);
    broadcast_update(session, &output);
    Ok(Json(output))
}

/// Reset the session tracker
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    session.analyzer.reset();
    session.frames_rejected = 0;
    debug!(session_id = %id, "session reset");
    Ok(Json(SessionStatusResponse::from_session(session)))
}

fn broadcast_update(session: &Session, output: &FrameOutput) {
    let tracker = session.analyzer.tracker();
    let update = SessionUpdate {
        session_id: session.id.clone(),
        frame: output.clone(),
        frames_processed: tracker.frames_processed(),
        blinks_confirmed: tracker.blinks_confirmed(),
    };
    // No subscribers is fine
    let _ = session.update_tx.send(update);
}

/// Body config for a new session. Content type is not required, any
/// non-blank body must be a valid config.
fn session_config(body: &[u8], default: TrackerConfig) -> Result<TrackerConfig, ConfigError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(default);
    }
    let config: TrackerConfig = serde_json::from_slice(body)?;
    config.validate()?;
    Ok(config)
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    // Unknown sessions are reported before the upgrade handshake is checked
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward session updates until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    let mut forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    let json = serde_json::to_string(&update).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "websocket client lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut drain = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => drain.abort(),
        _ = &mut drain => forward.abort(),
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{:x}", nanos, seq)
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    default_config: TrackerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(default_config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "blinkear API listening");
    println!("blinkear API running on {}", addr);
    println!("  POST   /session/new        - Create session");
    println!("  GET    /session/:id        - Get status");
    println!("  POST   /session/:id/frame  - Process keypoint frame");
    println!("  POST   /session/:id/ear    - Feed average EAR");
    println!("  POST   /session/:id/reset  - Reset tracker");
    println!("  DELETE /session/:id        - Close session");
    println!("  WS     /ws/:id             - Live updates");
    println!("  GET    /health             - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
