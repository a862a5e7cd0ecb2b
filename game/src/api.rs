use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use qblock_engine::{PieceId, PlacementResult, Rejection};

use crate::session::{GameSession, SessionError, SessionSnapshot};

pub const API_ADDR_ENV: &str = "QBLOCK_API_ADDR";
pub const API_PORT_ENV: &str = "QBLOCK_API_PORT";
pub const DEFAULT_API_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    4000,
);

/// The mutex serializes every call against the one session.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<GameSession>>,
}

impl AppState {
    pub fn new(session: GameSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRequest {
    pub piece_id: PieceId,
    pub row: i64,
    pub col: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub accepted: bool,
    pub rejection: Option<Rejection>,
    pub piece_id: PieceId,
    pub cleared_rows: Vec<usize>,
    pub cleared_cols: Vec<usize>,
    pub cleared_count: usize,
    pub score_delta: u64,
    pub state: SessionSnapshot,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/state", get(game_state))
        .route("/api/place", post(place))
        .route("/api/new-game", post(new_game))
        .with_state(state)
        .layer(cors)
}

pub fn resolve_api_addr<F>(mut get_env: F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = get_env(API_ADDR_ENV).and_then(|v| v.parse().ok()) {
        return addr;
    }

    if let Some(port) = get_env(API_PORT_ENV).and_then(|v| v.parse::<u16>().ok()) {
        return SocketAddr::from(([127, 0, 0, 1], port));
    }

    DEFAULT_API_ADDR
}

async fn health() -> &'static str {
    "ok"
}

async fn game_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let snapshot = state.lock().snapshot();
    Json(snapshot)
}

async fn place(
    State(state): State<AppState>,
    Json(payload): Json<PlaceRequest>,
) -> Result<Json<PlaceResponse>, (StatusCode, String)> {
    let mut session = state.lock();
    let result = match session.place(payload.piece_id, payload.row, payload.col) {
        Ok(result) => result,
        Err(err @ SessionError::UnknownPiece(_)) => {
            return Err((StatusCode::NOT_FOUND, err.to_string()));
        }
        Err(err) => return Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string())),
    };

    let response = match result {
        PlacementResult::Accepted(outcome) => PlaceResponse {
            accepted: true,
            rejection: None,
            piece_id: outcome.piece_id,
            cleared_rows: outcome.cleared_rows,
            cleared_cols: outcome.cleared_cols,
            cleared_count: outcome.cleared_count,
            score_delta: outcome.score_delta,
            state: session.snapshot(),
        },
        PlacementResult::Rejected(reason) => PlaceResponse {
            accepted: false,
            rejection: Some(reason),
            piece_id: payload.piece_id,
            cleared_rows: Vec::new(),
            cleared_cols: Vec::new(),
            cleared_count: 0,
            score_delta: 0,
            state: session.snapshot(),
        },
    };
    Ok(Json(response))
}

async fn new_game(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.lock();
    session.new_game();
    Json(session.snapshot())
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "qblock api listening");
    axum::serve(listener, router(state)).await
}
