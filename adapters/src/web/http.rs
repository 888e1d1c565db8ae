use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use application::ports::in_::MatchmakerError;
use application::ports::out_::StoreError;
use domain::Entry;

use super::player::{DEFAULT_RATING, Player};
use super::state::AppState;
use crate::LaunchedMatch;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("player {0} is not queued")]
    PlayerNotFound(Uuid),

    #[error(transparent)]
    Matchmaker(#[from] MatchmakerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Matchmaker(MatchmakerError::Store(StoreError::Unavailable(_))) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Matchmaker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
pub struct QueueResponse {
    pub players: Vec<Entry<Player>>,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub rating: Option<u32>,
}

impl From<JoinRequest> for Player {
    fn from(request: JoinRequest) -> Self {
        Player {
            id: request.id.unwrap_or_else(Uuid::new_v4),
            name: request.name,
            rating: request.rating.unwrap_or(DEFAULT_RATING),
        }
    }
}

pub async fn get_queue(State(state): State<Arc<AppState>>) -> Result<Json<QueueResponse>, ApiError> {
    let players = state.matchmaker.queue_snapshot().await?;
    let count = players.len();
    Ok(Json(QueueResponse { players, count }))
}

pub async fn join_queue(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<Entry<Player>>), ApiError> {
    let entry = state.matchmaker.add_player(Player::from(request)).await?;
    debug!(player_id = %entry.player.id, rating = entry.player.rating, "Player queued");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry<Player>>, ApiError> {
    state
        .matchmaker
        .get_player_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::PlayerNotFound(id))
}

pub async fn leave_queue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry<Player>>, ApiError> {
    let removed = state.matchmaker.remove_player_by_id(&id).await?;
    let entry = removed.ok_or(ApiError::PlayerNotFound(id))?;
    debug!(player_id = %id, "Player left the queue");
    Ok(Json(entry))
}

pub async fn get_matches(State(state): State<Arc<AppState>>) -> Json<Vec<LaunchedMatch<Player>>> {
    Json(state.matches.recent())
}
