mod http;
mod player;
mod state;


use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub use http::{ApiError, JoinRequest, QueueResponse, get_matches, get_player, get_queue, join_queue, leave_queue};
pub use player::{DEFAULT_RATING, Player, by_rating, within_rating_spread};
pub use state::{AppState, DemoMatchmaker};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/queue", get(get_queue).post(join_queue))
        .route("/queue/{id}", get(get_player).delete(leave_queue))
        .route("/matches", get(get_matches))
        .with_state(state)
}
