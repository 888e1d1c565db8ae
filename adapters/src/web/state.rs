use std::sync::Arc;

use uuid::Uuid;

use application::ports::in_::Matchmaker;

use super::player::Player;
use crate::MatchLog;

pub type DemoMatchmaker = Matchmaker<Player, Uuid>;

pub struct AppState {
    pub matchmaker: Arc<DemoMatchmaker>,
    pub matches: Arc<MatchLog<Player>>,
}

impl AppState {
    pub fn new(
        matchmaker: Arc<DemoMatchmaker>,
        matches: Arc<MatchLog<Player>>,
    ) -> Self {
        Self { matchmaker, matches }
    }
}
