use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::Entry;

pub const DEFAULT_RATING: u32 = 1_500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub rating: u32,
}

/// Lowest rating first, earlier joins first among equal ratings.
pub fn by_rating(
    a: &Entry<Player>,
    b: &Entry<Player>,
) -> Ordering {
    a.player
        .rating
        .cmp(&b.player.rating)
        .then_with(|| a.added_at.cmp(&b.added_at))
}

/// Accepts a group when its best and worst rated players are at most `max_spread` apart.
pub fn within_rating_spread(max_spread: u32) -> impl Fn(&[Entry<Player>]) -> bool + Send + Sync + 'static {
    move |group: &[Entry<Player>]| {
        let ratings = group.iter().map(|e| e.player.rating);
        match (ratings.clone().min(), ratings.max()) {
            (Some(low), Some(high)) => high - low <= max_spread,
            _ => false,
        }
    }
}
