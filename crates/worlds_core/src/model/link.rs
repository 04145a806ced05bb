//! Match ↔ champion association row.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// One champion played in one match. Identity is the pair itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchChampionLink {
    pub match_id: EntityId,
    pub champion_id: EntityId,
}
