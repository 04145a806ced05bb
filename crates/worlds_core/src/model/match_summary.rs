//! Match summary record.
//!
//! Team sides and the winner are independent nullable references; the
//! winner is not required to be one of the two sides.

use super::{
    check_finite, check_text, deserialize_nullable, EntityId, EntityKind, ModelValidationError,
    Record, TeamRef, NAME_MAX_CHARS, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: EntityId,
    /// Tournament stage label, e.g. `Finals`.
    pub stage: String,
    pub team_a_id: Option<EntityId>,
    pub team_b_id: Option<EntityId>,
    pub winner_id: Option<EntityId>,
    pub avg_duration_min: f64,
    pub avg_kills_per_game: f64,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
}

impl MatchSummary {
    /// Whether `team_id` played on either side.
    pub fn involves(&self, team_id: EntityId) -> bool {
        self.team_a_id == Some(team_id) || self.team_b_id == Some(team_id)
    }
}

/// Create input for [`MatchSummary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMatchSummary {
    pub stage: String,
    #[serde(default)]
    pub team_a_id: Option<EntityId>,
    #[serde(default)]
    pub team_b_id: Option<EntityId>,
    #[serde(default)]
    pub winner_id: Option<EntityId>,
    #[serde(default)]
    pub avg_duration_min: f64,
    #[serde(default)]
    pub avg_kills_per_game: f64,
}

impl NewMatchSummary {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Self::default()
        }
    }
}

/// Partial update for [`MatchSummary`]. `Some(None)` clears a team reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchSummaryPatch {
    pub stage: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub team_a_id: Option<Option<EntityId>>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub team_b_id: Option<Option<EntityId>>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub winner_id: Option<Option<EntityId>>,
    pub avg_duration_min: Option<f64>,
    pub avg_kills_per_game: Option<f64>,
}

impl Record for MatchSummary {
    const KIND: EntityKind = EntityKind::MatchSummary;
    type Draft = NewMatchSummary;
    type Patch = MatchSummaryPatch;

    fn from_draft(draft: &NewMatchSummary) -> Self {
        Self {
            id: UNASSIGNED_ID,
            stage: draft.stage.trim().to_string(),
            team_a_id: draft.team_a_id,
            team_b_id: draft.team_b_id,
            winner_id: draft.winner_id,
            avg_duration_min: draft.avg_duration_min,
            avg_kills_per_game: draft.avg_kills_per_game,
            is_deleted: false,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }

    fn apply_patch(&mut self, patch: &MatchSummaryPatch) {
        if let Some(stage) = &patch.stage {
            self.stage = stage.trim().to_string();
        }
        if let Some(team_a_id) = patch.team_a_id {
            self.team_a_id = team_a_id;
        }
        if let Some(team_b_id) = patch.team_b_id {
            self.team_b_id = team_b_id;
        }
        if let Some(winner_id) = patch.winner_id {
            self.winner_id = winner_id;
        }
        if let Some(value) = patch.avg_duration_min {
            self.avg_duration_min = value;
        }
        if let Some(value) = patch.avg_kills_per_game {
            self.avg_kills_per_game = value;
        }
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_text("stage", &self.stage, NAME_MAX_CHARS)?;
        check_finite("avg_duration_min", self.avg_duration_min)?;
        check_finite("avg_kills_per_game", self.avg_kills_per_game)
    }

    fn team_refs(&self) -> Vec<TeamRef> {
        [
            ("team_a_id", self.team_a_id),
            ("team_b_id", self.team_b_id),
            ("winner_id", self.winner_id),
        ]
        .into_iter()
        .filter_map(|(field, team_id)| team_id.map(|team_id| TeamRef { field, team_id }))
        .collect()
    }
}
