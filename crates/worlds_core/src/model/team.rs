//! Team record.
//!
//! # Invariants
//! - `win_rate` is never stored; it is derived from `wins` and `losses`.
//! - `wins` and `losses` are non-negative.

use super::{
    check_finite, check_text, deserialize_nullable, normalize_optional, EntityId, EntityKind,
    ModelValidationError, Record, NAME_MAX_CHARS, REGION_MAX_CHARS, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    /// League code, e.g. `LCK`.
    pub region: String,
    pub wins: i64,
    pub losses: i64,
    pub avg_kda: f64,
    /// Free-text, comma separated: `"Ahri, Lee Sin"`.
    pub favorite_champions: Option<String>,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
}

impl Team {
    /// Percentage of games won, `0.0` when no games were played.
    pub fn win_rate(&self) -> f64 {
        let games = self.wins as f64 + self.losses as f64;
        if games <= 0.0 {
            return 0.0;
        }
        (self.wins as f64 * 100.0) / games
    }

    /// Splits the favorite champions text into trimmed, non-empty names.
    pub fn favorite_champion_names(&self) -> Vec<&str> {
        self.favorite_champions
            .as_deref()
            .map(|text| {
                text.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Create input for [`Team`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub avg_kda: f64,
    #[serde(default)]
    pub favorite_champions: Option<String>,
}

impl NewTeam {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            ..Self::default()
        }
    }
}

/// Partial update for [`Team`].
///
/// `favorite_champions: Some(None)` clears the list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub region: Option<String>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub avg_kda: Option<f64>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub favorite_champions: Option<Option<String>>,
}

impl Record for Team {
    const KIND: EntityKind = EntityKind::Team;
    type Draft = NewTeam;
    type Patch = TeamPatch;

    fn from_draft(draft: &NewTeam) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: draft.name.trim().to_string(),
            region: draft.region.trim().to_string(),
            wins: draft.wins,
            losses: draft.losses,
            avg_kda: draft.avg_kda,
            favorite_champions: normalize_optional(draft.favorite_champions.as_deref()),
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

    fn apply_patch(&mut self, patch: &TeamPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(region) = &patch.region {
            self.region = region.trim().to_string();
        }
        if let Some(wins) = patch.wins {
            self.wins = wins;
        }
        if let Some(losses) = patch.losses {
            self.losses = losses;
        }
        if let Some(avg_kda) = patch.avg_kda {
            self.avg_kda = avg_kda;
        }
        if let Some(favorites) = &patch.favorite_champions {
            self.favorite_champions = normalize_optional(favorites.as_deref());
        }
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_text("name", &self.name, NAME_MAX_CHARS)?;
        check_text("region", &self.region, REGION_MAX_CHARS)?;
        if self.wins < 0 {
            return Err(ModelValidationError::NegativeValue("wins"));
        }
        if self.losses < 0 {
            return Err(ModelValidationError::NegativeValue("losses"));
        }
        check_finite("avg_kda", self.avg_kda)
    }
}
