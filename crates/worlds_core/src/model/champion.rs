//! Champion record: per-champion tournament performance ratios.

use super::{
    check_finite, check_text, EntityId, EntityKind, ModelValidationError, Record, NAME_MAX_CHARS,
    UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub id: EntityId,
    /// Unique lowercase handle, e.g. `ahri`.
    pub slug: String,
    pub name: String,
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub win_rate: f64,
    pub kda: f64,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
}

/// Create input for [`Champion`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewChampion {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub pick_rate: f64,
    #[serde(default)]
    pub ban_rate: f64,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub kda: f64,
}

impl NewChampion {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for [`Champion`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChampionPatch {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub pick_rate: Option<f64>,
    pub ban_rate: Option<f64>,
    pub win_rate: Option<f64>,
    pub kda: Option<f64>,
}

impl Record for Champion {
    const KIND: EntityKind = EntityKind::Champion;
    type Draft = NewChampion;
    type Patch = ChampionPatch;

    fn from_draft(draft: &NewChampion) -> Self {
        Self {
            id: UNASSIGNED_ID,
            slug: draft.slug.trim().to_string(),
            name: draft.name.trim().to_string(),
            pick_rate: draft.pick_rate,
            ban_rate: draft.ban_rate,
            win_rate: draft.win_rate,
            kda: draft.kda,
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

    fn apply_patch(&mut self, patch: &ChampionPatch) {
        if let Some(slug) = &patch.slug {
            self.slug = slug.trim().to_string();
        }
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(value) = patch.pick_rate {
            self.pick_rate = value;
        }
        if let Some(value) = patch.ban_rate {
            self.ban_rate = value;
        }
        if let Some(value) = patch.win_rate {
            self.win_rate = value;
        }
        if let Some(value) = patch.kda {
            self.kda = value;
        }
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_text("slug", &self.slug, NAME_MAX_CHARS)?;
        check_text("name", &self.name, NAME_MAX_CHARS)?;
        check_finite("pick_rate", self.pick_rate)?;
        check_finite("ban_rate", self.ban_rate)?;
        check_finite("win_rate", self.win_rate)?;
        check_finite("kda", self.kda)
    }
}
