//! Player record and lane role codes.

use super::{
    check_finite, check_text, deserialize_nullable, normalize_optional, EntityId, EntityKind,
    ModelValidationError, Record, TeamRef, NAME_MAX_CHARS, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lane role, persisted as its short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Top,
    Jungle,
    Mid,
    Bot,
    Support,
}

impl PlayerRole {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Jungle => "jungle",
            Self::Mid => "mid",
            Self::Bot => "bot",
            Self::Support => "support",
        }
    }

    /// Parses a role code, accepting the usual scene aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "jungle" | "jng" | "jg" => Some(Self::Jungle),
            "mid" | "middle" => Some(Self::Mid),
            "bot" | "bottom" | "adc" => Some(Self::Bot),
            "support" | "sup" | "supp" => Some(Self::Support),
            _ => None,
        }
    }
}

impl FromStr for PlayerRole {
    type Err = ModelValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| ModelValidationError::UnknownRole(value.to_string()))
    }
}

impl Display for PlayerRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub nickname: String,
    pub real_name: Option<String>,
    pub role: PlayerRole,
    pub country: Option<String>,
    pub team_id: Option<EntityId>,
    pub kda: f64,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
}

/// Create input for [`Player`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub nickname: String,
    #[serde(default)]
    pub real_name: Option<String>,
    pub role: PlayerRole,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub team_id: Option<EntityId>,
    #[serde(default)]
    pub kda: f64,
}

impl NewPlayer {
    pub fn new(nickname: impl Into<String>, role: PlayerRole) -> Self {
        Self {
            nickname: nickname.into(),
            real_name: None,
            role,
            country: None,
            team_id: None,
            kda: 0.0,
        }
    }
}

/// Partial update for [`Player`]. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerPatch {
    pub nickname: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub real_name: Option<Option<String>>,
    pub role: Option<PlayerRole>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub country: Option<Option<String>>,
    #[serde(deserialize_with = "deserialize_nullable")]
    pub team_id: Option<Option<EntityId>>,
    pub kda: Option<f64>,
}

impl Record for Player {
    const KIND: EntityKind = EntityKind::Player;
    type Draft = NewPlayer;
    type Patch = PlayerPatch;

    fn from_draft(draft: &NewPlayer) -> Self {
        Self {
            id: UNASSIGNED_ID,
            nickname: draft.nickname.trim().to_string(),
            real_name: normalize_optional(draft.real_name.as_deref()),
            role: draft.role,
            country: normalize_optional(draft.country.as_deref()),
            team_id: draft.team_id,
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

    fn apply_patch(&mut self, patch: &PlayerPatch) {
        if let Some(nickname) = &patch.nickname {
            self.nickname = nickname.trim().to_string();
        }
        if let Some(real_name) = &patch.real_name {
            self.real_name = normalize_optional(real_name.as_deref());
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(country) = &patch.country {
            self.country = normalize_optional(country.as_deref());
        }
        if let Some(team_id) = patch.team_id {
            self.team_id = team_id;
        }
        if let Some(kda) = patch.kda {
            self.kda = kda;
        }
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_text("nickname", &self.nickname, NAME_MAX_CHARS)?;
        check_finite("kda", self.kda)
    }

    fn team_refs(&self) -> Vec<TeamRef> {
        self.team_id
            .map(|team_id| TeamRef {
                field: "team_id",
                team_id,
            })
            .into_iter()
            .collect()
    }
}
