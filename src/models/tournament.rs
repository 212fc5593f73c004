//! Tournament header: name, style tag, roster.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Pairing style. Only round-robin has a schedule generator; the tag is
/// carried as data either way.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentStyle {
    #[default]
    RoundRobin,
    SingleElimination,
}

/// A tournament: immutable after creation except for its game set.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub style: TournamentStyle,
    /// Ordered roster; scheduling is deterministic in this order.
    pub player_ids: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: impl Into<String>, style: TournamentStyle, player_ids: Vec<PlayerId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            style,
            player_ids,
            created_at: Utc::now(),
        }
    }
}
