//! Player, PlayerRecord, and the per-game stat line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in games and lookups).
pub type PlayerId = Uuid;

/// The four statistical events tracked per player: used both as a game's
/// absolute snapshot and as lifetime totals on the record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub bombs: u32,
    pub bouncers: u32,
    pub airballs: u32,
    pub islands: u32,
}

impl StatLine {
    /// Field-wise `self - earlier` as a signed delta (a correction may lower a counter).
    pub fn diff(&self, earlier: &StatLine) -> StatDelta {
        StatDelta {
            bombs: self.bombs as i32 - earlier.bombs as i32,
            bouncers: self.bouncers as i32 - earlier.bouncers as i32,
            airballs: self.airballs as i32 - earlier.airballs as i32,
            islands: self.islands as i32 - earlier.islands as i32,
        }
    }

    /// Accumulate another line into this one.
    pub fn add(&mut self, other: &StatLine) {
        self.bombs += other.bombs;
        self.bouncers += other.bouncers;
        self.airballs += other.airballs;
        self.islands += other.islands;
    }

    /// Whether every counter can take its adjustment without underflow.
    pub fn can_absorb(&self, delta: &StatDelta) -> bool {
        fits(self.bombs, delta.bombs)
            && fits(self.bouncers, delta.bouncers)
            && fits(self.airballs, delta.airballs)
            && fits(self.islands, delta.islands)
    }

    pub fn apply(&mut self, delta: &StatDelta) {
        self.bombs = self.bombs.saturating_add_signed(delta.bombs);
        self.bouncers = self.bouncers.saturating_add_signed(delta.bouncers);
        self.airballs = self.airballs.saturating_add_signed(delta.airballs);
        self.islands = self.islands.saturating_add_signed(delta.islands);
    }
}

/// Signed adjustment to a StatLine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    pub bombs: i32,
    pub bouncers: i32,
    pub airballs: i32,
    pub islands: i32,
}

impl StatDelta {
    pub fn is_zero(&self) -> bool {
        self.bombs == 0 && self.bouncers == 0 && self.airballs == 0 && self.islands == 0
    }
}

/// Cumulative standing of a player across all their decided games.
/// Mutated only by applying reconciliation deltas.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub points: u32,
    pub games_played: u32,
    pub games_won: u32,
    #[serde(flatten)]
    pub stats: StatLine,
}

impl PlayerRecord {
    /// Whether every field can take its adjustment without underflow.
    /// A `false` here means the delta was computed against stale state.
    pub fn can_absorb(&self, delta: &RecordDelta) -> bool {
        fits(self.points, delta.points)
            && fits(self.games_played, delta.games_played)
            && fits(self.games_won, delta.games_won)
            && self.stats.can_absorb(&delta.stats)
    }

    /// Apply a reconciliation delta. Callers check `can_absorb` first.
    pub fn apply(&mut self, delta: &RecordDelta) {
        self.points = self.points.saturating_add_signed(delta.points);
        self.games_played = self.games_played.saturating_add_signed(delta.games_played);
        self.games_won = self.games_won.saturating_add_signed(delta.games_won);
        self.stats.apply(&delta.stats);
    }
}

/// Signed adjustment to a PlayerRecord, produced by reconciliation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecordDelta {
    pub points: i32,
    pub games_played: i32,
    pub games_won: i32,
    pub stats: StatDelta,
}

impl RecordDelta {
    /// True when applying this delta would change nothing.
    pub fn is_zero(&self) -> bool {
        self.points == 0 && self.games_played == 0 && self.games_won == 0 && self.stats.is_zero()
    }
}

/// A registered player in the league.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub inserted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: PlayerRecord,
}

impl Player {
    /// Create a new player with the given name and an empty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            inserted_at: Utc::now(),
            record: PlayerRecord::default(),
        }
    }
}

fn fits(value: u32, delta: i32) -> bool {
    value.checked_add_signed(delta).is_some()
}
