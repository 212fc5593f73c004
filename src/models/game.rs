//! Game fixtures: one row per scheduled pairing.

use crate::models::player::{PlayerId, StatLine};
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a game.
pub type GameId = Uuid;

/// A scheduled pairing between two players in a tournament.
///
/// `stats1`/`stats2` are absolute snapshots: each save overwrites the stored
/// counters with the latest reported values, never accumulates into them.
/// Once `winner` is set it holds a participant's id and is never cleared;
/// for a decided game the score is 1 for the winner and 0 for the loser.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub tournament_id: TournamentId,
    /// 1-based round within the tournament.
    pub round: u32,
    /// 1-based position in schedule emission order, global across rounds.
    pub game_number: u32,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub score1: u32,
    pub score2: u32,
    pub stats1: StatLine,
    pub stats2: StatLine,
    pub winner: Option<PlayerId>,
}

impl Game {
    /// Create an undecided game with zeroed scores and stats.
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        game_number: u32,
        player1: PlayerId,
        player2: PlayerId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            game_number,
            player1,
            player2,
            score1: 0,
            score2: 0,
            stats1: StatLine::default(),
            stats2: StatLine::default(),
            winner: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn has_participant(&self, id: PlayerId) -> bool {
        self.player1 == id || self.player2 == id
    }
}

/// Player-facing result edit for a game: the latest stat snapshots and the
/// winner as currently shown on the score sheet (None while undecided).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSubmission {
    pub stats1: StatLine,
    pub stats2: StatLine,
    pub winner: Option<PlayerId>,
}
