//! Data structures for the league: players, games, tournaments.

mod error;
mod game;
mod player;
mod tournament;

pub use error::LeagueError;
pub use game::{Game, GameId, GameSubmission};
pub use player::{Player, PlayerId, PlayerRecord, RecordDelta, StatDelta, StatLine};
pub use tournament::{Tournament, TournamentId, TournamentStyle};
