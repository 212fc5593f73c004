//! Beer pong league organizer: library with models, scheduling, and
//! result-reconciliation logic.

pub mod logic;
pub mod models;
pub mod notify;
pub mod store;

pub use logic::{
    generate_schedule, reconcile, stat_leaders, tournament_standings, Reconciliation, StandingRow,
    StatLeaders, POINTS_PER_WIN,
};
pub use models::{
    Game, GameId, GameSubmission, LeagueError, Player, PlayerId, PlayerRecord, RecordDelta,
    StatDelta, StatLine, Tournament, TournamentId, TournamentStyle,
};
pub use notify::{ChangeEvent, ChangeFeed};
pub use store::LeagueStore;
