//! Errors for league operations.

use crate::models::game::GameId;
use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// A winner, once set, is never cleared.
    WinnerCleared,
    /// The submitted winner is not one of the game's two participants.
    WinnerNotParticipant(PlayerId),
    /// Previous and new game state disagree on identity (id, tournament, or participants).
    GameMismatch,
    /// Aggregates moved between read and apply; retry with freshly read state.
    ConcurrencyConflict,
    /// Player not found in the registry.
    PlayerNotFound(PlayerId),
    /// Tournament not found.
    TournamentNotFound(TournamentId),
    /// Game not found.
    GameNotFound(GameId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Name is empty after trimming.
    InvalidName,
    /// The same player appears twice in a tournament roster.
    DuplicateParticipant(PlayerId),
    /// Too few players for the operation.
    NotEnoughPlayers { required: usize },
}

impl LeagueError {
    /// Whether the caller should retry the operation with fresh reads.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeagueError::ConcurrencyConflict)
    }
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::WinnerCleared => write!(f, "A decided game cannot be made undecided"),
            LeagueError::WinnerNotParticipant(_) => {
                write!(f, "Winner is not a participant of this game")
            }
            LeagueError::GameMismatch => {
                write!(f, "Submitted game does not match the stored game")
            }
            LeagueError::ConcurrencyConflict => {
                write!(f, "Player records changed concurrently; retry the save")
            }
            LeagueError::PlayerNotFound(_) => write!(f, "Player not found"),
            LeagueError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            LeagueError::GameNotFound(_) => write!(f, "Game not found"),
            LeagueError::DuplicatePlayerName => {
                write!(f, "A player with this name already exists")
            }
            LeagueError::InvalidName => write!(f, "Name must not be empty"),
            LeagueError::DuplicateParticipant(_) => {
                write!(f, "A player appears more than once in the roster")
            }
            LeagueError::NotEnoughPlayers { required } => {
                write!(f, "Need at least {} players", required)
            }
        }
    }
}
