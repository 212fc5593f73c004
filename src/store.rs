//! In-memory league store: players, tournaments, games.
//!
//! All state sits behind one `RwLock`; result submission reads a consistent snapshot,
//! reconciles outside the lock, then commits under the write lock only if the
//! per-player record versions it read are still current. Concurrent saves
//! naming the same player therefore apply as a linearizable sequence, while
//! saves for disjoint player pairs never invalidate each other.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::logic::{generate_schedule, reconcile};
use crate::models::{
    Game, GameId, GameSubmission, LeagueError, Player, PlayerId, PlayerRecord, Tournament,
    TournamentId, TournamentStyle,
};
use crate::notify::{ChangeEvent, ChangeFeed};
use tokio::sync::broadcast;

/// How many times `save_result` re-reads and re-reconciles after losing a
/// version race before surfacing the conflict to the caller.
const MAX_SAVE_ATTEMPTS: u32 = 5;

#[derive(Debug)]
struct PlayerEntry {
    player: Player,
    /// Bumped on every record change; `save_result` verifies it before applying.
    version: u64,
}

#[derive(Debug, Default)]
struct LeagueState {
    players: HashMap<PlayerId, PlayerEntry>,
    tournaments: HashMap<TournamentId, Tournament>,
    games: HashMap<GameId, Game>,
}

/// In-memory store of the whole league. Shared by handlers and tests.
#[derive(Debug, Default)]
pub struct LeagueStore {
    state: RwLock<LeagueState>,
    feed: ChangeFeed,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to committed-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }

    // --- players ---

    /// Register a player. Names are trimmed, non-empty, and unique
    /// (case-insensitive).
    pub fn register_player(&self, name: &str) -> Result<Player, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidName);
        }
        let player = {
            let mut state = self.write();
            if state
                .players
                .values()
                .any(|e| e.player.name.eq_ignore_ascii_case(name))
            {
                return Err(LeagueError::DuplicatePlayerName);
            }
            let player = Player::new(name);
            state.players.insert(
                player.id,
                PlayerEntry {
                    player: player.clone(),
                    version: 0,
                },
            );
            player
        };
        self.feed
            .publish(ChangeEvent::PlayerRegistered { player_id: player.id });
        Ok(player)
    }

    /// Rename a player. Same name rules as registration.
    pub fn rename_player(&self, id: PlayerId, name: &str) -> Result<Player, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidName);
        }
        let player = {
            let mut state = self.write();
            if state
                .players
                .values()
                .any(|e| e.player.id != id && e.player.name.eq_ignore_ascii_case(name))
            {
                return Err(LeagueError::DuplicatePlayerName);
            }
            let entry = state
                .players
                .get_mut(&id)
                .ok_or(LeagueError::PlayerNotFound(id))?;
            entry.player.name = name.to_string();
            entry.player.clone()
        };
        self.feed
            .publish(ChangeEvent::PlayerRenamed { player_id: id });
        Ok(player)
    }

    /// Remove a player from the registry. Existing games keep the id; name
    /// lookup for historical rows is the caller's concern.
    pub fn remove_player(&self, id: PlayerId) -> Result<(), LeagueError> {
        {
            let mut state = self.write();
            state
                .players
                .remove(&id)
                .ok_or(LeagueError::PlayerNotFound(id))?;
        }
        self.feed
            .publish(ChangeEvent::PlayerRemoved { player_id: id });
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Result<Player, LeagueError> {
        let state = self.read();
        state
            .players
            .get(&id)
            .map(|e| e.player.clone())
            .ok_or(LeagueError::PlayerNotFound(id))
    }

    /// All players in registration order.
    pub fn list_players(&self) -> Vec<Player> {
        let state = self.read();
        let mut players: Vec<Player> = state.players.values().map(|e| e.player.clone()).collect();
        players.sort_by(|a, b| a.inserted_at.cmp(&b.inserted_at).then(a.id.cmp(&b.id)));
        players
    }

    /// All players ordered by points, best first (the statistics view).
    pub fn players_by_points(&self) -> Vec<Player> {
        let mut players = self.list_players();
        players.sort_by(|a, b| b.record.points.cmp(&a.record.points));
        players
    }

    // --- tournaments ---

    /// Create a tournament and materialize its full round-robin schedule in
    /// one step. The roster must hold at least two distinct registered
    /// players; scheduling follows the given roster order.
    pub fn create_tournament(
        &self,
        name: &str,
        style: TournamentStyle,
        player_ids: &[PlayerId],
    ) -> Result<(Tournament, Vec<Game>), LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidName);
        }
        if player_ids.len() < 2 {
            return Err(LeagueError::NotEnoughPlayers { required: 2 });
        }
        let mut seen = HashSet::new();
        for &id in player_ids {
            if !seen.insert(id) {
                return Err(LeagueError::DuplicateParticipant(id));
            }
        }

        let (tournament, games) = {
            let mut state = self.write();
            for &id in player_ids {
                if !state.players.contains_key(&id) {
                    return Err(LeagueError::PlayerNotFound(id));
                }
            }
            let tournament = Tournament::new(name, style, player_ids.to_vec());
            let games = generate_schedule(tournament.id, player_ids);
            state.tournaments.insert(tournament.id, tournament.clone());
            for game in &games {
                state.games.insert(game.id, game.clone());
            }
            (tournament, games)
        };
        self.feed.publish(ChangeEvent::TournamentCreated {
            tournament_id: tournament.id,
            games: games.len(),
        });
        Ok((tournament, games))
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, LeagueError> {
        let state = self.read();
        state
            .tournaments
            .get(&id)
            .cloned()
            .ok_or(LeagueError::TournamentNotFound(id))
    }

    /// All tournaments, newest first.
    pub fn list_tournaments(&self) -> Vec<Tournament> {
        let state = self.read();
        let mut tournaments: Vec<Tournament> = state.tournaments.values().cloned().collect();
        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        tournaments
    }

    /// A tournament's games in schedule order.
    pub fn tournament_games(&self, id: TournamentId) -> Result<Vec<Game>, LeagueError> {
        let state = self.read();
        if !state.tournaments.contains_key(&id) {
            return Err(LeagueError::TournamentNotFound(id));
        }
        let mut games: Vec<Game> = state
            .games
            .values()
            .filter(|g| g.tournament_id == id)
            .cloned()
            .collect();
        games.sort_by_key(|g| g.game_number);
        Ok(games)
    }

    pub fn game(&self, id: GameId) -> Result<Game, LeagueError> {
        let state = self.read();
        state
            .games
            .get(&id)
            .cloned()
            .ok_or(LeagueError::GameNotFound(id))
    }

    // --- results ---

    /// Submit a result edit for a game: reads the last-persisted game and both
    /// participant records, reconciles, and commits game row plus record
    /// deltas as one unit. Losing a version race to a concurrent save retries
    /// from a fresh read; persistent interference surfaces as
    /// `ConcurrencyConflict`, which the caller may retry.
    pub fn save_result(
        &self,
        game_id: GameId,
        submission: &GameSubmission,
    ) -> Result<Game, LeagueError> {
        for attempt in 0..MAX_SAVE_ATTEMPTS {
            let (previous, record1, record2, version1, version2) = self.read_for_save(game_id)?;

            let mut new_game = previous.clone();
            new_game.stats1 = submission.stats1;
            new_game.stats2 = submission.stats2;
            new_game.winner = submission.winner;

            let outcome = reconcile(&previous, new_game, &record1, &record2)?;

            let mut state = self.write();
            let current1 = state.players.get(&outcome.game.player1).map(|e| e.version);
            let current2 = state.players.get(&outcome.game.player2).map(|e| e.version);
            match (current1, current2) {
                (Some(v1), Some(v2)) if v1 == version1 && v2 == version2 => {}
                (None, _) => return Err(LeagueError::PlayerNotFound(outcome.game.player1)),
                (_, None) => return Err(LeagueError::PlayerNotFound(outcome.game.player2)),
                _ => {
                    drop(state);
                    log::debug!(
                        "save_result: lost version race on game {} (attempt {}), re-reading",
                        game_id,
                        attempt + 1
                    );
                    continue;
                }
            }

            if !outcome.player1.is_zero() {
                if let Some(entry) = state.players.get_mut(&outcome.game.player1) {
                    entry.player.record.apply(&outcome.player1);
                    entry.version += 1;
                }
            }
            if !outcome.player2.is_zero() {
                if let Some(entry) = state.players.get_mut(&outcome.game.player2) {
                    entry.player.record.apply(&outcome.player2);
                    entry.version += 1;
                }
            }
            state.games.insert(game_id, outcome.game.clone());
            drop(state);

            self.feed.publish(ChangeEvent::GameSaved {
                tournament_id: outcome.game.tournament_id,
                game_id,
            });
            return Ok(outcome.game);
        }
        Err(LeagueError::ConcurrencyConflict)
    }

    /// Consistent read of a game plus both participant records and versions.
    fn read_for_save(
        &self,
        game_id: GameId,
    ) -> Result<(Game, PlayerRecord, PlayerRecord, u64, u64), LeagueError> {
        let state = self.read();
        let previous = state
            .games
            .get(&game_id)
            .cloned()
            .ok_or(LeagueError::GameNotFound(game_id))?;
        let entry1 = state
            .players
            .get(&previous.player1)
            .ok_or(LeagueError::PlayerNotFound(previous.player1))?;
        let entry2 = state
            .players
            .get(&previous.player2)
            .ok_or(LeagueError::PlayerNotFound(previous.player2))?;
        let record1 = entry1.player.record;
        let record2 = entry2.player.record;
        let version1 = entry1.version;
        let version2 = entry2.version;
        Ok((previous, record1, record2, version1, version2))
    }

    // Commits are all-or-nothing, so a guard recovered from a poisoned lock
    // still holds coherent state.
    fn read(&self) -> RwLockReadGuard<'_, LeagueState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LeagueState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
