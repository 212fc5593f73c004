//! Derived standings: per-tournament leaderboard and league-wide stat leaders.

use crate::models::{Game, Player, PlayerId, StatLine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One leaderboard row, aggregated from a tournament's decided games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub player_id: PlayerId,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
    pub win_percentage: f64,
    pub stats: StatLine,
}

impl StandingRow {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            wins: 0,
            losses: 0,
            games_played: 0,
            win_percentage: 0.0,
            stats: StatLine::default(),
        }
    }
}

/// Compute the leaderboard for a set of games. Only decided games count;
/// a player with no decided game gets no row. Sorted by wins, then win
/// percentage, descending.
pub fn tournament_standings(games: &[Game]) -> Vec<StandingRow> {
    let mut rows: HashMap<PlayerId, StandingRow> = HashMap::new();

    for game in games.iter().filter(|g| g.is_decided()) {
        for (id, stats) in [(game.player1, &game.stats1), (game.player2, &game.stats2)] {
            let row = rows.entry(id).or_insert_with(|| StandingRow::new(id));
            row.games_played += 1;
            row.stats.add(stats);
        }
        let (winner, loser) = if game.winner == Some(game.player1) {
            (game.player1, game.player2)
        } else {
            (game.player2, game.player1)
        };
        if let Some(row) = rows.get_mut(&winner) {
            row.wins += 1;
        }
        if let Some(row) = rows.get_mut(&loser) {
            row.losses += 1;
        }
    }

    let mut standings: Vec<StandingRow> = rows.into_values().collect();
    for row in &mut standings {
        if row.games_played > 0 {
            row.win_percentage = row.wins as f64 / row.games_played as f64 * 100.0;
        }
    }
    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.win_percentage.total_cmp(&a.win_percentage))
    });
    standings
}

/// Per-stat badge holders across the whole league.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatLeaders {
    pub most_bombs: Option<PlayerId>,
    pub most_bouncers: Option<PlayerId>,
    pub most_airballs: Option<PlayerId>,
    pub most_islands: Option<PlayerId>,
}

/// Find the leader of each stat counter. A badge is withheld while every
/// count is zero; ties go to the earliest player in the given order.
pub fn stat_leaders(players: &[Player]) -> StatLeaders {
    StatLeaders {
        most_bombs: leader(players, |p| p.record.stats.bombs),
        most_bouncers: leader(players, |p| p.record.stats.bouncers),
        most_airballs: leader(players, |p| p.record.stats.airballs),
        most_islands: leader(players, |p| p.record.stats.islands),
    }
}

fn leader(players: &[Player], stat: impl Fn(&Player) -> u32) -> Option<PlayerId> {
    let mut best: Option<(PlayerId, u32)> = None;
    for player in players {
        let value = stat(player);
        if value == 0 {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((player.id, value)),
        }
    }
    best.map(|(id, _)| id)
}
