//! Round-robin schedule generation (circle method).

use crate::models::{Game, PlayerId, TournamentId};

/// Generate the full round-robin schedule for a roster.
///
/// Circle method:
/// 1. An odd roster gets a synthetic bye slot so the working ring has even size `n`.
/// 2. Position 0 stays fixed; positions 1..n-1 rotate between rounds.
/// 3. Round `r` pairs position `i` with position `n-1-i`; any pairing that
///    hits the bye slot produces no game.
/// 4. Between rounds, the slot right after the fixed player moves to the end
///    of the ring and the rest shift one toward the front.
///
/// Every unordered pair of real players meets exactly once, each player plays
/// at most once per round, and games are numbered in emission order. A roster
/// with fewer than two players yields an empty schedule.
pub fn generate_schedule(tournament_id: TournamentId, players: &[PlayerId]) -> Vec<Game> {
    if players.len() < 2 {
        return Vec::new();
    }

    // None marks the bye slot.
    let mut ring: Vec<Option<PlayerId>> = players.iter().copied().map(Some).collect();
    if ring.len() % 2 != 0 {
        ring.push(None);
    }

    let n = ring.len();
    let mut games = Vec::with_capacity(players.len() * (players.len() - 1) / 2);

    for round in 1..=(n - 1) as u32 {
        for i in 0..n / 2 {
            if let (Some(p1), Some(p2)) = (ring[i], ring[n - 1 - i]) {
                let game_number = games.len() as u32 + 1;
                games.push(Game::new(tournament_id, round, game_number, p1, p2));
            }
        }
        // Rotate the ring, keeping position 0 fixed.
        let moved = ring.remove(1);
        ring.push(moved);
    }

    games
}
