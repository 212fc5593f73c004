//! Result reconciliation: turn a reported game outcome into exact aggregate deltas.

use crate::models::{Game, LeagueError, PlayerId, PlayerRecord, RecordDelta};

/// Points awarded for a win, and reversed when a winner is corrected.
pub const POINTS_PER_WIN: i32 = 10;

/// Outcome of reconciling a submitted game against its last-persisted state:
/// the game row to persist and the aggregate adjustment for each participant.
/// The caller commits all three as one unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reconciliation {
    pub game: Game,
    pub player1: RecordDelta,
    pub player2: RecordDelta,
}

/// Reconcile a newly submitted game state against the previously persisted one.
///
/// `previous` must be the last-persisted row for this game (not a stale client
/// copy); `record1`/`record2` are the current aggregates for the two
/// participants. The produced deltas keep lifetime totals equal to the sum of
/// every game's current snapshot:
///
/// - Undecided → decided: both players +1 games_played; the winner +1
///   games_won and +`POINTS_PER_WIN` points.
/// - Winner changed: the prior winner's credit is reversed and the new winner
///   credited; games_played is untouched.
/// - Same winner re-saved: no standing change (idempotent).
/// - Decided → undecided: rejected; a winner is never cleared.
/// - Stats: each side's delta is the signed difference between the new and
///   previous snapshot, so re-saving replaces rather than accumulates.
///
/// Scores on the returned game are normalized to the 1/0 win/loss form when
/// the game is decided. Errors are returned before anything is produced, so
/// a failed reconcile implies no mutation anywhere.
pub fn reconcile(
    previous: &Game,
    new_game: Game,
    record1: &PlayerRecord,
    record2: &PlayerRecord,
) -> Result<Reconciliation, LeagueError> {
    if previous.id != new_game.id
        || previous.tournament_id != new_game.tournament_id
        || previous.player1 != new_game.player1
        || previous.player2 != new_game.player2
    {
        return Err(LeagueError::GameMismatch);
    }

    let mut game = new_game;
    let mut delta1 = RecordDelta::default();
    let mut delta2 = RecordDelta::default();

    match (previous.winner, game.winner) {
        (None, None) => {}
        (None, Some(winner)) => {
            delta1.games_played = 1;
            delta2.games_played = 1;
            let credit = side_of(&game, &mut delta1, &mut delta2, winner)?;
            credit.games_won = 1;
            credit.points = POINTS_PER_WIN;
        }
        (Some(old), Some(new)) if old == new => {}
        (Some(old), Some(new)) => {
            let reversal = side_of(&game, &mut delta1, &mut delta2, old)?;
            reversal.games_won = -1;
            reversal.points = -POINTS_PER_WIN;
            let credit = side_of(&game, &mut delta1, &mut delta2, new)?;
            credit.games_won = 1;
            credit.points = POINTS_PER_WIN;
        }
        (Some(_), None) => return Err(LeagueError::WinnerCleared),
    }

    // Replace, don't accumulate: net effect is the difference of snapshots.
    delta1.stats = game.stats1.diff(&previous.stats1);
    delta2.stats = game.stats2.diff(&previous.stats2);

    if let Some(winner) = game.winner {
        game.score1 = u32::from(winner == game.player1);
        game.score2 = u32::from(winner == game.player2);
    }

    // Underflow means the deltas were computed against a record that has
    // moved since `previous` was read.
    if !record1.can_absorb(&delta1) || !record2.can_absorb(&delta2) {
        return Err(LeagueError::ConcurrencyConflict);
    }

    Ok(Reconciliation {
        game,
        player1: delta1,
        player2: delta2,
    })
}

fn side_of<'a>(
    game: &Game,
    delta1: &'a mut RecordDelta,
    delta2: &'a mut RecordDelta,
    id: PlayerId,
) -> Result<&'a mut RecordDelta, LeagueError> {
    if id == game.player1 {
        Ok(delta1)
    } else if id == game.player2 {
        Ok(delta2)
    } else {
        Err(LeagueError::WinnerNotParticipant(id))
    }
}
