//! Integration tests for the league store: registration rules, tournament
//! creation, result submission, and the change feed.

use pong_league_web::{
    tournament_standings, ChangeEvent, GameSubmission, LeagueError, LeagueStore, Player, PlayerId,
    StatLine, TournamentStyle,
};
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

fn league_with_players(n: usize) -> (LeagueStore, Vec<Player>) {
    let store = LeagueStore::new();
    let players = (0..n)
        .map(|i| store.register_player(&format!("P{i}")).unwrap())
        .collect();
    (store, players)
}

fn decide(winner: PlayerId) -> GameSubmission {
    GameSubmission {
        stats1: StatLine::default(),
        stats2: StatLine::default(),
        winner: Some(winner),
    }
}

#[test]
fn names_are_trimmed_unique_and_non_empty() {
    let store = LeagueStore::new();
    let alice = store.register_player("  Alice ").unwrap();
    assert_eq!(alice.name, "Alice");

    assert_eq!(
        store.register_player("alice").unwrap_err(),
        LeagueError::DuplicatePlayerName
    );
    assert_eq!(
        store.register_player("   ").unwrap_err(),
        LeagueError::InvalidName
    );

    let bob = store.register_player("Bob").unwrap();
    assert_eq!(
        store.rename_player(bob.id, "ALICE").unwrap_err(),
        LeagueError::DuplicatePlayerName
    );
    // Renaming to a new name works; renaming to your own name is fine too.
    store.rename_player(bob.id, "Bobby").unwrap();
    store.rename_player(alice.id, "alice").unwrap();
}

#[test]
fn tournament_creation_validates_the_roster() {
    let (store, players) = league_with_players(3);

    assert_eq!(
        store
            .create_tournament("Solo", TournamentStyle::RoundRobin, &[players[0].id])
            .unwrap_err(),
        LeagueError::NotEnoughPlayers { required: 2 }
    );

    let ghost = Uuid::new_v4();
    assert_eq!(
        store
            .create_tournament("Ghost", TournamentStyle::RoundRobin, &[players[0].id, ghost])
            .unwrap_err(),
        LeagueError::PlayerNotFound(ghost)
    );

    assert_eq!(
        store
            .create_tournament(
                "Twins",
                TournamentStyle::RoundRobin,
                &[players[0].id, players[0].id]
            )
            .unwrap_err(),
        LeagueError::DuplicateParticipant(players[0].id)
    );

    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let (tournament, games) = store
        .create_tournament("Friday Night", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    assert_eq!(games.len(), 3);
    assert_eq!(store.tournament_games(tournament.id).unwrap().len(), 3);
}

#[test]
fn deciding_every_game_conserves_totals() {
    let (store, players) = league_with_players(4);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let (tournament, games) = store
        .create_tournament("League", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    assert_eq!(games.len(), 6);

    for game in &games {
        store.save_result(game.id, &decide(game.player1)).unwrap();
    }

    let decided = store.tournament_games(tournament.id).unwrap();
    assert!(decided.iter().all(|g| g.is_decided()));

    let records: Vec<_> = ids.iter().map(|&id| store.player(id).unwrap().record).collect();
    let total_won: u32 = records.iter().map(|r| r.games_won).sum();
    let total_played: u32 = records.iter().map(|r| r.games_played).sum();
    let total_points: u32 = records.iter().map(|r| r.points).sum();
    assert_eq!(total_won, 6);
    assert_eq!(total_played, 12);
    assert_eq!(total_points, 60);

    // The recomputed leaderboard agrees with the incremental records.
    let standings = tournament_standings(&decided);
    assert_eq!(standings.len(), 4);
    for row in &standings {
        let record = store.player(row.player_id).unwrap().record;
        assert_eq!(row.wins, record.games_won);
        assert_eq!(row.games_played, record.games_played);
        assert_eq!(row.stats, record.stats);
    }
}

#[test]
fn saving_stats_replaces_the_previous_snapshot() {
    let (store, players) = league_with_players(2);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let (_, games) = store
        .create_tournament("Duel", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    let game = &games[0];

    let mut submission = decide(game.player1);
    submission.stats1.bombs = 2;
    store.save_result(game.id, &submission).unwrap();
    assert_eq!(store.player(game.player1).unwrap().record.stats.bombs, 2);

    // Correcting the count to 5 moves the lifetime total by 3, not 5.
    submission.stats1.bombs = 5;
    store.save_result(game.id, &submission).unwrap();
    let record = store.player(game.player1).unwrap().record;
    assert_eq!(record.stats.bombs, 5);
    assert_eq!(record.games_played, 1);
    assert_eq!(record.points, 10);
}

#[test]
fn changing_a_winner_moves_credit_between_records() {
    let (store, players) = league_with_players(2);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let (_, games) = store
        .create_tournament("Duel", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    let game = &games[0];

    store.save_result(game.id, &decide(game.player1)).unwrap();
    store.save_result(game.id, &decide(game.player2)).unwrap();

    let record1 = store.player(game.player1).unwrap().record;
    let record2 = store.player(game.player2).unwrap().record;
    assert_eq!((record1.games_won, record1.points), (0, 0));
    assert_eq!((record2.games_won, record2.points), (1, 10));
    assert_eq!(record1.games_played, 1);
    assert_eq!(record2.games_played, 1);

    let stored = store.game(game.id).unwrap();
    assert_eq!(stored.winner, Some(game.player2));
    assert_eq!((stored.score1, stored.score2), (0, 1));
}

#[test]
fn resaving_an_identical_result_is_a_no_op() {
    let (store, players) = league_with_players(2);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let (_, games) = store
        .create_tournament("Duel", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    let game = &games[0];

    store.save_result(game.id, &decide(game.player1)).unwrap();
    let before = store.player(game.player1).unwrap().record;
    store.save_result(game.id, &decide(game.player1)).unwrap();
    let after = store.player(game.player1).unwrap().record;
    assert_eq!(before, after);
}

#[test]
fn concurrent_submissions_still_conserve_totals() {
    let (store, players) = league_with_players(6);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let (tournament, games) = store
        .create_tournament("Rush", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    assert_eq!(games.len(), 15);

    std::thread::scope(|scope| {
        for game in &games {
            let store = &store;
            scope.spawn(move || {
                let submission = decide(game.player1);
                loop {
                    match store.save_result(game.id, &submission) {
                        Ok(_) => break,
                        Err(e) if e.is_retryable() => continue,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            });
        }
    });

    let decided = store.tournament_games(tournament.id).unwrap();
    assert!(decided.iter().all(|g| g.is_decided()));

    let records: Vec<_> = ids.iter().map(|&id| store.player(id).unwrap().record).collect();
    assert_eq!(records.iter().map(|r| r.games_won).sum::<u32>(), 15);
    assert_eq!(records.iter().map(|r| r.games_played).sum::<u32>(), 30);
    assert_eq!(records.iter().map(|r| r.points).sum::<u32>(), 150);
}

#[test]
fn committed_changes_reach_subscribers_in_order() {
    let (store, players) = league_with_players(2);
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();

    let mut events = store.subscribe();

    let (tournament, games) = store
        .create_tournament("Feed", TournamentStyle::RoundRobin, &ids)
        .unwrap();
    store
        .save_result(games[0].id, &decide(games[0].player1))
        .unwrap();
    store.rename_player(ids[0], "Renamed").unwrap();

    assert_eq!(
        events.try_recv().unwrap(),
        ChangeEvent::TournamentCreated {
            tournament_id: tournament.id,
            games: 1
        }
    );
    assert_eq!(
        events.try_recv().unwrap(),
        ChangeEvent::GameSaved {
            tournament_id: tournament.id,
            game_id: games[0].id
        }
    );
    assert_eq!(
        events.try_recv().unwrap(),
        ChangeEvent::PlayerRenamed { player_id: ids[0] }
    );
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
