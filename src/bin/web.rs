//! Single binary web server: league API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use pong_league_web::{
    stat_leaders, tournament_standings, GameSubmission, LeagueError, LeagueStore, TournamentId,
    TournamentStyle,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PlayerNameBody {
    name: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    style: TournamentStyle,
    player_ids: Vec<Uuid>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and game id (e.g. /api/tournaments/{id}/games/{game_id})
#[derive(Deserialize)]
struct TournamentGamePath {
    id: TournamentId,
    game_id: Uuid,
}

/// Path segment: player id (e.g. /api/players/{player_id})
#[derive(Deserialize)]
struct PlayerPath {
    player_id: Uuid,
}

/// Map a league error to a response: missing entities are 404, a lost
/// concurrency race is 409 (retryable), everything else is a 400.
fn error_response(err: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        LeagueError::PlayerNotFound(_)
        | LeagueError::TournamentNotFound(_)
        | LeagueError::GameNotFound(_) => HttpResponse::NotFound().json(body),
        LeagueError::ConcurrencyConflict => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pong-league-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Register a new player.
#[post("/api/players")]
async fn api_register_player(store: Data<LeagueStore>, body: Json<PlayerNameBody>) -> HttpResponse {
    match store.register_player(&body.name) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// All players in registration order.
#[get("/api/players")]
async fn api_list_players(store: Data<LeagueStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.list_players())
}

/// Rename a player.
#[put("/api/players/{player_id}")]
async fn api_rename_player(
    store: Data<LeagueStore>,
    path: Path<PlayerPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    match store.rename_player(path.player_id, &body.name) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Remove a player from the registry.
#[delete("/api/players/{player_id}")]
async fn api_remove_player(store: Data<LeagueStore>, path: Path<PlayerPath>) -> HttpResponse {
    match store.remove_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "removed": path.player_id })),
        Err(e) => error_response(&e),
    }
}

/// League-wide statistics: players by points plus per-stat badge holders.
#[get("/api/statistics")]
async fn api_statistics(store: Data<LeagueStore>) -> HttpResponse {
    let players = store.players_by_points();
    let leaders = stat_leaders(&players);
    HttpResponse::Ok().json(serde_json::json!({
        "players": players,
        "leaders": leaders,
    }))
}

/// Create a tournament; its full schedule is generated and stored with it.
#[post("/api/tournaments")]
async fn api_create_tournament(
    store: Data<LeagueStore>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    match store.create_tournament(&body.name, body.style, &body.player_ids) {
        Ok((tournament, games)) => HttpResponse::Ok().json(serde_json::json!({
            "tournament": tournament,
            "games": games,
        })),
        Err(e) => error_response(&e),
    }
}

/// All tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(store: Data<LeagueStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.list_tournaments())
}

/// Get a tournament by id.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(store: Data<LeagueStore>, path: Path<TournamentPath>) -> HttpResponse {
    match store.tournament(path.id) {
        Ok(tournament) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(&e),
    }
}

/// A tournament's games in schedule order.
#[get("/api/tournaments/{id}/games")]
async fn api_tournament_games(
    store: Data<LeagueStore>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    match store.tournament_games(path.id) {
        Ok(games) => HttpResponse::Ok().json(games),
        Err(e) => error_response(&e),
    }
}

/// Leaderboard recomputed from the tournament's decided games.
#[get("/api/tournaments/{id}/leaderboard")]
async fn api_tournament_leaderboard(
    store: Data<LeagueStore>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    match store.tournament_games(path.id) {
        Ok(games) => HttpResponse::Ok().json(tournament_standings(&games)),
        Err(e) => error_response(&e),
    }
}

/// Save a game result: scores and stats replace the stored snapshot, the
/// winner transition is reconciled into both players' records.
#[put("/api/tournaments/{id}/games/{game_id}")]
async fn api_save_game(
    store: Data<LeagueStore>,
    path: Path<TournamentGamePath>,
    body: Json<GameSubmission>,
) -> HttpResponse {
    // The game must belong to the addressed tournament.
    match store.game(path.game_id) {
        Ok(game) if game.tournament_id != path.id => {
            return error_response(&LeagueError::GameNotFound(path.game_id));
        }
        Ok(_) => {}
        Err(e) => return error_response(&e),
    }
    match store.save_result(path.game_id, &body) {
        Ok(game) => HttpResponse::Ok().json(game),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = Data::new(LeagueStore::new());

    // Background task: follow the change feed and log each committed change.
    let feed_store = store.clone();
    actix_web::rt::spawn(async move {
        let mut events = feed_store.subscribe();
        loop {
            match events.recv().await {
                Ok(event) => log::info!("committed change: {:?}", event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("change feed lagged, skipped {} event(s)", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .service(api_health)
            .service(favicon)
            .service(api_register_player)
            .service(api_list_players)
            .service(api_rename_player)
            .service(api_remove_player)
            .service(api_statistics)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_tournament_games)
            .service(api_tournament_leaderboard)
            .service(api_save_game)
    })
    .bind(bind)?
    .run()
    .await
}
