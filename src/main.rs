//! Main entry point for the game server.
//!
//! Initializes the actor system, configures application state, and launches
//! the HTTP server with the WebSocket endpoint the browser shell connects to.
//! `--demo` runs the standalone terminal loop instead.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use server::game_session::server::GameSessionManager;

pub mod config;
mod game;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    if std::env::args().any(|arg| arg == "--demo") {
        game::demo::game_loop::run_game_loop();
        return Ok(());
    }

    // Start the GameSessionManager actor (creates one session per attempt).
    // No printer/leaderboard collaborator is wired by default; tickets are logged.
    let attempts = GameSessionManager::new(None).start();

    // Shared application state for the WebSocket handler.
    let state = web::Data::new(server::state::AppState::new(attempts));

    // Start the HTTP server with the WebSocket endpoint.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
