//! HTTP and WebSocket routing configuration.
//!
//! Defines the single game endpoint. The connection is handled by a
//! dedicated WebSocket actor which manages the connection lifecycle; the
//! attempt itself lives in its own GameSession actor.

use actix_web::web;
use crate::server::game_session::session::ws_game;

/// Configure the application's WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws/game")
            .to(ws_game)
    );
}
