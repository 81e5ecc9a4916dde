// src/server/state.rs

//! Application state for the game server.
//!
//! Holds the game session manager address, shared between the WebSocket
//! handlers and the actor system.

use actix::Addr;
use crate::server::game_session::server::GameSessionManager;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the game session manager actor (creates and tracks attempts).
    pub attempts: Addr<GameSessionManager>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(attempts: Addr<GameSessionManager>) -> Self {
        AppState { attempts }
    }
}
