/// WebSocket session handler for a maze attempt.
///
/// This actor manages a single browser connection: it parses client actions
/// and forwards them to the GameSession, and serializes game events pushed
/// back to the client. No game semantics live here.
use actix::prelude::*;
use actix_web::{HttpRequest, HttpResponse, web, Error, error};
use actix_web_actors::ws;
use uuid::Uuid;
use log::warn;

use crate::game::types::{GameMode, TrapRecovery};
use crate::server::game_session::server::{CreateAttempt, GameSession, GameSessionManager, RemoveAttempt};
use crate::server::game_session::messages::{ClientAction, ClientGone, GameEvent, ProcessClientMessage, RegisterClient};
use crate::server::ws_error::ws_error_message;

pub struct GameSessionActor {
    pub attempt_id: Uuid,
    pub session_addr: Addr<GameSession>,
    pub manager_addr: Addr<GameSessionManager>,
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the connection opens. Registers with the session so it
    /// can push events.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.session_addr.do_send(RegisterClient {
            addr: ctx.address(),
        });
    }

    /// Called when the connection closes. The attempt dies with it.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.session_addr.do_send(ClientGone);
        self.manager_addr.do_send(RemoveAttempt {
            attempt_id: self.attempt_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let msg: ClientAction = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(_) => {
                        ctx.text(ws_error_message("INVALID_ACTION", "Invalid client message", None));
                        return;
                    }
                };
                self.session_addr.do_send(ProcessClientMessage { msg });
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<GameEvent> for GameSessionActor {
    type Result = ();

    /// Serializes a game event and sends it to the client.
    fn handle(&mut self, msg: GameEvent, ctx: &mut Self::Context) -> Self::Result {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("Failed to serialize game event: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Internal server error", None));
            }
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .find(|part| part.starts_with(&format!("{}=", key)))
        .and_then(|part| part.split('=').nth(1))
        .map(|value| value.to_string())
}

pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    // Mode and difficulty come from the query string:
    // /ws/game?mode=two-voices&difficulty=hard
    let query = req.query_string();
    let mode = match query_param(query, "mode").as_deref() {
        Some("two-voices") => GameMode::TwoVoices,
        _ => GameMode::Classic,
    };
    let recovery = match query_param(query, "difficulty").as_deref() {
        Some("hard") => TrapRecovery::BackToStart,
        _ => TrapRecovery::ResumeHere,
    };

    let created = data
        .attempts
        .send(CreateAttempt { mode, recovery })
        .await
        .map_err(error::ErrorInternalServerError)?;

    ws::start(
        GameSessionActor {
            attempt_id: created.attempt_id,
            session_addr: created.addr,
            manager_addr: data.attempts.clone(),
        },
        &req,
        stream,
    )
}
