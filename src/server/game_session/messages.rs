use actix::prelude::*;
use serde::{Serialize, Deserialize};

use super::session::GameSessionActor;
use crate::game::authority::Command;
use crate::game::types::{Cell, GameMode, MoveDirection, Pose, ReasonCode};

/// A parsed client action forwarded from the WebSocket actor to the session.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub msg: ClientAction,
}

/// Actions the browser shell may send.
#[derive(Serialize, Deserialize)]
pub enum ClientAction {
    Start,
    Move(MoveDirection),
    Restart,
    SubmitName { name: String },
}

/// Events pushed to the browser shell, serialized as {"event":...,"data":...}.
#[derive(Message, Clone, Serialize, Debug)]
#[rtype(result = "()")]
#[serde(tag = "event", content = "data")]
pub enum GameEvent {
    /// New attempt: the maze grid for the renderer, the starting pose, the mode.
    Started {
        maze: Vec<Vec<Cell>>,
        pose: Pose,
        mode: GameMode,
    },
    /// A fresh instruction, full payload for the command bubble.
    Command(Command),
    /// Urgency re-display of the pending instruction. Text only, the
    /// underlying command never changes.
    Urgent { text: String },
    /// A validated correct move; the renderer snaps to the new pose.
    MoveAccepted { pose: Pose },
    /// An unauthorized or decoy turn was correctly waited out.
    PatienceSuccess { message: String },
    /// Turn failed. The client shows the trap screen until Resumed arrives.
    Trap { reason: ReasonCode, message: String },
    /// Play resumes after a trap, at the pose carried here.
    Resumed { pose: Pose },
    /// The maze is complete. Terminal until the client sends Restart.
    Win { elapsed_seconds: u64 },
}

/// The WebSocket actor announces itself so the session can push events.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterClient {
    pub addr: Addr<GameSessionActor>,
}

/// The WebSocket actor went away; the session shuts down.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientGone;

/// Payload handed to the printer/leaderboard collaborator at win time.
/// How it gets formatted or printed is not this crate's concern.
#[derive(Message, Clone, Serialize, Debug)]
#[rtype(result = "()")]
pub struct PrintTicket {
    pub elapsed_seconds: u64,
    pub player_name: Option<String>,
}
