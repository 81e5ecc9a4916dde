use actix::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use actix::MessageResult;
use uuid::Uuid;
use log::{debug, info, warn};

use crate::config::game::{GRACE_DELAY, HOLD_DELAY_MS, TRAP_RECOVERY_DELAY};
use crate::game::authority::{CommandAuthority, EscalationEvent, TurnExpiry};
use crate::game::maze::{build_grid, SolutionPath};
use crate::game::navigation::{AttemptPhase, NavigationController, Progress};
use crate::game::types::{Cell, GameMode, MoveDirection, ReasonCode, TrapRecovery};
use crate::server::game_session::session::GameSessionActor;
use crate::server::game_session::messages::{
    ClientAction, ClientGone, GameEvent, PrintTicket, ProcessClientMessage, RegisterClient,
};

/// One maze attempt: owns the authority, the navigation state, and every
/// timer. All game semantics are routed through here; the WebSocket actor
/// only parses and serializes.
pub struct GameSession {
    pub attempt_id: Uuid,
    pub mode: GameMode,
    client: Option<Addr<GameSessionActor>>,
    printer: Option<Recipient<PrintTicket>>,
    grid: Vec<Vec<Cell>>,
    navigation: NavigationController,
    authority: CommandAuthority,
    // At most one live escalation timer; the hold/recovery delay is a
    // separate resource and never reuses this handle.
    escalation_timer: Option<SpawnHandle>,
    hold_timer: Option<SpawnHandle>,
    turn_open: bool,
    last_win_elapsed: Option<u64>,
}

impl Actor for GameSession {
    type Context = Context<Self>;
}

impl GameSession {
    pub fn new(
        attempt_id: Uuid,
        mode: GameMode,
        recovery: TrapRecovery,
        printer: Option<Recipient<PrintTicket>>,
    ) -> Self {
        GameSession {
            attempt_id,
            mode,
            client: None,
            printer,
            grid: build_grid(),
            navigation: NavigationController::new(SolutionPath::standard(), recovery),
            authority: CommandAuthority::new(mode),
            escalation_timer: None,
            hold_timer: None,
            turn_open: false,
            last_win_elapsed: None,
        }
    }

    fn send_event(&self, event: GameEvent) {
        if let Some(addr) = &self.client {
            addr.do_send(event);
        }
    }

    fn cancel_timers(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.escalation_timer.take() {
            ctx.cancel_future(handle);
        }
        if let Some(handle) = self.hold_timer.take() {
            ctx.cancel_future(handle);
        }
    }

    /// Fresh attempt: cancel whatever was in flight, reset both state
    /// owners, announce the maze, issue the first command.
    fn begin_attempt(&mut self, ctx: &mut Context<Self>) {
        self.cancel_timers(ctx);
        self.turn_open = false;
        self.last_win_elapsed = None;
        self.authority.reset();
        self.navigation.start();
        info!("[GameSession] attempt {} started, mode={:?}", self.attempt_id, self.mode);
        self.send_event(GameEvent::Started {
            maze: self.grid.clone(),
            pose: self.navigation.pose(),
            mode: self.mode,
        });
        self.next_turn(ctx);
    }

    fn next_turn(&mut self, ctx: &mut Context<Self>) {
        let (correct_move, legal_moves) = match self.navigation.next_command_spec() {
            Some((correct, legal)) => (correct, legal.to_vec()),
            // Standing on the exit: the win was already reported.
            None => return,
        };
        let command = self.authority.issue_command(correct_move, &legal_moves);
        debug!(
            "[GameSession] attempt {} command: direction={:?} authorized={} decoy={}",
            self.attempt_id, command.direction, command.authorized, command.decoy_authority
        );
        self.turn_open = true;
        self.send_event(GameEvent::Command(command));
        self.arm_escalation(ctx);
    }

    fn arm_escalation(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.escalation_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(Duration::from_secs(GRACE_DELAY), |act, ctx| {
            act.escalation_timer = None;
            act.on_escalation_tick(ctx);
        });
        self.escalation_timer = Some(handle);
    }

    fn on_escalation_tick(&mut self, ctx: &mut Context<Self>) {
        match self.authority.tick_escalation() {
            Some(EscalationEvent::Urgent { text }) => {
                self.send_event(GameEvent::Urgent { text });
                self.arm_escalation(ctx);
            }
            Some(EscalationEvent::Expired { expiry }) => {
                self.turn_open = false;
                match expiry {
                    TurnExpiry::PatienceSuccess => {
                        let progress = self.navigation.on_timeout_patience_success();
                        self.send_event(GameEvent::PatienceSuccess {
                            message: "You kept still. Santa approves.".to_string(),
                        });
                        self.route_progress(progress, ctx);
                    }
                    TurnExpiry::RequiredMoveMissed => {
                        self.trap(ReasonCode::TimeoutRequired, ctx);
                    }
                }
            }
            None => {
                // Stale tick after the turn already resolved; nothing to do.
            }
        }
    }

    fn handle_move(&mut self, direction: MoveDirection, ctx: &mut Context<Self>) {
        if !self.turn_open {
            // One response per command; late or duplicate inputs are dropped.
            warn!(
                "[GameSession] attempt {} move received outside an open turn",
                self.attempt_id
            );
            return;
        }
        self.turn_open = false;

        // A response always suppresses the escalation clock before judgment.
        if let Some(handle) = self.escalation_timer.take() {
            ctx.cancel_future(handle);
        }

        let result = self.authority.validate_move(direction);
        if result.valid {
            let progress = self.navigation.on_validated_correct_move();
            self.send_event(GameEvent::MoveAccepted {
                pose: self.navigation.pose(),
            });
            self.route_progress(progress, ctx);
        } else {
            self.trap(result.reason, ctx);
        }
    }

    fn route_progress(&mut self, progress: Progress, ctx: &mut Context<Self>) {
        match progress {
            Progress::Win => {
                let elapsed = self.navigation.elapsed_seconds();
                self.last_win_elapsed = Some(elapsed);
                info!(
                    "[GameSession] attempt {} won in {}s",
                    self.attempt_id, elapsed
                );
                self.send_event(GameEvent::Win {
                    elapsed_seconds: elapsed,
                });
            }
            Progress::Continue => self.schedule_next_turn(ctx),
        }
    }

    /// Leave the result message on screen for a moment, then issue the next
    /// command.
    fn schedule_next_turn(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.hold_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(Duration::from_millis(HOLD_DELAY_MS), |act, ctx| {
            act.hold_timer = None;
            act.next_turn(ctx);
        });
        self.hold_timer = Some(handle);
    }

    /// Present the trap, then resume play at the configured position.
    fn trap(&mut self, reason: ReasonCode, ctx: &mut Context<Self>) {
        self.navigation.on_failure(reason);
        self.send_event(GameEvent::Trap {
            reason,
            message: reason.message().to_string(),
        });
        if let Some(handle) = self.hold_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(Duration::from_secs(TRAP_RECOVERY_DELAY), |act, ctx| {
            act.hold_timer = None;
            act.navigation.resume();
            act.authority.reset();
            act.send_event(GameEvent::Resumed {
                pose: act.navigation.pose(),
            });
            act.next_turn(ctx);
        });
        self.hold_timer = Some(handle);
    }

    fn submit_name(&mut self, name: String) {
        let elapsed = match self.last_win_elapsed {
            Some(elapsed) => elapsed,
            None => {
                warn!(
                    "[GameSession] attempt {} name submitted before a win, ignored",
                    self.attempt_id
                );
                return;
            }
        };
        let ticket = PrintTicket {
            elapsed_seconds: elapsed,
            player_name: Some(name),
        };
        match &self.printer {
            Some(recipient) => recipient.do_send(ticket),
            None => info!("[GameSession] attempt {} ticket ready: {:?}", self.attempt_id, ticket),
        }
    }
}

impl Handler<RegisterClient> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterClient, _: &mut Context<Self>) -> Self::Result {
        debug!("[GameSession] attempt {} client connected", self.attempt_id);
        self.client = Some(msg.addr);
    }
}

impl Handler<ClientGone> for GameSession {
    type Result = ();

    /// The attempt dies with its client; everything in flight is cancelled.
    fn handle(&mut self, _: ClientGone, ctx: &mut Context<Self>) -> Self::Result {
        debug!("[GameSession] attempt {} client gone", self.attempt_id);
        self.cancel_timers(ctx);
        self.client = None;
        ctx.stop();
    }
}

impl Handler<ProcessClientMessage> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, ctx: &mut Context<Self>) -> Self::Result {
        match msg.msg {
            ClientAction::Start => {
                if self.navigation.phase() == AttemptPhase::NotStarted {
                    self.begin_attempt(ctx);
                } else {
                    warn!(
                        "[GameSession] attempt {} Start received mid-attempt, ignored",
                        self.attempt_id
                    );
                }
            }
            ClientAction::Restart => self.begin_attempt(ctx),
            ClientAction::Move(direction) => self.handle_move(direction, ctx),
            ClientAction::SubmitName { name } => self.submit_name(name),
        }
    }
}

/// Creates one GameSession per connection and tracks the live ones.
pub struct GameSessionManager {
    printer: Option<Recipient<PrintTicket>>,
    attempts: HashMap<Uuid, Addr<GameSession>>,
}

impl GameSessionManager {
    pub fn new(printer: Option<Recipient<PrintTicket>>) -> Self {
        GameSessionManager {
            printer,
            attempts: HashMap::new(),
        }
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "CreatedAttempt")]
pub struct CreateAttempt {
    pub mode: GameMode,
    pub recovery: TrapRecovery,
}

pub struct CreatedAttempt {
    pub attempt_id: Uuid,
    pub addr: Addr<GameSession>,
}

impl Handler<CreateAttempt> for GameSessionManager {
    type Result = MessageResult<CreateAttempt>;

    fn handle(&mut self, msg: CreateAttempt, _: &mut Context<Self>) -> Self::Result {
        let attempt_id = Uuid::new_v4();
        let session =
            GameSession::new(attempt_id, msg.mode, msg.recovery, self.printer.clone()).start();
        self.attempts.insert(attempt_id, session.clone());
        info!(
            "[GameSessionManager] attempt created: {} mode={:?} recovery={:?}",
            attempt_id, msg.mode, msg.recovery
        );
        MessageResult(CreatedAttempt { attempt_id, addr: session })
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RemoveAttempt {
    pub attempt_id: Uuid,
}

impl Handler<RemoveAttempt> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: RemoveAttempt, _: &mut Context<Self>) -> Self::Result {
        if self.attempts.remove(&msg.attempt_id).is_some() {
            debug!("[GameSessionManager] attempt removed: {}", msg.attempt_id);
        }
    }
}
