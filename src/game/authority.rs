//! The command authority ("Santa").
//!
//! One instruction per turn: either a licensed move, a plain unlicensed
//! order, or (TwoVoices mode) an impostor order wearing Santa's
//! authorization markers. The authority also runs the per-command
//! escalation machine (Issued → Urgent → Expired, with Resolved absorbing)
//! and judges the player's single response.
//!
//! The wall clock lives in the session layer; this module only performs the
//! boundary transitions, so tests can drive the clock deterministically.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::game::{
    DECOY_SIDESTEP_WEIGHT, DECOY_TEMPT_WEIGHT, DECOY_VOICE_CHANCE, DECOY_WILD_WEIGHT,
    MAX_CONSECUTIVE_DECOYS, UNAUTHORIZED_CHANCE,
};
use crate::game::types::{GameMode, MoveDirection, ReasonCode, Voice};

/// Tunable probabilities of the authority. Gameplay parameters, not
/// contracts: tests bias them freely.
#[derive(Debug, Clone, Copy)]
pub struct AuthorityTuning {
    pub unauthorized_chance: f64,
    pub decoy_voice_chance: f64,
    pub max_consecutive_decoys: u32,
    pub tempt_weight: u32,
    pub sidestep_weight: u32,
    pub wild_weight: u32,
}

impl Default for AuthorityTuning {
    fn default() -> Self {
        AuthorityTuning {
            unauthorized_chance: UNAUTHORIZED_CHANCE,
            decoy_voice_chance: DECOY_VOICE_CHANCE,
            max_consecutive_decoys: MAX_CONSECUTIVE_DECOYS,
            tempt_weight: DECOY_TEMPT_WEIGHT,
            sidestep_weight: DECOY_SIDESTEP_WEIGHT,
            wild_weight: DECOY_WILD_WEIGHT,
        }
    }
}

/// One turn's instruction, as handed to the UI shell.
#[derive(Debug, Clone, Serialize)]
pub struct Command {
    pub direction: MoveDirection,
    pub authorized: bool,
    pub decoy_authority: bool,
    pub voice: Voice,
    pub text: String,
}

/// The authority's judgment of a single player response.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: ReasonCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationPhase {
    Idle,
    Issued,
    Urgent,
    Resolved,
    Expired,
}

/// One escalation boundary crossing.
#[derive(Debug, Clone, PartialEq)]
pub enum EscalationEvent {
    /// Same semantic instruction, urgency styling only.
    Urgent { text: String },
    Expired { expiry: TurnExpiry },
}

/// How an unanswered command ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnExpiry {
    /// Authorized command, no response: the player failed the turn.
    RequiredMoveMissed,
    /// Unauthorized or decoy command, no response: standing still was right.
    PatienceSuccess,
}

#[derive(Debug, Clone, Copy)]
struct ActiveCommand {
    direction: MoveDirection,
    correct: MoveDirection,
    authorized: bool,
    decoy_authority: bool,
}

/// Per-attempt authority state. Owned by one game session, never shared.
pub struct CommandAuthority<R: Rng = StdRng> {
    mode: GameMode,
    tuning: AuthorityTuning,
    rng: R,
    active: Option<ActiveCommand>,
    phase: EscalationPhase,
    consecutive_decoys: u32,
}

impl CommandAuthority<StdRng> {
    pub fn new(mode: GameMode) -> Self {
        Self::with_rng(mode, AuthorityTuning::default(), StdRng::from_os_rng())
    }
}

impl<R: Rng> CommandAuthority<R> {
    /// Injectable randomness so tests can seed and bias the draws.
    pub fn with_rng(mode: GameMode, tuning: AuthorityTuning, rng: R) -> Self {
        CommandAuthority {
            mode,
            tuning,
            rng,
            active: None,
            phase: EscalationPhase::Idle,
            consecutive_decoys: 0,
        }
    }

    pub fn phase(&self) -> EscalationPhase {
        self.phase
    }

    /// Produce this turn's instruction for the active waypoint.
    ///
    /// Authorized commands always point at the real solution. Unauthorized
    /// ones draw their direction from the tempt/sidestep/wild mixture and
    /// carry no information the player may act on. A streak of
    /// `max_consecutive_decoys` unauthorized turns forces the next one
    /// authorized, so the maze stays winnable on the clock.
    pub fn issue_command(
        &mut self,
        correct_move: MoveDirection,
        legal_moves: &[MoveDirection],
    ) -> Command {
        assert!(
            !legal_moves.is_empty(),
            "issue_command called for a waypoint without legal moves"
        );
        assert!(
            legal_moves.contains(&correct_move),
            "correct move must be one of the legal moves"
        );

        let forced = self.consecutive_decoys >= self.tuning.max_consecutive_decoys;
        let authorized = forced || !self.rng.random_bool(self.tuning.unauthorized_chance);

        let (direction, decoy_authority) = if authorized {
            self.consecutive_decoys = 0;
            (correct_move, false)
        } else {
            self.consecutive_decoys += 1;
            let direction = self.pick_decoy_direction(correct_move, legal_moves);
            let decoy_voice = self.mode == GameMode::TwoVoices
                && self.rng.random_bool(self.tuning.decoy_voice_chance);
            (direction, decoy_voice)
        };

        let voice = if decoy_authority { Voice::Impostor } else { Voice::Santa };
        let text = phrase(direction, authorized || decoy_authority, false);

        self.active = Some(ActiveCommand {
            direction,
            correct: correct_move,
            authorized,
            decoy_authority,
        });
        self.phase = EscalationPhase::Issued;

        Command {
            direction,
            authorized,
            decoy_authority,
            voice,
            text,
        }
    }

    /// Direction of an unauthorized command. Sometimes the correct move
    /// (maximally tempting), sometimes another legal option, sometimes
    /// anything at all.
    fn pick_decoy_direction(
        &mut self,
        correct_move: MoveDirection,
        legal_moves: &[MoveDirection],
    ) -> MoveDirection {
        let total = self.tuning.tempt_weight + self.tuning.sidestep_weight + self.tuning.wild_weight;
        let roll = self.rng.random_range(0..total);

        if roll < self.tuning.tempt_weight {
            return correct_move;
        }
        if roll < self.tuning.tempt_weight + self.tuning.sidestep_weight {
            let sidestep = legal_moves
                .iter()
                .copied()
                .filter(|direction| *direction != correct_move)
                .choose(&mut self.rng);
            if let Some(direction) = sidestep {
                return direction;
            }
            // Single-option waypoint, fall through to a wild pick.
        }
        MoveDirection::ALL[self.rng.random_range(0..MoveDirection::ALL.len())]
    }

    /// Judge the player's response to the pending command.
    ///
    /// At most one call per issued command; calling without a pending
    /// command or after the turn resolved is a caller bug. The session layer
    /// must cancel the escalation timer before calling.
    pub fn validate_move(&mut self, player_direction: MoveDirection) -> ValidationResult {
        let active = self
            .active
            .expect("validate_move called with no pending command");
        assert!(
            matches!(self.phase, EscalationPhase::Issued | EscalationPhase::Urgent),
            "validate_move called on an already resolved command"
        );
        self.phase = EscalationPhase::Resolved;

        let reason = if active.decoy_authority {
            ReasonCode::DecoyAuthority
        } else if !active.authorized {
            ReasonCode::UnauthorizedMove
        } else if player_direction == active.correct {
            ReasonCode::Correct
        } else {
            ReasonCode::WrongDirection
        };

        ValidationResult {
            valid: reason == ReasonCode::Correct,
            reason,
            message: reason.message().to_string(),
        }
    }

    /// Cross one grace boundary of the escalation machine.
    ///
    /// Issued → Urgent re-displays the same instruction with urgency text;
    /// Urgent → Expired reports how the turn ran out. Resolved and Expired
    /// commands tick to None: an expiry can never fire twice, and a resolved
    /// turn can never expire.
    pub fn tick_escalation(&mut self) -> Option<EscalationEvent> {
        match self.phase {
            EscalationPhase::Issued => {
                let active = self.active.expect("issued phase without a command");
                self.phase = EscalationPhase::Urgent;
                Some(EscalationEvent::Urgent {
                    text: phrase(
                        active.direction,
                        active.authorized || active.decoy_authority,
                        true,
                    ),
                })
            }
            EscalationPhase::Urgent => {
                let active = self.active.expect("urgent phase without a command");
                self.phase = EscalationPhase::Expired;
                let expiry = if active.authorized {
                    TurnExpiry::RequiredMoveMissed
                } else {
                    TurnExpiry::PatienceSuccess
                };
                Some(EscalationEvent::Expired { expiry })
            }
            _ => None,
        }
    }

    /// Clear all per-command and per-streak state. Used on trap recovery and
    /// attempt restart.
    pub fn reset(&mut self) {
        self.active = None;
        self.phase = EscalationPhase::Idle;
        self.consecutive_decoys = 0;
    }
}

fn phrase(direction: MoveDirection, with_marker: bool, urgent: bool) -> String {
    let base = if with_marker {
        format!("Santa says: {}!", direction.order_text())
    } else {
        format!("Quick, {}!", direction.order_text())
    };
    if urgent {
        format!("{} NOW!", base)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::MoveDirection::{Forward, Left, Right};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn authority(unauthorized_chance: f64) -> CommandAuthority<StdRng> {
        let tuning = AuthorityTuning {
            unauthorized_chance,
            ..AuthorityTuning::default()
        };
        CommandAuthority::with_rng(GameMode::Classic, tuning, StdRng::seed_from_u64(42))
    }

    #[test]
    fn authorized_command_always_points_at_the_solution() {
        let mut authority = authority(0.0);
        for _ in 0..50 {
            let command = authority.issue_command(Left, &[Left, Right]);
            assert!(command.authorized);
            assert_eq!(command.direction, Left);
            authority.validate_move(Left);
        }
    }

    #[test]
    fn authorized_marker_appears_in_text() {
        let mut authority = authority(0.0);
        let command = authority.issue_command(Forward, &[Forward]);
        assert!(command.text.contains("Santa says"));
        assert_eq!(command.voice, Voice::Santa);
    }

    #[test]
    fn plain_unauthorized_command_has_no_marker() {
        let mut authority = authority(1.0);
        let command = authority.issue_command(Forward, &[Forward]);
        assert!(!command.authorized);
        assert!(!command.decoy_authority);
        assert!(!command.text.contains("Santa says"));
        assert_eq!(command.voice, Voice::Santa);
    }

    #[test]
    fn decoy_voice_wears_the_marker_but_not_the_identity() {
        let tuning = AuthorityTuning {
            unauthorized_chance: 1.0,
            decoy_voice_chance: 1.0,
            ..AuthorityTuning::default()
        };
        let mut authority =
            CommandAuthority::with_rng(GameMode::TwoVoices, tuning, StdRng::seed_from_u64(7));
        let command = authority.issue_command(Forward, &[Forward]);
        assert!(!command.authorized);
        assert!(command.decoy_authority);
        assert!(command.text.contains("Santa says"));
        assert_eq!(command.voice, Voice::Impostor);
    }

    #[test]
    fn decoy_voice_never_appears_in_classic_mode() {
        let tuning = AuthorityTuning {
            unauthorized_chance: 1.0,
            decoy_voice_chance: 1.0,
            ..AuthorityTuning::default()
        };
        let mut authority =
            CommandAuthority::with_rng(GameMode::Classic, tuning, StdRng::seed_from_u64(7));
        for _ in 0..20 {
            let command = authority.issue_command(Forward, &[Forward]);
            assert!(!command.decoy_authority);
            authority.reset();
        }
    }

    #[test]
    fn streak_guard_bounds_consecutive_decoys() {
        let mut authority = authority(1.0);
        let first = authority.issue_command(Forward, &[Forward]);
        authority.validate_move(Forward);
        let second = authority.issue_command(Forward, &[Forward]);
        authority.validate_move(Forward);
        let third = authority.issue_command(Forward, &[Forward]);

        assert!(!first.authorized);
        assert!(!second.authorized);
        // Third draw hits the streak cap and must be forced authorized.
        assert!(third.authorized);
        assert_eq!(third.direction, Forward);
    }

    #[test]
    fn streak_cap_holds_over_long_runs() {
        let tuning = AuthorityTuning::default();
        let mut authority =
            CommandAuthority::with_rng(GameMode::Classic, tuning, StdRng::seed_from_u64(1234));
        let mut streak = 0u32;
        for _ in 0..500 {
            let command = authority.issue_command(Left, &[Left, Right]);
            if command.authorized {
                streak = 0;
            } else {
                streak += 1;
            }
            assert!(streak <= tuning.max_consecutive_decoys);
            authority.validate_move(Left);
        }
    }

    #[test]
    fn unauthorized_move_is_invalid_even_in_the_correct_direction() {
        let mut authority = authority(1.0);
        authority.issue_command(Left, &[Left, Right]);
        let result = authority.validate_move(Left);
        assert!(!result.valid);
        assert_eq!(result.reason, ReasonCode::UnauthorizedMove);
    }

    #[test]
    fn decoy_authority_outranks_every_other_reason() {
        let tuning = AuthorityTuning {
            unauthorized_chance: 1.0,
            decoy_voice_chance: 1.0,
            ..AuthorityTuning::default()
        };
        let mut authority =
            CommandAuthority::with_rng(GameMode::TwoVoices, tuning, StdRng::seed_from_u64(7));
        let command = authority.issue_command(Left, &[Left, Right]);
        let result = authority.validate_move(command.direction);
        assert!(!result.valid);
        assert_eq!(result.reason, ReasonCode::DecoyAuthority);
    }

    #[test]
    fn wrong_direction_on_an_authorized_command() {
        let mut authority = authority(0.0);
        authority.issue_command(Left, &[Left, Right]);
        let result = authority.validate_move(Right);
        assert!(!result.valid);
        assert_eq!(result.reason, ReasonCode::WrongDirection);
    }

    #[test]
    fn escalation_walks_issued_urgent_expired_once() {
        let mut authority = authority(0.0);
        authority.issue_command(Forward, &[Forward]);

        match authority.tick_escalation() {
            Some(EscalationEvent::Urgent { text }) => assert!(text.contains("NOW")),
            other => panic!("expected urgent re-display, got {:?}", other),
        }
        assert_eq!(
            authority.tick_escalation(),
            Some(EscalationEvent::Expired {
                expiry: TurnExpiry::RequiredMoveMissed
            })
        );
        // Expired is terminal: the timeout can never fire twice.
        assert_eq!(authority.tick_escalation(), None);
    }

    #[test]
    fn unanswered_unauthorized_command_expires_into_patience_success() {
        let mut authority = authority(1.0);
        authority.issue_command(Forward, &[Forward]);
        authority.tick_escalation();
        assert_eq!(
            authority.tick_escalation(),
            Some(EscalationEvent::Expired {
                expiry: TurnExpiry::PatienceSuccess
            })
        );
    }

    #[test]
    fn validation_suppresses_the_pending_expiry() {
        let mut authority = authority(0.0);
        authority.issue_command(Forward, &[Forward]);
        authority.validate_move(Forward);
        // Deterministic clock: however far it advances now, nothing fires.
        assert_eq!(authority.tick_escalation(), None);
        assert_eq!(authority.tick_escalation(), None);
        assert_eq!(authority.phase(), EscalationPhase::Resolved);
    }

    #[test]
    #[should_panic(expected = "no pending command")]
    fn validating_without_a_command_is_a_caller_bug() {
        let mut authority = authority(0.0);
        authority.validate_move(Forward);
    }

    #[test]
    #[should_panic(expected = "already resolved")]
    fn validating_twice_is_a_caller_bug() {
        let mut authority = authority(0.0);
        authority.issue_command(Forward, &[Forward]);
        authority.validate_move(Forward);
        authority.validate_move(Forward);
    }

    #[test]
    fn reset_clears_command_and_streak_state() {
        let mut authority = authority(1.0);
        authority.issue_command(Forward, &[Forward]);
        authority.reset();
        assert_eq!(authority.phase(), EscalationPhase::Idle);
        // The streak restarts too: two decoys are allowed again.
        let command = authority.issue_command(Forward, &[Forward]);
        assert!(!command.authorized);
    }
}
