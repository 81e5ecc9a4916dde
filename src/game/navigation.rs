//! Waypoint navigation controller.
//!
//! Single source of truth for "where is the player in the maze". Progress is
//! discrete: the player jumps from waypoint to waypoint, and the pose handed
//! to the renderer is always derived from the current waypoint.

use std::time::Instant;

use log::debug;

use crate::game::maze::SolutionPath;
use crate::game::types::{MoveDirection, Pose, ReasonCode, TrapRecovery, Waypoint, WaypointKind};

/// Attempt-level state machine. Trapped always goes back to Playing (at the
/// start or in place, per the configured recovery); Won is terminal until an
/// explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    NotStarted,
    Playing,
    Won,
    Trapped,
}

/// What a successfully resolved turn means for the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Win,
}

/// Per-attempt navigation state. Owned by one game session, never shared.
pub struct NavigationController {
    path: SolutionPath,
    recovery: TrapRecovery,
    path_index: usize,
    pose: Pose,
    phase: AttemptPhase,
    started_at: Option<Instant>,
}

impl NavigationController {
    pub fn new(path: SolutionPath, recovery: TrapRecovery) -> Self {
        let pose = Pose::at_waypoint(path.waypoint(0));
        NavigationController {
            path,
            recovery,
            path_index: 0,
            pose,
            phase: AttemptPhase::NotStarted,
            started_at: None,
        }
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    pub fn current_waypoint(&self) -> &Waypoint {
        self.path.waypoint(self.path_index)
    }

    /// Seconds since the attempt started. Keeps running across traps.
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }

    /// (Re)enter Playing at the first waypoint. This is the explicit external
    /// restart; traps never come back through here.
    pub fn start(&mut self) {
        self.path_index = 0;
        self.pose = Pose::at_waypoint(self.path.waypoint(0));
        self.phase = AttemptPhase::Playing;
        self.started_at = Some(Instant::now());
    }

    /// The command the authority should issue for the current waypoint, or
    /// None when the player stands on the exit.
    pub fn next_command_spec(&self) -> Option<(MoveDirection, &[MoveDirection])> {
        let waypoint = self.current_waypoint();
        if waypoint.kind == WaypointKind::End {
            return None;
        }
        let correct = waypoint
            .correct_move
            .expect("non-end waypoint without a correct move");
        Some((correct, waypoint.legal_moves.as_slice()))
    }

    /// Advance exactly one waypoint after a validated correct move.
    /// Reports Win exactly once, when the new waypoint is the end.
    pub fn on_validated_correct_move(&mut self) -> Progress {
        assert_eq!(
            self.phase,
            AttemptPhase::Playing,
            "move validated outside an active attempt"
        );
        assert!(
            self.path_index < self.path.last_index(),
            "cannot advance past the final waypoint"
        );
        self.path_index += 1;
        self.pose = Pose::at_waypoint(self.path.waypoint(self.path_index));

        if self.current_waypoint().kind == WaypointKind::End {
            self.phase = AttemptPhase::Won;
            Progress::Win
        } else {
            Progress::Continue
        }
    }

    /// An unauthorized or decoy command ran out without the player moving.
    /// No position change, same continuation as a correct move.
    pub fn on_timeout_patience_success(&mut self) -> Progress {
        assert_eq!(
            self.phase,
            AttemptPhase::Playing,
            "patience success outside an active attempt"
        );
        Progress::Continue
    }

    /// A turn failed. The session presents the trap and calls `resume` after
    /// the display delay.
    pub fn on_failure(&mut self, reason: ReasonCode) {
        assert_eq!(
            self.phase,
            AttemptPhase::Playing,
            "trap signaled outside an active attempt"
        );
        debug!(
            "[Navigation] trap at waypoint {}: {:?}",
            self.path_index, reason
        );
        self.phase = AttemptPhase::Trapped;
    }

    /// Re-enter Playing after a trap, at the start or in place per the
    /// configured difficulty.
    pub fn resume(&mut self) {
        assert_eq!(
            self.phase,
            AttemptPhase::Trapped,
            "resume called without a trap"
        );
        if self.recovery == TrapRecovery::BackToStart {
            self.path_index = 0;
            self.pose = Pose::at_waypoint(self.path.waypoint(0));
        }
        self.phase = AttemptPhase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::maze::SolutionPath;
    use crate::game::types::{ReasonCode, TrapRecovery};

    fn playing(recovery: TrapRecovery) -> NavigationController {
        let mut navigation = NavigationController::new(SolutionPath::standard(), recovery);
        navigation.start();
        navigation
    }

    #[test]
    fn walks_the_whole_path_and_wins_exactly_once() {
        let mut navigation = playing(TrapRecovery::ResumeHere);
        let last = SolutionPath::standard().last_index();

        let mut wins = 0;
        for expected_index in 1..=last {
            match navigation.on_validated_correct_move() {
                Progress::Win => wins += 1,
                Progress::Continue => {}
            }
            assert_eq!(navigation.path_index(), expected_index);
        }
        assert_eq!(wins, 1);
        assert_eq!(navigation.phase(), AttemptPhase::Won);
        assert!(navigation.next_command_spec().is_none());
    }

    #[test]
    #[should_panic(expected = "outside an active attempt")]
    fn advancing_after_the_win_is_a_caller_bug() {
        let mut navigation = playing(TrapRecovery::ResumeHere);
        let last = SolutionPath::standard().last_index();
        for _ in 0..last {
            navigation.on_validated_correct_move();
        }
        navigation.on_validated_correct_move();
    }

    #[test]
    fn pose_is_derived_from_the_waypoint() {
        let mut navigation = playing(TrapRecovery::ResumeHere);
        navigation.on_validated_correct_move();
        let waypoint = navigation.current_waypoint();
        let pose = navigation.pose();
        assert_eq!(pose.x, waypoint.pos.x as f32 + 0.5);
        assert_eq!(pose.y, waypoint.pos.y as f32 + 0.5);
        assert_eq!(pose.angle, waypoint.facing.angle_degrees());
    }

    #[test]
    fn patience_success_leaves_the_position_alone() {
        let mut navigation = playing(TrapRecovery::ResumeHere);
        navigation.on_validated_correct_move();
        let before = navigation.path_index();
        assert_eq!(navigation.on_timeout_patience_success(), Progress::Continue);
        assert_eq!(navigation.path_index(), before);
    }

    #[test]
    fn lenient_trap_resumes_in_place() {
        let mut navigation = playing(TrapRecovery::ResumeHere);
        navigation.on_validated_correct_move();
        navigation.on_validated_correct_move();
        navigation.on_failure(ReasonCode::WrongDirection);
        assert_eq!(navigation.phase(), AttemptPhase::Trapped);
        navigation.resume();
        assert_eq!(navigation.phase(), AttemptPhase::Playing);
        assert_eq!(navigation.path_index(), 2);
    }

    #[test]
    fn hard_trap_resumes_at_the_start() {
        let mut navigation = playing(TrapRecovery::BackToStart);
        navigation.on_validated_correct_move();
        navigation.on_validated_correct_move();
        navigation.on_failure(ReasonCode::UnauthorizedMove);
        navigation.resume();
        assert_eq!(navigation.path_index(), 0);
        assert_eq!(navigation.phase(), AttemptPhase::Playing);
    }

    #[test]
    fn restart_resets_position_after_a_win() {
        let mut navigation = playing(TrapRecovery::ResumeHere);
        let last = SolutionPath::standard().last_index();
        for _ in 0..last {
            navigation.on_validated_correct_move();
        }
        assert_eq!(navigation.phase(), AttemptPhase::Won);
        navigation.start();
        assert_eq!(navigation.phase(), AttemptPhase::Playing);
        assert_eq!(navigation.path_index(), 0);
    }
}
