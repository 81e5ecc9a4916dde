//! Standalone game loop for local testing/demo.
//!
//! Interactive terminal version of the maze: Santa's commands print as text
//! and the player answers with arrow keys. Pressing Enter on an empty line
//! stands still and lets the turn clock run out, so unauthorized commands
//! can be waited out exactly like in the browser.

use std::io::{self, Write};

use crate::game::authority::{CommandAuthority, EscalationEvent, TurnExpiry, ValidationResult};
use crate::game::maze::{build_grid, print_maze, SolutionPath};
use crate::game::navigation::{NavigationController, Progress};
use crate::game::types::{GameMode, MoveDirection, ReasonCode, TrapRecovery};

/// Prompt the user for a movement direction; None means stand still.
fn get_player_input() -> Option<MoveDirection> {
    print!("Direction (↑ ← → ↓) or Enter to stand still: ");
    io::stdout().flush().unwrap();

    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();

    match input.trim() {
        "\x1b[A" => Some(MoveDirection::Forward),
        "\x1b[D" => Some(MoveDirection::Left),
        "\x1b[C" => Some(MoveDirection::Right),
        "\x1b[B" => Some(MoveDirection::Backward),
        _ => None,
    }
}

/// Answer the pending command, simulating the escalation clock: an empty
/// input crosses one grace boundary, two empty inputs let the turn expire.
fn resolve_turn(authority: &mut CommandAuthority) -> Result<ValidationResult, TurnExpiry> {
    if let Some(direction) = get_player_input() {
        return Ok(authority.validate_move(direction));
    }
    if let Some(EscalationEvent::Urgent { text }) = authority.tick_escalation() {
        println!("{}", text);
    }
    if let Some(direction) = get_player_input() {
        return Ok(authority.validate_move(direction));
    }
    match authority.tick_escalation() {
        Some(EscalationEvent::Expired { expiry }) => Err(expiry),
        other => unreachable!("unanswered command must expire, got {:?}", other),
    }
}

/// Run the main game loop for a single player in the terminal.
pub fn run_game_loop() {
    let grid = build_grid();
    let mut navigation =
        NavigationController::new(SolutionPath::standard(), TrapRecovery::BackToStart);
    let mut authority = CommandAuthority::new(GameMode::Classic);

    navigation.start();
    println!("Game start! Only move when Santa says so.");

    loop {
        print_maze(&grid, navigation.current_waypoint().pos);

        let (correct_move, legal_moves) = match navigation.next_command_spec() {
            Some((correct, legal)) => (correct, legal.to_vec()),
            None => break,
        };
        let command = authority.issue_command(correct_move, &legal_moves);
        println!("{}", command.text);

        match resolve_turn(&mut authority) {
            Ok(result) if result.valid => match navigation.on_validated_correct_move() {
                Progress::Win => {
                    println!("You escaped the maze in {}s!", navigation.elapsed_seconds());
                    break;
                }
                Progress::Continue => println!("{}", result.message),
            },
            Ok(result) => {
                println!("{} Back to the start!", result.message);
                navigation.on_failure(result.reason);
                navigation.resume();
                authority.reset();
            }
            Err(TurnExpiry::PatienceSuccess) => {
                navigation.on_timeout_patience_success();
                println!("Good, you waited it out.");
            }
            Err(TurnExpiry::RequiredMoveMissed) => {
                println!(
                    "{} Back to the start!",
                    ReasonCode::TimeoutRequired.message()
                );
                navigation.on_failure(ReasonCode::TimeoutRequired);
                navigation.resume();
                authority.reset();
            }
        }
    }
}
