//! Hand-authored maze layout and its solution path table.
//!
//! The grid and the waypoint table are authored together and checked against
//! each other by `SolutionPath::from_table` at startup. The table is the one
//! true route: waypoint i's correct move always leads to waypoint i+1.

use crate::game::types::{Heading, MoveDirection, Position, Waypoint, WaypointKind};

/// Wall/floor map, one string per row. '#' is wall, anything else is floor.
pub const MAZE_LAYOUT: [&str; 8] = [
    "#########",
    "#....####",
    "###.#####",
    "##....###",
    "#####.###",
    "#####...#",
    "#####.###",
    "#########",
];

fn wp(
    x: usize,
    y: usize,
    facing: Heading,
    kind: WaypointKind,
    correct_move: Option<MoveDirection>,
    legal_moves: &[MoveDirection],
) -> Waypoint {
    Waypoint {
        pos: Position { x, y },
        facing,
        kind,
        correct_move,
        legal_moves: legal_moves.to_vec(),
    }
}

/// The solution path through MAZE_LAYOUT, in walking order.
pub fn waypoint_table() -> Vec<Waypoint> {
    use Heading::{East, South};
    use MoveDirection::{Forward, Left, Right};
    use WaypointKind::{Corridor, End, Junction, Start};

    vec![
        wp(1, 1, East, Start, Some(Forward), &[Forward]),
        wp(2, 1, East, Corridor, Some(Forward), &[Forward]),
        // Dead-end bait straight ahead, the real route turns off.
        wp(3, 1, East, Junction, Some(Right), &[Forward, Right]),
        wp(3, 2, South, Corridor, Some(Forward), &[Forward]),
        wp(3, 3, South, Junction, Some(Left), &[Left, Right]),
        wp(4, 3, East, Corridor, Some(Forward), &[Forward]),
        wp(5, 3, East, Corridor, Some(Right), &[Right]),
        wp(5, 4, South, Corridor, Some(Forward), &[Forward]),
        wp(5, 5, South, Junction, Some(Left), &[Forward, Left]),
        wp(6, 5, East, Corridor, Some(Forward), &[Forward]),
        wp(7, 5, East, End, None, &[]),
    ]
}
