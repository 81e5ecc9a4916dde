//! Fixed maze grid and validated solution path.
//!
//! The maze is static data: a wall/floor grid plus a parallel waypoint table
//! (see `layout`). Nothing here is generated at runtime; `from_table` only
//! checks that the authored table and the grid agree.

pub mod layout;

use crate::game::types::{Cell, Heading, MoveDirection, Position, Waypoint, WaypointKind};

/// Build the wall/floor grid from the authored layout.
pub fn build_grid() -> Vec<Vec<Cell>> {
    layout::MAZE_LAYOUT
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| if c == '#' { Cell::Wall } else { Cell::Floor })
                .collect()
        })
        .collect()
}

fn cell_at(grid: &[Vec<Cell>], pos: Position) -> Cell {
    grid[pos.y][pos.x]
}

/// The directions among {Forward, Left, Right} whose target cell is floor.
/// Backward is never legal in fixed-maze mode.
fn physical_moves(grid: &[Vec<Cell>], pos: Position, facing: Heading) -> Vec<MoveDirection> {
    let rows = grid.len();
    let cols = grid[0].len();
    [MoveDirection::Forward, MoveDirection::Left, MoveDirection::Right]
        .into_iter()
        .filter(|direction| {
            facing
                .rotated(*direction)
                .step(pos, rows, cols)
                .map(|target| cell_at(grid, target) == Cell::Floor)
                .unwrap_or(false)
        })
        .collect()
}

/// Immutable ordered list of waypoints: the one true route through the maze.
/// Created once per game session, read-only for the lifetime of an attempt.
#[derive(Debug, Clone)]
pub struct SolutionPath {
    waypoints: Vec<Waypoint>,
}

impl SolutionPath {
    /// The shipped maze. The authored table is a build-time artifact, so a
    /// validation failure here means the table was edited wrong.
    pub fn standard() -> Self {
        Self::from_table(&build_grid(), layout::waypoint_table())
            .expect("shipped maze table failed validation")
    }

    /// Validate an authored table against its grid.
    ///
    /// Checks: length and endpoint kinds, cell occupancy, correct∈legal,
    /// declared legal sets equal the physically possible sets, legal-set
    /// sizes per kind, and the chain property (each correct move lands
    /// exactly on the next waypoint with the right facing).
    pub fn from_table(grid: &[Vec<Cell>], waypoints: Vec<Waypoint>) -> Result<Self, String> {
        if waypoints.len() < 2 {
            return Err("solution path needs at least a start and an end".to_string());
        }
        if waypoints[0].kind != WaypointKind::Start {
            return Err("first waypoint must be the start".to_string());
        }
        if waypoints[waypoints.len() - 1].kind != WaypointKind::End {
            return Err("last waypoint must be the end".to_string());
        }

        for (i, waypoint) in waypoints.iter().enumerate() {
            if i > 0 && i < waypoints.len() - 1
                && !matches!(waypoint.kind, WaypointKind::Corridor | WaypointKind::Junction)
            {
                return Err(format!("waypoint {} must be a corridor or a junction", i));
            }
            if cell_at(grid, waypoint.pos) != Cell::Floor {
                return Err(format!("waypoint {} sits inside a wall", i));
            }

            let physical = physical_moves(grid, waypoint.pos, waypoint.facing);
            if waypoint.legal_moves.len() != physical.len()
                || !waypoint.legal_moves.iter().all(|m| physical.contains(m))
            {
                return Err(format!(
                    "waypoint {}: declared legal moves {:?} do not match the grid ({:?})",
                    i, waypoint.legal_moves, physical
                ));
            }

            match waypoint.kind {
                WaypointKind::End => {
                    if waypoint.correct_move.is_some() || !waypoint.legal_moves.is_empty() {
                        return Err(format!("waypoint {}: the end has no moves", i));
                    }
                }
                kind => {
                    let correct = waypoint
                        .correct_move
                        .ok_or_else(|| format!("waypoint {} has no correct move", i))?;
                    if !waypoint.legal_moves.contains(&correct) {
                        return Err(format!("waypoint {}: correct move is not legal", i));
                    }
                    let expected = if kind == WaypointKind::Junction { 2 } else { 1 };
                    if (kind == WaypointKind::Junction && waypoint.legal_moves.len() < expected)
                        || (kind != WaypointKind::Junction && waypoint.legal_moves.len() != expected)
                    {
                        return Err(format!(
                            "waypoint {}: {:?} with {} legal moves",
                            i, kind, waypoint.legal_moves.len()
                        ));
                    }
                }
            }
        }

        // Chain property: the path is linear, each exit leads to the next waypoint.
        let rows = grid.len();
        let cols = grid[0].len();
        for i in 0..waypoints.len() - 1 {
            let here = &waypoints[i];
            let next = &waypoints[i + 1];
            let correct = here.correct_move.expect("checked above");
            let heading = here.facing.rotated(correct);
            let landing = heading
                .step(here.pos, rows, cols)
                .ok_or_else(|| format!("waypoint {} walks off the grid", i))?;
            if landing != next.pos || next.facing != heading {
                return Err(format!("waypoints {} and {} do not chain", i, i + 1));
            }
        }

        Ok(SolutionPath { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub fn waypoint(&self, index: usize) -> &Waypoint {
        &self.waypoints[index]
    }
}

/// Terminal printout of the maze with the player marker, for the demo loop.
pub fn print_maze(grid: &[Vec<Cell>], player: Position) {
    for (y, row) in grid.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let symbol = if player.x == x && player.y == y {
                "P "
            } else {
                match cell {
                    Cell::Wall => "██",
                    Cell::Floor => "  ",
                }
            };
            print!("{}", symbol);
        }
        println!();
    }
}
