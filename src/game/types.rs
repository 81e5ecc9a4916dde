use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

/// Absolute facing on the grid. Screen coordinates: y grows downward, so
/// turning right from East faces South.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    East,
    South,
    West,
    North,
}

impl Heading {
    pub fn angle_degrees(self) -> f32 {
        match self {
            Heading::East => 0.0,
            Heading::South => 90.0,
            Heading::West => 180.0,
            Heading::North => 270.0,
        }
    }

    /// The facing after turning in the given direction.
    pub fn rotated(self, direction: MoveDirection) -> Heading {
        let base = match self {
            Heading::East => 0,
            Heading::South => 1,
            Heading::West => 2,
            Heading::North => 3,
        };
        let offset = match direction {
            MoveDirection::Forward => 0,
            MoveDirection::Right => 1,
            MoveDirection::Backward => 2,
            MoveDirection::Left => 3,
        };
        match (base + offset) % 4 {
            0 => Heading::East,
            1 => Heading::South,
            2 => Heading::West,
            _ => Heading::North,
        }
    }

    /// One cell forward from `pos` in this heading, or None at the grid edge.
    pub fn step(self, pos: Position, rows: usize, cols: usize) -> Option<Position> {
        match self {
            Heading::East => {
                if pos.x + 1 < cols { Some(Position { x: pos.x + 1, y: pos.y }) } else { None }
            }
            Heading::South => {
                if pos.y + 1 < rows { Some(Position { x: pos.x, y: pos.y + 1 }) } else { None }
            }
            Heading::West => {
                if pos.x > 0 { Some(Position { x: pos.x - 1, y: pos.y }) } else { None }
            }
            Heading::North => {
                if pos.y > 0 { Some(Position { x: pos.x, y: pos.y - 1 }) } else { None }
            }
        }
    }
}

/// Symbolic player input, relative to the current facing.
/// Backward exists on the wire for an earlier free-roam variant but is never
/// legal in fixed-maze mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Left,
    Right,
    Backward,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Forward,
        MoveDirection::Left,
        MoveDirection::Right,
        MoveDirection::Backward,
    ];

    /// Spoken form used in command phrasing.
    pub fn order_text(self) -> &'static str {
        match self {
            MoveDirection::Forward => "go forward",
            MoveDirection::Left => "turn left",
            MoveDirection::Right => "turn right",
            MoveDirection::Backward => "turn around",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Floor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointKind {
    Start,
    Corridor,
    Junction,
    End,
}

/// One decision point of the maze solution path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub pos: Position,
    pub facing: Heading,
    pub kind: WaypointKind,
    pub correct_move: Option<MoveDirection>,
    pub legal_moves: Vec<MoveDirection>,
}

/// Player pose consumed by the renderer: cell center plus facing angle.
/// Always derived from a waypoint, never integrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl Pose {
    pub fn at_waypoint(waypoint: &Waypoint) -> Self {
        Pose {
            x: waypoint.pos.x as f32 + 0.5,
            y: waypoint.pos.y as f32 + 0.5,
            angle: waypoint.facing.angle_degrees(),
        }
    }
}

/// Game mode, chosen per attempt. TwoVoices adds the impostor who fakes
/// Santa's authorization markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    TwoVoices,
}

/// Where the player resumes after a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapRecovery {
    ResumeHere,
    BackToStart,
}

/// Speaking identity shown next to a command bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Voice {
    Santa,
    Impostor,
}

/// Outcome code for a resolved turn. All of these are expected game flow,
/// not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    Correct,
    UnauthorizedMove,
    DecoyAuthority,
    WrongDirection,
    TimeoutRequired,
}

impl ReasonCode {
    pub fn message(self) -> &'static str {
        match self {
            ReasonCode::Correct => "Well done, keep going!",
            ReasonCode::UnauthorizedMove => "No one authorized this move!",
            ReasonCode::DecoyAuthority => "The wrong voice said it!",
            ReasonCode::WrongDirection => "Santa did not say that way!",
            ReasonCode::TimeoutRequired => "Santa told you to move and you froze!",
        }
    }
}
