use super::setup::Bounds;
use ratatui::layout::Position;
use serde::Deserialize;

/// One of the four axis-aligned headings the snake can have.
///
/// `North` is "up" on screen, i.e., towards `y == 0`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Direction {
    #[serde(alias = "up")]
    North,
    #[serde(alias = "right")]
    East,
    #[serde(alias = "down")]
    South,
    #[serde(alias = "left")]
    West,
}

impl Direction {
    /// Return the position one cell from `pos` in this direction.  Positions
    /// that would leave `bounds` wrap around to the opposite edge.
    pub(crate) fn advance(self, pos: Position, bounds: Bounds) -> Position {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::North => y = decrement_wrapping(y, bounds.height),
            Direction::East => x = increment_wrapping(x, bounds.width),
            Direction::South => y = increment_wrapping(y, bounds.height),
            Direction::West => x = decrement_wrapping(x, bounds.width),
        }
        Position { x, y }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Is this direction horizontal?
    pub(crate) fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// Return the direction as a unit vector `(dx, dy)`
    pub(crate) fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Convert a unit vector to a direction.  Returns `None` for anything
    /// other than the four axis-aligned unit vectors.
    pub(crate) fn from_delta(dx: i8, dy: i8) -> Option<Direction> {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
        .into_iter()
        .find(|d| d.delta() == (dx, dy))
    }
}

fn decrement_wrapping(x: u16, max: u16) -> u16 {
    x.checked_sub(1).unwrap_or_else(|| max.saturating_sub(1))
}

fn increment_wrapping(x: u16, max: u16) -> u16 {
    x.checked_add(1).filter(|&xx| xx < max).unwrap_or(0)
}
