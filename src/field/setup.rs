use super::direction::Direction;
use crate::consts;
use ratatui::layout::{Position, Positions, Rect, Size};
use thiserror::Error;

/// The dimensions of the field.  Every edge wraps around to the opposite one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Bounds {
    pub(crate) fn new(width: u16, height: u16) -> Bounds {
        Bounds { width, height }
    }

    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Iterate over every cell in the field, row by row
    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Return the number of cells along the axis that `direction` travels on
    pub(crate) fn extent(self, direction: Direction) -> u16 {
        if direction.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }
}

impl From<Size> for Bounds {
    fn from(size: Size) -> Bounds {
        Bounds::new(size.width, size.height)
    }
}

/// Where the snake starts out and how long it is
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SnakeStart {
    pub(crate) head: Position,
    pub(crate) length: u16,
    pub(crate) direction: Direction,
}

impl Default for SnakeStart {
    fn default() -> SnakeStart {
        SnakeStart {
            head: consts::DEFAULT_SNAKE_HEAD,
            length: consts::DEFAULT_SNAKE_LENGTH,
            direction: Direction::East,
        }
    }
}

/// Everything needed to start a new game session
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Setup {
    pub(crate) bounds: Bounds,
    pub(crate) snake: SnakeStart,

    /// Where to put the first food; `None` means a random empty cell
    pub(crate) food: Option<Position>,

    /// How many obstacles to scatter over the field
    pub(crate) obstacles: usize,

    /// Eating this much food wins the game
    pub(crate) food_to_win: u32,
}

impl Default for Setup {
    fn default() -> Setup {
        Setup {
            bounds: Bounds::from(consts::DEFAULT_FIELD_SIZE),
            snake: SnakeStart::default(),
            food: None,
            obstacles: consts::DEFAULT_OBSTACLES,
            food_to_win: consts::DEFAULT_FOOD_TO_WIN,
        }
    }
}

impl Setup {
    /// Check that a session can be started with these parameters and that it
    /// can run all the way to a win without running out of free cells.
    ///
    /// Self-overlap of the snake is checked by [`super::Snake::new()`].
    pub(crate) fn validate(&self) -> Result<(), SetupError> {
        let Setup {
            bounds,
            snake,
            food,
            obstacles,
            food_to_win,
        } = *self;
        if bounds.area() == 0 {
            return Err(SetupError::EmptyField);
        }
        if !bounds.contains(snake.head) {
            return Err(SetupError::OutOfBounds {
                what: "snake head",
                pos: snake.head,
            });
        }
        if food_to_win == 0 {
            return Err(SetupError::NoTarget);
        }
        if let Some(pos) = food {
            if !bounds.contains(pos) {
                return Err(SetupError::OutOfBounds { what: "food", pos });
            }
        }
        // Obstacles are never placed on the snake's starting line, and one
        // cell off that line may be needed for the food.
        let line = usize::from(bounds.extent(snake.direction));
        let off_line = bounds.area() - line;
        let needed = usize::from(snake.length)
            .saturating_add(usize::try_from(food_to_win).unwrap_or(usize::MAX))
            .saturating_add(obstacles)
            .saturating_add(1);
        let crowded_start = obstacles > 0 && obstacles.saturating_add(1) > off_line;
        if crowded_start || needed > bounds.area() {
            return Err(SetupError::TooCrowded {
                obstacles,
                food_to_win,
                cells: bounds.area(),
            });
        }
        Ok(())
    }

    /// Return the cells on which obstacles may not be placed at the start of
    /// the session: the row or column the snake is travelling along
    pub(crate) fn start_exclusion(&self) -> Exclusion {
        let SnakeStart {
            head, direction, ..
        } = self.snake;
        if direction.is_horizontal() {
            Exclusion {
                row: Some(head.y),
                column: None,
            }
        } else {
            Exclusion {
                row: None,
                column: Some(head.x),
            }
        }
    }
}

/// A row and/or column of the field to keep clear when placing a random
/// object
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Exclusion {
    /// Exclude cells with this `y` coordinate
    pub(crate) row: Option<u16>,

    /// Exclude cells with this `x` coordinate
    pub(crate) column: Option<u16>,
}

impl Exclusion {
    pub(crate) const NONE: Exclusion = Exclusion {
        row: None,
        column: None,
    };

    pub(crate) fn allows(self, pos: Position) -> bool {
        self.row != Some(pos.y) && self.column != Some(pos.x)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum SetupError {
    #[error("field must be at least 1x1")]
    EmptyField,
    #[error("{what} at ({}, {}) is outside the field", .pos.x, .pos.y)]
    OutOfBounds { what: &'static str, pos: Position },
    #[error("snake must be at least one cell long")]
    NoSnake,
    #[error("snake of length {length} does not fit in a line of {extent} cells")]
    SnakeTooLong { length: u16, extent: u16 },
    #[error("initial food at ({}, {}) overlaps the snake", .pos.x, .pos.y)]
    FoodOnSnake { pos: Position },
    #[error("food-to-win must be at least 1")]
    NoTarget,
    #[error(
        "{obstacles} obstacles and {food_to_win} food to win do not fit in a field of {cells} cells"
    )]
    TooCrowded {
        obstacles: usize,
        food_to_win: u32,
        cells: usize,
    },
}
