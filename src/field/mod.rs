//! The game simulation: a wraparound field holding the snake, food, and
//! obstacles, advanced one tick at a time
mod direction;
mod object;
mod setup;
mod snake;
pub(crate) use self::direction::Direction;
pub(crate) use self::object::{Cell, Item, ItemKind, ObjectId, ObjectRef, Occupant};
pub(crate) use self::setup::{Bounds, Exclusion, Setup, SetupError, SnakeStart};
pub(crate) use self::snake::Snake;
use log::{debug, info, warn};
use rand::Rng;
use ratatui::layout::Position;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    bounds: Bounds,
    snake: Snake,

    /// All food & obstacles, keyed by handle
    items: BTreeMap<ObjectId, Item>,

    /// The handle to give to the next placed item
    next_id: ObjectId,

    /// Which object occupies each cell.  This is derived from `snake` and
    /// `items` and is rebuilt by `refresh()`.
    occupancy: HashMap<Position, Occupant>,

    food_eaten: u32,
    food_to_win: u32,
    state: GridState,
}

impl Grid {
    /// Start a new session: place the snake, the first food, and the
    /// obstacles.  Obstacles are kept off the row or column along which the
    /// snake starts moving.
    ///
    /// # Errors
    ///
    /// Fails if `setup` is invalid.
    pub(crate) fn new<R: Rng>(setup: &Setup, rng: &mut R) -> Result<Grid, SetupError> {
        setup.validate()?;
        let snake = Snake::new(setup.snake, setup.bounds)?;
        let mut grid = Grid {
            bounds: setup.bounds,
            snake,
            items: BTreeMap::new(),
            next_id: ObjectId::FIRST,
            occupancy: HashMap::new(),
            food_eaten: 0,
            food_to_win: setup.food_to_win,
            state: GridState::Running,
        };
        grid.refresh();
        if let Some(pos) = setup.food {
            grid.place(Item::food(pos))
                .map_err(|_| SetupError::FoodOnSnake { pos })?;
        } else {
            grid.spawn_random(ItemKind::Food, Exclusion::NONE, rng);
        }
        let exclusion = setup.start_exclusion();
        for _ in 0..setup.obstacles {
            grid.spawn_random(ItemKind::Obstacle, exclusion, rng);
        }
        debug!(
            "New {}x{} field with {} obstacles; snake at ({}, {}) heading {:?}",
            grid.bounds.width,
            grid.bounds.height,
            setup.obstacles,
            grid.snake.head().x,
            grid.snake.head().y,
            grid.snake.direction(),
        );
        Ok(grid)
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Turn the snake before the next tick.  See [`Snake::set_heading()`].
    pub(crate) fn set_heading(&mut self, direction: Direction) {
        self.snake.set_heading(direction);
    }

    /// Iterate over the food & obstacles on the field
    #[cfg(test)]
    pub(crate) fn items(&self) -> impl Iterator<Item = (ObjectId, &Item)> + '_ {
        self.items.iter().map(|(&id, item)| (id, item))
    }

    /// Iterate over everything on the field, starting with the snake
    pub(crate) fn objects(&self) -> impl Iterator<Item = ObjectRef<'_>> + '_ {
        std::iter::once(ObjectRef::Snake(&self.snake))
            .chain(self.items.values().map(ObjectRef::Item))
    }

    pub(crate) fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub(crate) fn food_to_win(&self) -> u32 {
        self.food_to_win
    }

    pub(crate) fn state(&self) -> GridState {
        self.state
    }

    pub(crate) fn running(&self) -> bool {
        self.state == GridState::Running
    }

    pub(crate) fn collided(&self) -> bool {
        self.state == GridState::Collided
    }

    #[cfg(test)]
    pub(crate) fn target_reached(&self) -> bool {
        self.state == GridState::TargetReached
    }

    /// Return what currently occupies the cell at `pos`
    pub(crate) fn cell(&self, pos: Position) -> Cell {
        match self.occupancy.get(&pos) {
            None => Cell::Empty,
            Some(Occupant::Snake { head: true }) => Cell::SnakeHead,
            Some(Occupant::Snake { head: false }) => Cell::SnakeBody,
            Some(Occupant::Item {
                kind: ItemKind::Food,
                ..
            }) => Cell::Food,
            Some(Occupant::Item {
                kind: ItemKind::Obstacle,
                ..
            }) => Cell::Obstacle,
        }
    }

    /// Put `item` on the field.
    ///
    /// # Errors
    ///
    /// Fails if the target cell is outside the field or already occupied; the
    /// field is left unchanged.
    pub(crate) fn place(&mut self, item: Item) -> Result<ObjectId, PlaceError> {
        let pos = item.pos;
        if !self.bounds.contains(pos) {
            return Err(PlaceError::OutOfBounds { pos });
        }
        if let Some(&occupant) = self.occupancy.get(&pos) {
            return Err(PlaceError::Overlap { pos, occupant });
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.items.insert(id, item);
        self.occupancy.insert(
            pos,
            Occupant::Item {
                id,
                kind: item.kind,
            },
        );
        Ok(id)
    }

    /// Place an item of the given kind on a uniformly random free cell that
    /// `exclusion` allows.
    ///
    /// # Panics
    ///
    /// Panics if there is no such cell.
    pub(crate) fn spawn_random<R: Rng>(
        &mut self,
        kind: ItemKind,
        exclusion: Exclusion,
        rng: &mut R,
    ) -> ObjectId {
        assert!(
            self.bounds
                .positions()
                .any(|p| exclusion.allows(p) && !self.occupancy.contains_key(&p)),
            "no free cell left on the field for {kind}"
        );
        loop {
            let x = rng.random_range(0..self.bounds.width);
            let y = rng.random_range(0..self.bounds.height);
            let pos = Position { x, y };
            if !exclusion.allows(pos) {
                continue;
            }
            if let Ok(id) = self.place(Item { kind, pos }) {
                debug!("Placed {kind} {id} at ({x}, {y})");
                return id;
            }
        }
    }

    /// Advance the game by one tick: move the snake and resolve whatever its
    /// head ran into.
    ///
    /// # Panics
    ///
    /// Panics if the game has already ended, or if the occupancy map names
    /// food that is no longer on the field.
    pub(crate) fn step<R: Rng>(&mut self, rng: &mut R) -> StepOutcome {
        assert!(
            self.running(),
            "Grid::step() called after the game ended ({:?})",
            self.state
        );
        self.refresh();
        self.snake.advance(self.bounds);
        let head = self.snake.head();
        // `occupancy` still describes the field before the move, so the cell
        // the tail just left shows up as snake.
        let outcome = match self.occupancy.get(&head).copied() {
            None => StepOutcome::Moved,
            Some(Occupant::Snake { .. }) if self.snake.pending_tail() == Some(head) => {
                StepOutcome::Moved
            }
            Some(Occupant::Snake { .. }) => self.collide(CollisionKind::Itself),
            Some(Occupant::Item {
                kind: ItemKind::Obstacle,
                ..
            }) => self.collide(CollisionKind::Obstacle),
            Some(Occupant::Item {
                id,
                kind: ItemKind::Food,
            }) => self.eat(id, rng),
        };
        debug_assert_eq!(
            outcome == StepOutcome::Collided(CollisionKind::Itself),
            self.snake.bites_itself(),
            "occupancy lookup and snake body disagree about self-collision"
        );
        self.refresh();
        outcome
    }

    fn collide(&mut self, kind: CollisionKind) -> StepOutcome {
        let head = self.snake.head();
        warn!("Snake collided with {kind} at ({}, {})", head.x, head.y);
        self.state = GridState::Collided;
        StepOutcome::Collided(kind)
    }

    fn eat<R: Rng>(&mut self, food: ObjectId, rng: &mut R) -> StepOutcome {
        let eaten = self.items.remove(&food);
        assert!(
            eaten.is_some(),
            "food {food} was in the occupancy map but not on the field"
        );
        self.snake.grow();
        self.food_eaten += 1;
        info!(
            "Ate food {food}; {} of {} eaten",
            self.food_eaten, self.food_to_win
        );
        // Replacement food must not land on the new head or the regrown tail
        self.refresh();
        self.spawn_random(ItemKind::Food, Exclusion::NONE, rng);
        if self.food_eaten >= self.food_to_win {
            info!("Target of {} food reached", self.food_to_win);
            self.state = GridState::TargetReached;
            StepOutcome::TargetReached
        } else {
            StepOutcome::Ate
        }
    }

    /// Rebuild the occupancy map from the snake & items
    fn refresh(&mut self) {
        self.occupancy.clear();
        for (&id, item) in &self.items {
            self.occupancy.insert(
                item.pos,
                Occupant::Item {
                    id,
                    kind: item.kind,
                },
            );
        }
        for &pos in self.snake.body().iter().skip(1) {
            self.occupancy.insert(pos, Occupant::Snake { head: false });
        }
        self.occupancy
            .insert(self.snake.head(), Occupant::Snake { head: true });
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GridState {
    Running,
    Collided,
    TargetReached,
}

/// What happened on a tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum StepOutcome {
    /// The snake moved into an empty cell
    Moved,
    /// The snake ate a piece of food and grew
    Ate,
    /// The snake ate the last piece of food needed to win
    TargetReached,
    Collided(CollisionKind),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CollisionKind {
    Itself,
    Obstacle,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKind::Itself => write!(f, "itself"),
            CollisionKind::Obstacle => write!(f, "an obstacle"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum PlaceError {
    #[error("cell ({}, {}) is already occupied by {occupant}", .pos.x, .pos.y)]
    Overlap { pos: Position, occupant: Occupant },
    #[error("cell ({}, {}) is outside the field", .pos.x, .pos.y)]
    OutOfBounds { pos: Position },
}
