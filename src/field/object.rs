use super::snake::Snake;
use ratatui::layout::Position;
use std::fmt;

/// A stable handle for an item on the field.  Handles are never reused within
/// a session.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct ObjectId(u32);

impl ObjectId {
    pub(crate) const FIRST: ObjectId = ObjectId(0);

    pub(crate) fn next(self) -> ObjectId {
        ObjectId(self.0 + 1)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ObjectKind {
    Snake,
    Food,
    Obstacle,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Snake => "snake",
            ObjectKind::Food => "food",
            ObjectKind::Obstacle => "obstacle",
        };
        f.pad(name)
    }
}

/// The kinds of object that occupy exactly one cell
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ItemKind {
    Food,
    Obstacle,
}

impl From<ItemKind> for ObjectKind {
    fn from(kind: ItemKind) -> ObjectKind {
        match kind {
            ItemKind::Food => ObjectKind::Food,
            ItemKind::Obstacle => ObjectKind::Obstacle,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ObjectKind::from(*self).fmt(f)
    }
}

/// A single-cell object on the field: a piece of food or an obstacle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) pos: Position,
}

impl Item {
    pub(crate) fn food(pos: Position) -> Item {
        Item {
            kind: ItemKind::Food,
            pos,
        }
    }

    #[cfg(test)]
    pub(crate) fn obstacle(pos: Position) -> Item {
        Item {
            kind: ItemKind::Obstacle,
            pos,
        }
    }
}

/// A borrowed view of anything on the field, for drawing
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ObjectRef<'a> {
    Snake(&'a Snake),
    Item(&'a Item),
}

impl<'a> ObjectRef<'a> {
    pub(crate) fn kind(self) -> ObjectKind {
        match self {
            ObjectRef::Snake(_) => ObjectKind::Snake,
            ObjectRef::Item(item) => item.kind.into(),
        }
    }

    /// Iterate over the cells the object occupies; for the snake, the head
    /// comes first.
    pub(crate) fn cells(self) -> Box<dyn Iterator<Item = Position> + 'a> {
        match self {
            ObjectRef::Snake(snake) => Box::new(snake.body().iter().copied()),
            ObjectRef::Item(item) => Box::new(std::iter::once(item.pos)),
        }
    }
}

/// What the occupancy map records for a cell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Occupant {
    Snake { head: bool },
    Item { id: ObjectId, kind: ItemKind },
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Snake { .. } => write!(f, "the snake"),
            Occupant::Item { id, kind } => write!(f, "{kind} {id}"),
        }
    }
}

/// What a cell looks like, for rendering purposes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cell {
    Empty,
    SnakeHead,
    SnakeBody,
    Food,
    Obstacle,
}
