use super::direction::Direction;
use super::setup::{Bounds, SetupError, SnakeStart};
use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.
///
/// The body is never empty, and its first element is the head.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first
    body: VecDeque<Position>,

    /// The direction in which the snake will move on the next tick
    direction: Direction,

    /// Whether a heading has already been requested since the last call to
    /// `advance()`
    turned: bool,

    /// The cell the tail left on the most recent `advance()`, to be reclaimed
    /// by `grow()`
    pending_tail: Option<Position>,
}

impl Snake {
    /// Create a snake with its head at `start.head`, facing `start.direction`,
    /// and with the rest of its `start.length` cells trailing behind it.
    ///
    /// # Errors
    ///
    /// Fails if the length is zero or if the body would wrap around the field
    /// onto itself.
    pub(crate) fn new(start: SnakeStart, bounds: Bounds) -> Result<Snake, SetupError> {
        let SnakeStart {
            head,
            length,
            direction,
        } = start;
        if length == 0 {
            return Err(SetupError::NoSnake);
        }
        let extent = bounds.extent(direction);
        if length > extent {
            return Err(SetupError::SnakeTooLong { length, extent });
        }
        let backwards = direction.reverse();
        let body = std::iter::successors(Some(head), |&p| Some(backwards.advance(p, bounds)))
            .take(usize::from(length))
            .collect();
        Ok(Snake {
            body,
            direction,
            turned: false,
            pending_tail: None,
        })
    }

    pub(crate) fn head(&self) -> Position {
        self.body[0]
    }

    /// Return the positions of the cells in the snake's body, head first
    pub(crate) fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Request that the snake turn to face `direction` on the next tick.
    ///
    /// Only the first request between two ticks counts, even if it is
    /// ignored; later requests are dropped.  Reversing onto the neck is never
    /// allowed.
    pub(crate) fn set_heading(&mut self, direction: Direction) {
        if std::mem::replace(&mut self.turned, true) {
            return;
        }
        if direction != self.direction.reverse() {
            self.direction = direction;
        }
    }

    /// Move the snake forwards one cell within `bounds`.  Every segment takes
    /// the place of the one ahead of it, and the head moves one cell in the
    /// current direction, wrapping around the edges.
    pub(crate) fn advance(&mut self, bounds: Bounds) {
        let new_head = self.direction.advance(self.head(), bounds);
        self.pending_tail = self.body.pop_back();
        self.body.push_front(new_head);
        self.turned = false;
    }

    /// Return the cell vacated by the tail on the last `advance()`, if it has
    /// not been reclaimed by `grow()`
    pub(crate) fn pending_tail(&self) -> Option<Position> {
        self.pending_tail
    }

    /// Extend the snake by one cell, re-occupying the cell its tail just left.
    ///
    /// # Panics
    ///
    /// Panics if there was no `advance()` since the snake was created or last
    /// grew.
    pub(crate) fn grow(&mut self) {
        let Some(tail) = self.pending_tail.take() else {
            panic!("Snake::grow() called without a preceding advance()");
        };
        self.body.push_back(tail);
    }

    /// Does any segment other than the head occupy the head's cell?
    pub(crate) fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&p| p == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bounds() -> Bounds {
        Bounds::new(10, 10)
    }

    fn snake(x: u16, y: u16, length: u16, direction: Direction) -> Snake {
        Snake::new(
            SnakeStart {
                head: Position::new(x, y),
                length,
                direction,
            },
            bounds(),
        )
        .unwrap()
    }

    #[test]
    fn new_lays_body_behind_head() {
        let s = snake(4, 0, 4, Direction::East);
        assert_eq!(
            s.body(),
            &[
                Position::new(4, 0),
                Position::new(3, 0),
                Position::new(2, 0),
                Position::new(1, 0),
            ]
        );
        assert_eq!(s.head(), Position::new(4, 0));
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn new_wraps_body() {
        let s = snake(1, 5, 3, Direction::East);
        assert_eq!(
            s.body(),
            &[Position::new(1, 5), Position::new(0, 5), Position::new(9, 5)]
        );
    }

    #[test]
    fn new_rejects_bad_lengths() {
        let start = SnakeStart {
            head: Position::new(0, 0),
            length: 0,
            direction: Direction::North,
        };
        assert_eq!(Snake::new(start, bounds()), Err(SetupError::NoSnake));
        let start = SnakeStart {
            length: 11,
            ..start
        };
        assert_eq!(
            Snake::new(start, bounds()),
            Err(SetupError::SnakeTooLong {
                length: 11,
                extent: 10
            })
        );
    }

    #[test]
    fn advance_shifts_body() {
        let mut s = snake(4, 0, 4, Direction::East);
        s.advance(bounds());
        assert_eq!(
            s.body(),
            &[
                Position::new(5, 0),
                Position::new(4, 0),
                Position::new(3, 0),
                Position::new(2, 0),
            ]
        );
        assert_eq!(s.pending_tail(), Some(Position::new(1, 0)));
    }

    #[test]
    fn advance_preserves_length() {
        let mut s = snake(4, 4, 5, Direction::North);
        for d in [
            Direction::West,
            Direction::South,
            Direction::East,
            Direction::North,
        ]
        .into_iter()
        .cycle()
        .take(30)
        {
            s.set_heading(d);
            s.advance(bounds());
            assert_eq!(s.len(), 5);
        }
    }

    #[test]
    fn advance_wraps_head() {
        let mut s = snake(9, 3, 2, Direction::East);
        s.advance(bounds());
        assert_eq!(s.head(), Position::new(0, 3));
        assert_eq!(s.body()[1], Position::new(9, 3));
    }

    #[test]
    fn grow_reclaims_old_tail() {
        let mut s = snake(4, 0, 4, Direction::East);
        s.advance(bounds());
        s.grow();
        assert_eq!(s.len(), 5);
        assert_eq!(s.body().back(), Some(&Position::new(1, 0)));
        assert_eq!(s.pending_tail(), None);
        assert!(!s.bites_itself());
    }

    #[test]
    #[should_panic(expected = "without a preceding advance")]
    fn grow_without_advance() {
        let mut s = snake(4, 0, 4, Direction::East);
        s.grow();
    }

    #[test]
    #[should_panic(expected = "without a preceding advance")]
    fn grow_twice() {
        let mut s = snake(4, 0, 4, Direction::East);
        s.advance(bounds());
        s.grow();
        s.grow();
    }

    #[rstest]
    #[case(Direction::East, Direction::West, Direction::East)]
    #[case(Direction::East, Direction::North, Direction::North)]
    #[case(Direction::East, Direction::South, Direction::South)]
    #[case(Direction::North, Direction::South, Direction::North)]
    #[case(Direction::North, Direction::East, Direction::East)]
    #[case(Direction::South, Direction::North, Direction::South)]
    #[case(Direction::West, Direction::East, Direction::West)]
    #[case(Direction::West, Direction::West, Direction::West)]
    fn test_set_heading(
        #[case] start: Direction,
        #[case] requested: Direction,
        #[case] result: Direction,
    ) {
        let mut s = snake(5, 5, 3, start);
        s.set_heading(requested);
        assert_eq!(s.direction(), result);
    }

    #[test]
    fn first_turn_per_tick_wins() {
        let mut s = snake(5, 5, 3, Direction::East);
        s.set_heading(Direction::North);
        s.set_heading(Direction::West);
        s.set_heading(Direction::South);
        assert_eq!(s.direction(), Direction::North);
        s.advance(bounds());
        assert_eq!(s.head(), Position::new(5, 4));
        s.set_heading(Direction::West);
        assert_eq!(s.direction(), Direction::West);
    }

    #[rstest]
    #[case(Direction::West, Direction::South, Direction::East)]
    #[case(Direction::East, Direction::North, Direction::East)]
    #[case(Direction::South, Direction::North, Direction::South)]
    fn first_request_per_tick_wins_even_if_ignored(
        #[case] first: Direction,
        #[case] second: Direction,
        #[case] result: Direction,
    ) {
        let mut s = snake(5, 5, 3, Direction::East);
        s.set_heading(first);
        s.set_heading(second);
        assert_eq!(s.direction(), result);
        s.advance(bounds());
        s.set_heading(second);
        assert_eq!(s.direction(), second);
    }

    #[test]
    fn single_cell_snake_can_turn_around_in_two_ticks() {
        let mut s = snake(5, 5, 1, Direction::East);
        s.set_heading(Direction::North);
        s.advance(bounds());
        s.set_heading(Direction::West);
        s.advance(bounds());
        assert_eq!(s.head(), Position::new(4, 4));
        assert!(!s.bites_itself());
    }

    #[test]
    fn bites_itself_in_a_loop() {
        let mut s = snake(5, 5, 5, Direction::East);
        for d in [Direction::North, Direction::West, Direction::South] {
            s.set_heading(d);
            s.advance(bounds());
        }
        assert_eq!(s.head(), Position::new(4, 5));
        assert!(s.bites_itself());
    }
}
