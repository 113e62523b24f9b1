use crate::command::Command;
use crate::consts;
use crate::field::{Cell, Direction, Grid, GridState, Setup, SetupError, StepOutcome};
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use log::{debug, info};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
    Frame,
};
use std::io;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// A game session on screen: the field plus the clock that drives it
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R> {
    rng: R,
    setup: Setup,
    grid: Grid,
    tick_period: Duration,
    next_tick: Option<Instant>,
}

impl<R: Rng> Game<R> {
    /// # Errors
    ///
    /// Fails if a session cannot be started with `setup`.
    pub(crate) fn new(
        setup: Setup,
        tick_period: Duration,
        mut rng: R,
    ) -> Result<Game<R>, SetupError> {
        let grid = Grid::new(&setup, &mut rng)?;
        log_layout(&grid);
        Ok(Game {
            rng,
            setup,
            grid,
            tick_period,
            next_tick: None,
        })
    }

    /// Wait for either the next tick or the next input event, whichever comes
    /// first, and handle it.  Returns `Break` if the user asked to quit.
    pub(crate) fn process_input(&mut self) -> io::Result<ControlFlow<()>> {
        if self.grid.running() {
            let when = *self
                .next_tick
                .get_or_insert_with(|| Instant::now() + self.tick_period);
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                self.next_tick = None;
                Ok(ControlFlow::Continue(()))
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    fn advance(&mut self) {
        if !self.grid.running() {
            return;
        }
        match self.grid.step(&mut self.rng) {
            StepOutcome::Moved | StepOutcome::Ate => (),
            StepOutcome::Collided(kind) => info!(
                "Game over: ran into {kind} after eating {} food, at length {}",
                self.grid.food_eaten(),
                self.grid.snake().len()
            ),
            StepOutcome::TargetReached => info!("Game won"),
        }
    }

    fn handle_event(&mut self, event: Event) -> ControlFlow<()> {
        let Some(cmd) = event.as_key_press_event().and_then(Command::from_key_event) else {
            return ControlFlow::Continue(());
        };
        match (cmd, self.grid.running()) {
            (Command::Quit | Command::Q | Command::Esc, _) => return ControlFlow::Break(()),
            (Command::Up, true) => self.grid.set_heading(Direction::North),
            (Command::Down, true) => self.grid.set_heading(Direction::South),
            (Command::Left, true) => self.grid.set_heading(Direction::West),
            (Command::Right, true) => self.grid.set_heading(Direction::East),
            (Command::R, false) => self.restart(),
            _ => (),
        }
        ControlFlow::Continue(())
    }

    /// Start a new session with the same setup, continuing the random number
    /// stream
    fn restart(&mut self) {
        info!("Restarting");
        self.grid = Grid::new(&self.setup, &mut self.rng)
            .expect("setup should still be valid after starting a session with it");
        log_layout(&self.grid);
        self.next_tick = None;
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    fn head_symbol(&self) -> char {
        match self.grid.snake().direction() {
            Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
            Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(
                " Food: {}/{}",
                self.grid.food_eaten(),
                self.grid.food_to_win()
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let mut block_size = self.grid.bounds().size();
        block_size.width = block_size.width.saturating_add(2);
        block_size.height = block_size.height.saturating_add(2);
        let block_area = center_rect(block_area, block_size);
        DottedBorder.render(block_area, buf);

        let mut field = FieldView {
            interior: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for pos in self.grid.bounds().positions() {
            let (symbol, style) = match self.grid.cell(pos) {
                Cell::Empty => continue,
                Cell::SnakeHead if self.grid.collided() => {
                    (consts::COLLISION_SYMBOL, consts::COLLISION_STYLE)
                }
                Cell::SnakeHead => (self.head_symbol(), consts::SNAKE_STYLE),
                Cell::SnakeBody => (consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE),
                Cell::Food => (consts::FOOD_SYMBOL, consts::FOOD_STYLE),
                Cell::Obstacle => (consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE),
            };
            field.put(pos, symbol, style);
        }

        let banner = match self.grid.state() {
            GridState::Running => return,
            GridState::Collided => " Game over!",
            GridState::TargetReached => " You won!",
        };
        Span::from(banner).render(msg1_area, buf);
        Line::from_iter([
            Span::raw(" Restart ("),
            Span::styled("r", consts::KEY_STYLE),
            Span::raw(") / Quit ("),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .render(msg2_area, buf);
    }
}

fn log_layout(grid: &Grid) {
    for obj in grid.objects() {
        let cells = obj.cells().map(|p| format!("({}, {})", p.x, p.y));
        debug!("{}: {}", obj.kind(), cells.collect::<Vec<_>>().join(" "));
    }
}

/// The part of a [`Buffer`] showing the field, addressed in field coordinates
#[derive(Debug, Eq, PartialEq)]
struct FieldView<'a> {
    interior: Rect,
    buf: &'a mut Buffer,
}

impl FieldView<'_> {
    fn put(&mut self, pos: Position, symbol: char, style: Style) {
        let target = Position {
            x: self.interior.x.saturating_add(pos.x),
            y: self.interior.y.saturating_add(pos.y),
        };
        if !self.interior.contains(target) {
            return;
        }
        if let Some(cell) = self.buf.cell_mut(target) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// A border drawn with dots, since the snake passes through it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let right = area.right().saturating_sub(1);
        let bottom = area.bottom().saturating_sub(1);
        for pos in area.positions() {
            let vertical_edge = pos.x == area.x || pos.x == right;
            let horizontal_edge = pos.y == area.y || pos.y == bottom;
            let symbol = match (vertical_edge, horizontal_edge) {
                (true, true) => '·',
                (false, true) => '⋯',
                (true, false) => '⋮',
                (false, false) => continue,
            };
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char(symbol);
            }
        }
    }
}
