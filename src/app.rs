use crate::game::Game;
use rand::Rng;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App<R> {
    game: Game<R>,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(game: Game<R>) -> App<R> {
        App { game }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|frame| self.game.draw(frame))?;
            if self.game.process_input()?.is_break() {
                return Ok(());
            }
        }
    }
}
