mod app;
mod command;
mod config;
mod consts;
mod field;
mod game;
mod logging;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::game::Game;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

/// What the command line asked for
#[derive(Clone, Debug, Eq, PartialEq)]
enum Invocation {
    Run {
        config: Option<PathBuf>,
        seed: Option<u64>,
    },
    Help,
    Version,
}

impl Invocation {
    fn from_parser(mut parser: Parser) -> Result<Invocation, lexopt::Error> {
        let mut config = None;
        let mut seed = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('s') | Arg::Long("seed") => seed = Some(parser.value()?.parse()?),
                Arg::Short('h') | Arg::Long("help") => return Ok(Invocation::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Invocation::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Invocation::Run { config, seed })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Invocation::Run { config, seed } => play(config, seed),
            Invocation::Help => {
                println!("Usage: wrapsnake [-c|--config <FILE>] [-s|--seed <SEED>]");
                println!();
                println!("Play Snake on a field whose edges wrap around");
                println!();
                println!("Options:");
                println!("  -c <FILE>, --config <FILE>");
                println!("                    Read configuration from the given file");
                println!();
                println!("  -s <SEED>, --seed <SEED>");
                println!("                    Seed the random number generator with the given integer");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Invocation::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn play(config_path: Option<PathBuf>, seed: Option<u64>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => Config::load(&path, false)?,
        None => match Config::default_path() {
            Ok(path) => Config::load(&path, true)?,
            Err(_) => Config::default(),
        },
    };
    let log_path = logging::init(&config.log)?;
    if let Some(path) = log_path {
        info!("Logging to {}", path.display());
    }
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!("Random seed: {seed}");
    let setup = config.game.setup();
    info!("Starting a game on a {}x{} field", setup.bounds.width, setup.bounds.height);
    let game = Game::new(
        setup,
        config.game.tick_period(),
        StdRng::seed_from_u64(seed),
    )
    .context("invalid game setup")?;
    let terminal = ratatui::init();
    let r = App::new(game).run(terminal);
    ratatui::restore();
    io_result(r)
}

fn io_result(r: io::Result<()>) -> anyhow::Result<()> {
    match r {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        r => Ok(r?),
    }
}

fn main() -> ExitCode {
    let r = Invocation::from_parser(Parser::from_env())
        .map_err(anyhow::Error::from)
        .and_then(Invocation::run);
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wrapsnake: {e:?}");
            ExitCode::from(2)
        }
    }
}
