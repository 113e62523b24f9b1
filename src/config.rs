use crate::consts;
use crate::field::{Bounds, Direction, Setup, SnakeStart};
use log::LevelFilter;
use ratatui::layout::Position;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Parameters for each game session
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Settings for the log file
    #[serde(default)]
    pub(crate) log: LogConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("wrapsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read, if the file's contents
    /// could not be deserialized, or if the settings are out of range.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        let config = toml::from_str::<Config>(&content)?;
        config.game.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) obstacles: usize,
    pub(crate) food_to_win: u32,

    /// Ticks per second
    pub(crate) speed: u32,

    /// Fixed position of the first food as `[x, y]`; random if unset
    pub(crate) food: Option<[u16; 2]>,

    pub(crate) snake: SnakeConfig,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            width: consts::DEFAULT_FIELD_SIZE.width,
            height: consts::DEFAULT_FIELD_SIZE.height,
            obstacles: consts::DEFAULT_OBSTACLES,
            food_to_win: consts::DEFAULT_FOOD_TO_WIN,
            speed: consts::DEFAULT_SPEED,
            food: None,
            snake: SnakeConfig::default(),
        }
    }
}

impl GameConfig {
    /// Check the settings that the game screen imposes.  Everything else is
    /// checked when the session is set up.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        if self.width > consts::MAX_FIELD_SIZE.width || self.height > consts::MAX_FIELD_SIZE.height
        {
            return Err(ConfigError::FieldTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub(crate) fn setup(&self) -> Setup {
        Setup {
            bounds: Bounds::new(self.width, self.height),
            snake: SnakeStart {
                head: Position::new(self.snake.x, self.snake.y),
                length: self.snake.length,
                direction: self.snake.heading,
            },
            food: self.food.map(|[x, y]| Position::new(x, y)),
            obstacles: self.obstacles,
            food_to_win: self.food_to_win,
        }
    }

    /// Return the time between movements of the snake
    pub(crate) fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.speed.max(1)
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawSnakeConfig")]
pub(crate) struct SnakeConfig {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) length: u16,
    pub(crate) heading: Direction,
}

impl Default for SnakeConfig {
    fn default() -> SnakeConfig {
        let start = SnakeStart::default();
        SnakeConfig {
            x: start.head.x,
            y: start.head.y,
            length: start.length,
            heading: start.direction,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
struct RawSnakeConfig {
    x: u16,
    y: u16,
    length: u16,
    heading: RawHeading,
}

impl Default for RawSnakeConfig {
    fn default() -> RawSnakeConfig {
        let snake = SnakeConfig::default();
        RawSnakeConfig {
            x: snake.x,
            y: snake.y,
            length: snake.length,
            heading: RawHeading::Named(snake.heading),
        }
    }
}

/// A heading given either by name or as a `[dx, dy]` unit vector
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(untagged)]
enum RawHeading {
    Named(Direction),
    Vector([i8; 2]),
}

impl TryFrom<RawSnakeConfig> for SnakeConfig {
    type Error = BadHeading;

    fn try_from(value: RawSnakeConfig) -> Result<SnakeConfig, BadHeading> {
        let heading = match value.heading {
            RawHeading::Named(d) => d,
            RawHeading::Vector([dx, dy]) => {
                Direction::from_delta(dx, dy).ok_or(BadHeading(dx, dy))?
            }
        };
        Ok(SnakeConfig {
            x: value.x,
            y: value.y,
            length: value.length,
            heading,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("heading [{0}, {1}] is not one of [0, -1], [1, 0], [0, 1], or [-1, 0]")]
pub(crate) struct BadHeading(i8, i8);

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct LogConfig {
    /// Where to write the log; defaults to a file in the local data directory
    pub(crate) file: Option<PathBuf>,

    /// Only log messages at this level or more severe
    pub(crate) level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            file: None,
            level: LevelFilter::Info,
        }
    }
}

impl LogConfig {
    /// Return the path to the log file: the configured one or, if that is not
    /// set, the default.  Returns `None` if neither is available.
    pub(crate) fn path(&self) -> Option<PathBuf> {
        self.file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("wrapsnake").join("wrapsnake.log"))
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("game speed must be at least 1 tick per second")]
    ZeroSpeed,
    #[error(
        "{width}x{height} field does not fit on screen (maximum is {}x{})",
        consts::MAX_FIELD_SIZE.width,
        consts::MAX_FIELD_SIZE.height
    )]
    FieldTooLarge { width: u16, height: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(src: &str) -> Result<Config, ConfigError> {
        let mut tmpfile = NamedTempFile::new().unwrap();
        write!(tmpfile, "{src}").unwrap();
        tmpfile.flush().unwrap();
        Config::load(tmpfile.path(), false)
    }

    #[test]
    fn empty_file() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn missing_file_allowed() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
    }

    #[test]
    fn missing_file_not_allowed() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn default_setup() {
        let config = Config::default();
        assert_eq!(config.game.setup(), Setup::default());
        assert_eq!(config.game.tick_period(), Duration::from_nanos(333_333_333));
    }

    #[test]
    fn full_config() {
        let config = parse(concat!(
            "[game]\n",
            "width = 6\n",
            "height = 6\n",
            "obstacles = 8\n",
            "food-to-win = 3\n",
            "speed = 5\n",
            "food = [1, 4]\n",
            "\n",
            "[game.snake]\n",
            "x = 3\n",
            "y = 2\n",
            "length = 1\n",
            "heading = \"down\"\n",
            "\n",
            "[log]\n",
            "file = \"/tmp/snake.log\"\n",
            "level = \"debug\"\n",
        ))
        .unwrap();
        assert_eq!(
            config.game.setup(),
            Setup {
                bounds: Bounds::new(6, 6),
                snake: SnakeStart {
                    head: Position::new(3, 2),
                    length: 1,
                    direction: Direction::South,
                },
                food: Some(Position::new(1, 4)),
                obstacles: 8,
                food_to_win: 3,
            }
        );
        assert_eq!(config.game.tick_period(), Duration::from_millis(200));
        assert_eq!(
            config.log,
            LogConfig {
                file: Some(PathBuf::from("/tmp/snake.log")),
                level: LevelFilter::Debug,
            }
        );
    }

    #[test]
    fn partial_snake_config() {
        let config = parse("[game.snake]\nlength = 2\n").unwrap();
        assert_eq!(
            config.game.snake,
            SnakeConfig {
                length: 2,
                ..SnakeConfig::default()
            }
        );
    }

    #[test]
    fn heading_as_vector() {
        let config = parse("[game.snake]\nheading = [-1, 0]\n").unwrap();
        assert_eq!(config.game.snake.heading, Direction::West);
    }

    #[test]
    fn heading_not_a_unit_vector() {
        assert!(matches!(
            parse("[game.snake]\nheading = [1, 1]\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_speed() {
        assert!(matches!(
            parse("[game]\nspeed = 0\n"),
            Err(ConfigError::ZeroSpeed)
        ));
    }

    #[test]
    fn field_too_large() {
        assert!(matches!(
            parse("[game]\nwidth = 100\n"),
            Err(ConfigError::FieldTooLarge {
                width: 100,
                height: 10
            })
        ));
    }

    #[test]
    fn unknown_heading() {
        assert!(matches!(
            parse("[game.snake]\nheading = \"sideways\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
