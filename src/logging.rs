use crate::config::LogConfig;
use anyhow::Context;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::path::PathBuf;

/// Send log messages to the file named by `config`, since the terminal belongs
/// to the game screen.  Returns the path logged to, or `None` if logging is
/// off or no log path could be determined.
pub(crate) fn init(config: &LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if config.level == LevelFilter::Off {
        return Ok(None);
    }
    let Some(path) = config.path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = fs_err::File::create(&path).context("failed to create log file")?;
    let logger_config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .build();
    WriteLogger::init(config.level, logger_config, file).context("failed to set up logging")?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_off() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("logs").join("wrapsnake.log");
        let config = LogConfig {
            file: Some(path.clone()),
            level: LevelFilter::Off,
        };
        assert_eq!(init(&config).unwrap(), None);
        assert!(!path.exists());
    }
}
