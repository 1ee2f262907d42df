use std::{
    fs::File,
    io::{BufRead, BufReader, IsTerminal},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::logger::{
    error::{LoggerError, LoggerResult},
    object::LevelFlags,
};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Which levels are written.
    pub levels: LevelFlags,
    /// Whether to use colored output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            levels: LevelFlags::default(),
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Determines whether colored output should be used.
    ///
    /// Color is enabled only if:
    /// 1. `use_color` config is `true` (user hasn't explicitly disabled it), AND
    /// 2. stdout is a terminal (not redirected to a file/pipe)
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }

    /// Reads `LEVEL = ON|OFF` lines from `path` into `levels`.
    ///
    /// Unrecognized lines are skipped. On failure the switches applied from
    /// lines read before the failure are kept and every other level is left
    /// as it was.
    ///
    /// # Examples
    /// ```no_run
    /// use fw_observe::LoggerConfig;
    ///
    /// let mut config = LoggerConfig::default();
    /// if let Err(e) = config.load_levels("logger.conf") {
    ///     eprintln!("{e}; keeping default levels");
    /// }
    /// ```
    pub fn load_levels(&mut self, path: impl AsRef<Path>) -> LoggerResult<()> {
        let path = path.as_ref();
        let config_err = |source| LoggerError::Config {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(config_err)?;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(config_err)?;
            if let Some((level, on)) = self.levels.apply_line(&line) {
                trace!(%level, on, "level switch applied");
            }
        }
        Ok(())
    }
}
