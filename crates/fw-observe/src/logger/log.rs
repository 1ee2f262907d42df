use std::{
    fs::{File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use crate::logger::{
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
    object::{LevelFlags, LogLevel, local_timestamp},
};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

type Console = Box<dyn Write + Send>;

/// Open append-mode log file.
struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Every destination a line can go to.
///
/// Kept behind one mutex so a line reaches all sinks before the next line
/// starts.
struct Sinks {
    stdout: Console,
    stderr: Console,
    file: Option<FileSink>,
}

/// Leveled logger writing `<timestamp> [<Level>] <message>` lines.
///
/// Lines go to stderr (errors) or stdout (everything else) and, once
/// [`Logger::init`] has opened one, to an append-mode log file. Every write is
/// flushed immediately.
///
/// The logger is meant to be configured first (`load_config`) and then shared
/// as `Arc<Logger>`; all logging methods take `&self`.
///
/// # Examples
/// ```no_run
/// use fw_observe::{Logger, LoggerConfig};
///
/// let mut logger = Logger::new(LoggerConfig::default());
/// let _ = logger.load_config("logger.conf");
/// let _ = logger.init("forkwatch.log");
///
/// logger.info("starting");
/// logger.close();
/// ```
pub struct Logger {
    config: LoggerConfig,
    color: bool,
    sinks: Mutex<Sinks>,
}

impl Logger {
    /// Creates a logger writing to the process stdout/stderr.
    pub fn new(config: LoggerConfig) -> Self {
        let color = config.should_use_color();
        Self::build(config, color, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Creates a logger writing console output to the given writers.
    ///
    /// Color is never used for injected writers.
    pub fn with_console<O, E>(config: LoggerConfig, stdout: O, stderr: E) -> Self
    where
        O: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        Self::build(config, false, Box::new(stdout), Box::new(stderr))
    }

    fn build(config: LoggerConfig, color: bool, stdout: Console, stderr: Console) -> Self {
        Self {
            config,
            color,
            sinks: Mutex::new(Sinks {
                stdout,
                stderr,
                file: None,
            }),
        }
    }

    /// Loads level switches from a `LEVEL = ON|OFF` file.
    ///
    /// See [`LoggerConfig::load_levels`]. A missing file is reported but the
    /// logger stays usable with its current levels.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> LoggerResult<()> {
        self.config.load_levels(path)
    }

    /// Returns the active level switches.
    pub fn levels(&self) -> LevelFlags {
        self.config.levels
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.config.levels.is_enabled(level)
    }

    /// Opens `path` in append mode and duplicates every accepted line to it.
    ///
    /// A sink that is already open is closed first. If the file cannot be
    /// opened the failure is written to stderr whatever the level switches
    /// say, no file sink is kept and console logging carries on.
    pub fn init(&self, path: impl AsRef<Path>) -> LoggerResult<()> {
        let path = path.as_ref();
        let mut sinks = self.sinks();
        sinks.close_file();

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                sinks.file = Some(FileSink {
                    path: path.to_path_buf(),
                    writer: BufWriter::new(file),
                });
                Ok(())
            }
            Err(source) => {
                let e = LoggerError::InitFailed {
                    path: path.to_path_buf(),
                    source,
                };
                let _ = writeln!(sinks.stderr, "{e}");
                let _ = sinks.stderr.flush();
                Err(e)
            }
        }
    }

    /// Flushes and closes the file sink. Does nothing when none is open.
    pub fn close(&self) {
        self.sinks().close_file();
    }

    /// Path of the open file sink, if any.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.sinks().file.as_ref().map(|f| f.path.clone())
    }

    /// Writes `message` at `level`.
    ///
    /// Nothing is written when the level is disabled, the message is empty,
    /// or the current time cannot be formatted.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.is_enabled(level) || message.is_empty() {
            return;
        }
        let Some(ts) = local_timestamp() else {
            return;
        };
        let line = format!("{ts} [{}] {message}", level.name());

        let mut sinks = self.sinks();
        let color = if self.color { color_of(level) } else { None };
        sinks.write_console(level, &line, color);
        sinks.write_file(&line);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Logs `"<prefix>: <last OS error>"` at error level.
    ///
    /// The OS error is captured before anything else runs, so call this right
    /// after the failing system call.
    pub fn log_system_error(&self, prefix: &str) {
        let os_error = io::Error::last_os_error();
        self.error(&format!("{prefix}: {os_error}"));
    }

    fn sinks(&self) -> MutexGuard<'_, Sinks> {
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("levels", &self.config.levels)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Sinks {
    fn write_console(&mut self, level: LogLevel, line: &str, color: Option<&str>) {
        let out = if level.uses_stderr() {
            &mut self.stderr
        } else {
            &mut self.stdout
        };
        let _ = match color {
            Some(code) => writeln!(out, "{code}{line}{RESET}"),
            None => writeln!(out, "{line}"),
        };
        let _ = out.flush();
    }

    fn write_file(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let written = writeln!(file.writer, "{line}").and_then(|()| file.writer.flush());
        if let Err(e) = written {
            let _ = writeln!(self.stderr, "Failed to flush log file: {e}");
        }
    }

    fn close_file(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.writer.flush() {
                let _ = writeln!(self.stderr, "Failed to close log file: {e}");
            }
        }
    }
}

fn color_of(level: LogLevel) -> Option<&'static str> {
    match level {
        LogLevel::Error => Some(RED),
        LogLevel::Warning => Some(YELLOW),
        LogLevel::Debug => Some(CYAN),
        LogLevel::Info => None,
    }
}
