use serde::{Deserialize, Serialize};

use crate::logger::object::LogLevel;

/// Longest configuration line (in characters) that is still interpreted.
pub const MAX_CONFIG_LINE: usize = 255;

/// Per-level on/off switches.
///
/// Each level is gated independently; there is no implied ordering
/// (enabling `debug` does not enable `info`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFlags {
    pub error: bool,
    pub warning: bool,
    pub info: bool,
    pub debug: bool,
}

impl Default for LevelFlags {
    fn default() -> Self {
        Self {
            error: true,
            warning: true,
            info: false,
            debug: false,
        }
    }
}

impl LevelFlags {
    /// Every level switched on.
    pub const fn all() -> Self {
        Self {
            error: true,
            warning: true,
            info: true,
            debug: true,
        }
    }

    /// Every level switched off.
    pub const fn none() -> Self {
        Self {
            error: false,
            warning: false,
            info: false,
            debug: false,
        }
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Warning => self.warning,
            LogLevel::Info => self.info,
            LogLevel::Debug => self.debug,
        }
    }

    pub fn set(&mut self, level: LogLevel, on: bool) {
        match level {
            LogLevel::Error => self.error = on,
            LogLevel::Warning => self.warning = on,
            LogLevel::Info => self.info = on,
            LogLevel::Debug => self.debug = on,
        }
    }

    /// Applies a single `LEVEL = ON|OFF` line.
    ///
    /// Returns the switch that was applied, or `None` when the line is not a
    /// level switch (blank, comment, unknown key, or too long). Such lines
    /// leave the flags untouched.
    pub fn apply_line(&mut self, line: &str) -> Option<(LogLevel, bool)> {
        let (level, on) = parse_switch_line(line)?;
        self.set(level, on);
        Some((level, on))
    }
}

/// Parses `<LEVEL> = <ON|OFF>`, tolerating surrounding whitespace and case.
fn parse_switch_line(line: &str) -> Option<(LogLevel, bool)> {
    if line.chars().count() > MAX_CONFIG_LINE {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let level = key.trim().parse::<LogLevel>().ok()?;

    let value = value.trim();
    if value.eq_ignore_ascii_case("on") {
        Some((level, true))
    } else if value.eq_ignore_ascii_case("off") {
        Some((level, false))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_error_and_warning_only() {
        let flags = LevelFlags::default();
        assert!(flags.is_enabled(LogLevel::Error));
        assert!(flags.is_enabled(LogLevel::Warning));
        assert!(!flags.is_enabled(LogLevel::Info));
        assert!(!flags.is_enabled(LogLevel::Debug));
    }

    #[test]
    fn applies_switch_lines() {
        let mut flags = LevelFlags::default();

        assert_eq!(flags.apply_line("INFO = ON"), Some((LogLevel::Info, true)));
        assert_eq!(flags.apply_line("ERROR = OFF"), Some((LogLevel::Error, false)));
        assert_eq!(flags.apply_line("  debug=on  "), Some((LogLevel::Debug, true)));
        assert_eq!(flags.apply_line("WARNING =\tOff"), Some((LogLevel::Warning, false)));

        assert_eq!(
            flags,
            LevelFlags {
                error: false,
                warning: false,
                info: true,
                debug: true,
            }
        );
    }

    #[test]
    fn last_occurrence_wins() {
        let mut flags = LevelFlags::default();
        flags.apply_line("DEBUG = ON");
        flags.apply_line("DEBUG = OFF");
        assert!(!flags.debug);
    }

    #[test]
    fn ignores_unrecognized_lines() {
        let mut flags = LevelFlags::default();
        let lines = [
            "",
            "# comment",
            "[section]",
            "TRACE = ON",
            "INFO = MAYBE",
            "INFO ON",
            "INFO = ON = OFF",
            "VERBOSE=1",
        ];

        for line in lines {
            assert_eq!(flags.apply_line(line), None, "line {line:?} should be ignored");
        }
        assert_eq!(flags, LevelFlags::default());
    }

    #[test]
    fn ignores_overlong_lines() {
        let mut flags = LevelFlags::default();
        let line = format!("INFO = ON{}", " ".repeat(MAX_CONFIG_LINE));
        assert_eq!(flags.apply_line(&line), None);
        assert!(!flags.info);
    }

    #[test]
    fn serde_uses_defaults_for_missing_fields() {
        let flags: LevelFlags = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert_eq!(
            flags,
            LevelFlags {
                debug: true,
                ..LevelFlags::default()
            }
        );
    }
}
