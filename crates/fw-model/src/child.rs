use std::fmt;

use serde::{Deserialize, Serialize};

/// Exit code reported for a child whose program image could not be loaded.
///
/// Matches the shell convention for "command not found / not executable".
pub const EXEC_FAILURE_CODE: i32 = 127;

/// Launcher-assigned identifier for a child.
///
/// Ids increase monotonically per launcher and stay meaningful for children
/// that never got an OS pid (exec failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(u64);

impl ChildId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "child-{:04x}", self.0)
    }
}

/// How a reaped child terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildExit {
    /// Normal termination with the given exit code.
    Exited(i32),
    /// Terminated by a signal.
    Signaled(i32),
    /// The program image could not be loaded; the child never ran.
    ExecFailed {
        /// OS error number reported for the failed exec, if any.
        errno: Option<i32>,
        /// Human-readable failure description.
        reason: String,
    },
}

impl ChildExit {
    /// Returns `true` only for a normal exit with code 0.
    pub fn success(&self) -> bool {
        matches!(self, ChildExit::Exited(0))
    }

    /// Returns the exit code the child reported, or [`EXEC_FAILURE_CODE`] for exec failures.
    ///
    /// Signal terminations have no exit code.
    pub fn code(&self) -> Option<i32> {
        match self {
            ChildExit::Exited(code) => Some(*code),
            ChildExit::Signaled(_) => None,
            ChildExit::ExecFailed { .. } => Some(EXEC_FAILURE_CODE),
        }
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildExit::Exited(code) => write!(f, "exited with code {code}"),
            ChildExit::Signaled(sig) => write!(f, "terminated by signal {sig}"),
            ChildExit::ExecFailed { reason, .. } => {
                write!(f, "exec failed (code {EXEC_FAILURE_CODE}): {reason}")
            }
        }
    }
}
