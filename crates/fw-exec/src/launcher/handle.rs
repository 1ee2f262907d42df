use std::{io, process::ExitStatus};

use tokio::process::Child;

use fw_model::{ChildExit, ChildId, LaunchSpec};

use crate::WaitError;

/// Owned handle to a launched child.
///
/// The only way to give the handle up is [`ChildHandle::wait`] (directly or
/// through [`crate::ChildSet`]), which reaps the child exactly once.
#[must_use = "a launched child must be waited on, or it is left unreaped"]
#[derive(Debug)]
pub struct ChildHandle {
    id: ChildId,
    pid: Option<u32>,
    program: String,
    state: State,
}

#[derive(Debug)]
enum State {
    Running(Child),
    /// Exec was refused; the outcome is already known.
    ExecFailed { errno: Option<i32>, reason: String },
}

/// Termination record of one reaped child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaped {
    pub id: ChildId,
    pub pid: Option<u32>,
    pub program: String,
    pub exit: ChildExit,
}

impl ChildHandle {
    pub(crate) fn running(id: ChildId, spec: &LaunchSpec, child: Child) -> Self {
        Self {
            id,
            pid: child.id(),
            program: spec.path().to_string(),
            state: State::Running(child),
        }
    }

    pub(crate) fn exec_failed(id: ChildId, spec: &LaunchSpec, error: &io::Error) -> Self {
        Self {
            id,
            pid: None,
            program: spec.path().to_string(),
            state: State::ExecFailed {
                errno: error.raw_os_error(),
                reason: error.to_string(),
            },
        }
    }

    pub fn id(&self) -> ChildId {
        self.id
    }

    /// OS process id; `None` when exec failed.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Suspends until the child terminates and reaps its exit status.
    pub async fn wait(self) -> Result<Reaped, WaitError> {
        let exit = match self.state {
            State::Running(mut child) => {
                let status = child.wait().await.map_err(|source| WaitError::Io {
                    child: self.id,
                    source,
                })?;
                exit_of(status)
            }
            State::ExecFailed { errno, reason } => ChildExit::ExecFailed { errno, reason },
        };
        Ok(Reaped {
            id: self.id,
            pid: self.pid,
            program: self.program,
            exit,
        })
    }
}

fn exit_of(status: ExitStatus) -> ChildExit {
    if let Some(code) = status.code() {
        return ChildExit::Exited(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ChildExit::Signaled(signal);
        }
    }
    ChildExit::Exited(-1)
}
