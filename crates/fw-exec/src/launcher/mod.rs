//! Child process creation.
//!
//! [`Launcher::launch`] starts a program and hands back a [`ChildHandle`]
//! without waiting for it. Handles are reaped either directly
//! ([`ChildHandle::wait`]) or through a [`ChildSet`].
mod handle;
pub use handle::{ChildHandle, Reaped};

mod set;
pub use set::ChildSet;

use std::{
    io,
    process::Stdio,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::process::{Child, Command};
use tracing::trace;

use fw_model::{ChildId, LaunchSpec};
use fw_observe::Logger;

use crate::LaunchError;

/// Creates the OS process for a [`LaunchSpec`].
///
/// The default implementation is [`CommandSpawner`]; other implementations
/// exist mostly to exercise the launcher's failure paths.
pub trait Spawn: Send + Sync {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child>;
}

/// Spawns children with `tokio::process::Command`.
///
/// The child inherits stdin, stdout and stderr, and sees `spec.argv0()` as
/// its program name. A path without a slash is looked up through `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandSpawner;

impl Spawn for CommandSpawner {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child> {
        let mut cmd = Command::new(spec.path());
        #[cfg(unix)]
        cmd.arg0(spec.argv0());
        cmd.args(spec.tail_args());
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.spawn()
    }
}

/// Starts children and reports what happened to the shared [`Logger`].
///
/// Must be used from within a tokio runtime: spawned children are reaped by
/// the runtime's process driver.
pub struct Launcher<S = CommandSpawner> {
    logger: Arc<Logger>,
    spawner: S,
    next_id: AtomicU64,
}

impl Launcher<CommandSpawner> {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self::with_spawner(logger, CommandSpawner)
    }
}

impl<S: Spawn> Launcher<S> {
    pub fn with_spawner(logger: Arc<Logger>, spawner: S) -> Self {
        Self {
            logger,
            spawner,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Starts `spec` and returns as soon as the child exists.
    ///
    /// - Process creation failure (e.g. `EAGAIN`, `ENOMEM`): returns
    ///   [`LaunchError::Spawn`] and no handle.
    /// - The program cannot be executed (missing, not executable, ...): the
    ///   failure is logged and a handle is still returned; reaping it yields
    ///   [`fw_model::ChildExit::ExecFailed`].
    pub fn launch(&self, spec: &LaunchSpec) -> Result<ChildHandle, LaunchError> {
        let id = ChildId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(
            child = %id,
            path = spec.path(),
            args = ?spec.args(),
            "spawning child",
        );

        match self.spawner.spawn(spec) {
            Ok(child) => {
                let handle = ChildHandle::running(id, spec, child);
                match handle.pid() {
                    Some(pid) => self
                        .logger
                        .info(&format!("Launched {id} with PID {pid}: {spec}")),
                    None => self.logger.info(&format!("Launched {id}: {spec}")),
                }
                Ok(handle)
            }
            Err(e) if is_exec_failure(&e) => {
                self.logger
                    .error(&format!("{id}: exec failed for '{}': {e}", spec.path()));
                Ok(ChildHandle::exec_failed(id, spec, &e))
            }
            Err(source) => {
                self.logger.error(&format!(
                    "{id}: process creation failed for '{}': {source}",
                    spec.path()
                ));
                Err(LaunchError::Spawn {
                    program: spec.path().to_string(),
                    source,
                })
            }
        }
    }
}

/// Whether a spawn error means the program image could not be loaded, as
/// opposed to the process itself not being created.
fn is_exec_failure(e: &io::Error) -> bool {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        return matches!(
            code,
            libc::ENOENT
                | libc::EACCES
                | libc::EPERM
                | libc::ENOEXEC
                | libc::ENOTDIR
                | libc::EISDIR
                | libc::ELOOP
                | libc::ENAMETOOLONG
                | libc::ETXTBSY
                | libc::E2BIG
        );
    }
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    )
}
