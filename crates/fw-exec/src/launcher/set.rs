use tokio::task::JoinSet;
use tracing::warn;

use crate::{
    WaitError,
    launcher::{ChildHandle, Reaped},
};

/// Owning collection of children that still have to be reaped.
///
/// Each inserted handle is waited on by its own task, so [`ChildSet::wait_any`]
/// yields whichever child terminates first, regardless of launch order.
/// Dropping a non-empty set is reported as a warning.
#[derive(Default)]
pub struct ChildSet {
    pending: JoinSet<Result<Reaped, WaitError>>,
}

impl ChildSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `handle` and starts waiting on it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn insert(&mut self, handle: ChildHandle) {
        self.pending.spawn(handle.wait());
    }

    /// Number of children not reaped yet.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Reaps the next child to terminate.
    ///
    /// Returns `None` once the set is empty.
    pub async fn wait_any(&mut self) -> Option<Result<Reaped, WaitError>> {
        let joined = self.pending.join_next().await?;
        Some(joined.unwrap_or_else(|e| Err(WaitError::Join(e.to_string()))))
    }

    /// Reaps every remaining child, in completion order.
    pub async fn wait_all(&mut self) -> Vec<Result<Reaped, WaitError>> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(result) = self.wait_any().await {
            out.push(result);
        }
        out
    }
}

impl Drop for ChildSet {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            warn!(pending = self.pending.len(), "child set dropped with unreaped children");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, io, sync::Arc};

    use fw_model::{ChildExit, LaunchSpec};
    use fw_observe::{LevelFlags, Logger, LoggerConfig};

    use super::*;
    use crate::Launcher;

    fn launcher() -> Launcher {
        let config = LoggerConfig {
            levels: LevelFlags::none(),
            use_color: false,
        };
        Launcher::new(Arc::new(Logger::with_console(config, io::sink(), io::sink())))
    }

    #[tokio::test]
    async fn reaps_every_launched_child_exactly_once() {
        let launcher = launcher();
        let mut children = ChildSet::new();

        let spec = LaunchSpec::new("echo", ["echo", "fw-exec child"]).unwrap();
        let mut launched = HashSet::new();
        for _ in 0..4 {
            let handle = launcher.launch(&spec).unwrap();
            launched.insert(handle.id());
            children.insert(handle);
        }
        assert_eq!(children.len(), 4);

        let reaped: Vec<Reaped> = children
            .wait_all()
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert!(children.is_empty());
        assert_eq!(reaped.len(), 4);
        let ids: HashSet<_> = reaped.iter().map(|r| r.id).collect();
        assert_eq!(ids, launched);
        assert!(reaped.iter().all(|r| r.exit == ChildExit::Exited(0)));

        #[cfg(target_os = "linux")]
        for r in &reaped {
            let pid = r.pid.unwrap();
            assert!(
                !std::path::Path::new(&format!("/proc/{pid}")).exists(),
                "pid {pid} still has a process table entry"
            );
        }
    }

    #[tokio::test]
    async fn wait_any_follows_completion_order() {
        let launcher = launcher();
        let mut children = ChildSet::new();

        let slow = launcher
            .launch(&LaunchSpec::new("sleep", ["sleep", "2"]).unwrap())
            .unwrap();
        let fast = launcher.launch(&LaunchSpec::program("true").unwrap()).unwrap();
        let (slow_id, fast_id) = (slow.id(), fast.id());
        children.insert(slow);
        children.insert(fast);

        let first = children.wait_any().await.unwrap().unwrap();
        let second = children.wait_any().await.unwrap().unwrap();

        assert_eq!(first.id, fast_id);
        assert_eq!(second.id, slow_id);
        assert!(children.wait_any().await.is_none());
    }

    #[tokio::test]
    async fn mixed_outcomes_are_all_reaped() {
        let launcher = launcher();
        let mut children = ChildSet::new();

        for spec in [
            LaunchSpec::program("true").unwrap(),
            LaunchSpec::new("sh", ["sh", "-c", "exit 7"]).unwrap(),
            LaunchSpec::program("/nonexistent/fw-exec-child").unwrap(),
        ] {
            children.insert(launcher.launch(&spec).unwrap());
        }

        let mut exits: Vec<_> = children
            .wait_all()
            .await
            .into_iter()
            .map(|r| r.unwrap().exit.code())
            .collect();
        exits.sort();

        assert_eq!(exits, [Some(0), Some(7), Some(127)]);
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn empty_set_returns_none() {
        let mut children = ChildSet::new();
        assert!(children.wait_any().await.is_none());
        assert!(children.wait_all().await.is_empty());
    }
}
