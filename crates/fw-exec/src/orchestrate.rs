//! Launch-then-reap orchestration.
//!
//! Starts every child first, then reaps them one by one in completion order.
//! A failing child is logged and counted; it never stops its siblings.
use std::fmt;

use fw_model::{ChildExit, LaunchSpec};
use fw_observe::{LogLevel, Logger};

use crate::{ChildSet, Launcher, Reaped, Spawn};

/// Outcome counts of one [`run_children`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Children that got a handle (exec failures included).
    pub launched: usize,
    /// Children that exited with code 0.
    pub succeeded: usize,
    /// Children reaped with any other outcome.
    pub failed: usize,
    /// Specs for which no process could be created.
    pub launch_errors: usize,
    /// Children whose exit status could not be collected.
    pub wait_errors: usize,
}

impl RunSummary {
    /// Every spec launched and every child exited with code 0.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.launch_errors == 0 && self.wait_errors == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "launched={} succeeded={} failed={} launch_errors={} wait_errors={}",
            self.launched, self.succeeded, self.failed, self.launch_errors, self.wait_errors
        )
    }
}

/// Launches every spec, then reaps each launched child exactly once.
pub async fn run_children<S: Spawn>(launcher: &Launcher<S>, specs: &[LaunchSpec]) -> RunSummary {
    let logger = launcher.logger();
    let mut summary = RunSummary::default();
    let mut children = ChildSet::new();

    for spec in specs {
        match launcher.launch(spec) {
            Ok(handle) => {
                summary.launched += 1;
                children.insert(handle);
            }
            // Already logged by the launcher.
            Err(_) => summary.launch_errors += 1,
        }
    }
    logger.debug(&format!("Waiting for {} children", children.len()));

    while let Some(result) = children.wait_any().await {
        match result {
            Ok(reaped) => {
                if reaped.exit.success() {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
                report(logger, &reaped);
            }
            Err(e) => {
                summary.wait_errors += 1;
                logger.error(&e.to_string());
            }
        }
    }

    logger.info(&format!("All children reaped: {summary}"));
    summary
}

fn report(logger: &Logger, reaped: &Reaped) {
    let level = match &reaped.exit {
        ChildExit::Exited(0) => LogLevel::Info,
        ChildExit::Exited(_) | ChildExit::Signaled(_) => LogLevel::Warning,
        ChildExit::ExecFailed { .. } => LogLevel::Error,
    };
    let pid = reaped
        .pid
        .map_or_else(|| "no PID".to_string(), |pid| format!("PID {pid}"));
    logger.log(
        level,
        &format!("{} ({}, {}) {}", reaped.id, pid, reaped.program, reaped.exit),
    );
}

#[cfg(test)]
mod tests {
    use std::{fs, io, path::Path, sync::Arc};

    use fw_observe::{LevelFlags, LoggerConfig};

    use super::*;
    use crate::CommandSpawner;

    fn launcher_logging_to(path: &Path) -> Launcher<CommandSpawner> {
        let config = LoggerConfig {
            levels: LevelFlags::all(),
            use_color: false,
        };
        let logger = Logger::with_console(config, io::sink(), io::sink());
        logger.init(path).unwrap();
        Launcher::new(Arc::new(logger))
    }

    #[tokio::test]
    async fn four_children_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("four.log");
        let launcher = launcher_logging_to(&log);

        let specs: Vec<LaunchSpec> = ["echo one", "echo two", "true", "sh -c exit"]
            .iter()
            .map(|line| line.parse().unwrap())
            .collect();

        let summary = run_children(&launcher, &specs).await;

        assert_eq!(
            summary,
            RunSummary {
                launched: 4,
                succeeded: 4,
                ..RunSummary::default()
            }
        );
        assert!(summary.all_succeeded());

        let contents = fs::read_to_string(&log).unwrap();
        assert_eq!(contents.matches("exited with code 0").count(), 4);
        assert!(contents.contains("All children reaped: launched=4 succeeded=4"));
    }

    #[tokio::test]
    async fn child_failures_are_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("mixed.log");
        let launcher = launcher_logging_to(&log);

        let specs = vec![
            LaunchSpec::program("true").unwrap(),
            LaunchSpec::new("sh", ["sh", "-c", "exit 2"]).unwrap(),
            LaunchSpec::program("/nonexistent/fw-orchestrate").unwrap(),
        ];

        let summary = run_children(&launcher, &specs).await;

        assert_eq!(summary.launched, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert!(!summary.all_succeeded());

        let contents = fs::read_to_string(&log).unwrap();
        assert!(contents.contains("[Warning]") && contents.contains("exited with code 2"));
        assert!(contents.contains("(no PID, /nonexistent/fw-orchestrate) exec failed"));
    }

    #[tokio::test]
    async fn one_outcome_line_per_child_with_tracing_bridge() {
        use tracing_subscriber::layer::SubscriberExt;

        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("bridged.log");
        let launcher = launcher_logging_to(&log);
        let subscriber = tracing_subscriber::registry()
            .with(fw_observe::LoggerLayer::new(Arc::clone(launcher.logger())));
        let _guard = tracing::subscriber::set_default(subscriber);

        let specs = vec![LaunchSpec::program("true").unwrap()];
        let summary = run_children(&launcher, &specs).await;
        assert_eq!(summary.succeeded, 1);

        let contents = fs::read_to_string(&log).unwrap();
        assert!(contents.contains("spawning child"), "{contents}");
        assert_eq!(contents.matches("exited with code 0").count(), 1, "{contents}");
        assert!(!contents.contains("Some("), "{contents}");
    }

    #[test]
    fn summary_display_lists_all_counters() {
        let summary = RunSummary {
            launched: 2,
            succeeded: 1,
            failed: 1,
            launch_errors: 0,
            wait_errors: 0,
        };
        assert_eq!(
            summary.to_string(),
            "launched=2 succeeded=1 failed=1 launch_errors=0 wait_errors=0"
        );
    }
}
