use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use clap::Parser;

use fw_model::LaunchSpec;
use fw_observe::Logger;

/// Launch child programs concurrently and reap every one of them
#[derive(Parser, Debug, Clone)]
#[command(name = "forkwatch")]
#[command(about = "Launch child programs, wait for all of them and log what happened")]
pub struct Args {
    /// Logger configuration file with `LEVEL = ON|OFF` lines
    #[arg(short, long, default_value = "logger.conf")]
    pub config: PathBuf,

    /// Append every log line to this file as well
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// JSON file holding an array of `{ "path": ..., "args": [...] }` tasks
    #[arg(long)]
    pub tasks: Option<PathBuf>,

    /// Task given as a command line, e.g. `--task "echo hello"` (repeatable)
    #[arg(short, long = "task", value_name = "COMMAND")]
    pub task: Vec<LaunchSpec>,

    /// Keep going with default levels when the configuration cannot be read
    #[arg(long, default_value = "false")]
    pub allow_missing_config: bool,
}

impl Args {
    /// Collects tasks from `--tasks` first, then every `--task` in order.
    pub fn launch_specs(&self) -> anyhow::Result<Vec<LaunchSpec>> {
        let mut specs = match &self.tasks {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading task file {}", path.display()))?;
                serde_json::from_str::<Vec<LaunchSpec>>(&raw)
                    .with_context(|| format!("parsing task file {}", path.display()))?
            }
            None => Vec::new(),
        };
        specs.extend(self.task.iter().cloned());

        if specs.is_empty() {
            bail!("no tasks given: use --task or --tasks");
        }
        Ok(specs)
    }

    /// Loads `--config` into `logger`.
    ///
    /// A config that cannot be read is an error unless `--allow-missing-config`
    /// is set, in which case a warning is logged and the levels stay at their
    /// defaults.
    pub fn configure_logger(&self, logger: &mut Logger) -> anyhow::Result<()> {
        match logger.load_config(&self.config) {
            Ok(()) => Ok(()),
            Err(e) if self.allow_missing_config => {
                logger.warning(&format!("{e}; using default levels"));
                Ok(())
            }
            Err(e) => Err(e).context("Failed to load logger configuration"),
        }
    }
}
