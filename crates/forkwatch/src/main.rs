//! Launches a set of child programs, waits for every one of them and logs the
//! whole sequence through the leveled logger.
use std::{process, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use fw_exec::{Launcher, run_children};
use fw_observe::{Logger, LoggerConfig, init_local_offset, init_logger};

mod cli;
use cli::Args;

fn main() -> anyhow::Result<()> {
    // Offset detection must happen while the process is single-threaded.
    init_local_offset();

    let args = Args::parse();
    let specs = args.launch_specs()?;

    // 1) logger
    let mut logger = Logger::new(LoggerConfig::default());
    if let Err(e) = args.configure_logger(&mut logger) {
        eprintln!("{e:#}");
        process::exit(1);
    }
    if let Some(path) = &args.log_file {
        // Already reported by the logger; console output carries on.
        let _ = logger.init(path);
    }
    let logger = Arc::new(logger);
    init_logger(Arc::clone(&logger))?;

    // 2) children
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    logger.info(&format!("Starting forkwatch (PID {})", process::id()));
    let launcher = Launcher::new(Arc::clone(&logger));
    let summary = runtime.block_on(run_children(&launcher, &specs));
    debug!(%summary, "orchestration finished");

    logger.info("Exiting forkwatch");
    logger.close();
    Ok(())
}
