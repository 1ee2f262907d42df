mod error;
pub use error::{LaunchError, WaitError};

mod launcher;
pub use launcher::{ChildHandle, ChildSet, CommandSpawner, Launcher, Reaped, Spawn};

mod orchestrate;
pub use orchestrate::{RunSummary, run_children};
