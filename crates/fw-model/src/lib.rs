mod error;
pub use error::{ModelError, ModelResult};

mod launch;
pub use launch::LaunchSpec;

mod child;
pub use child::{ChildExit, ChildId, EXEC_FAILURE_CODE};
