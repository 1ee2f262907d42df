pub mod level;
pub use level::LogLevel;

pub mod flags;
pub use flags::{LevelFlags, MAX_CONFIG_LINE};

pub mod timestamp;
pub use timestamp::{format_timestamp, local_timestamp};

pub mod timezone;
pub use timezone::init_local_offset;
