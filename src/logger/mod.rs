//! Process-wide `tracing` setup. Starts at `info` and is reloaded once the
//! settings file has been read.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
