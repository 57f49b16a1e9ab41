//! Settings are read from a TOML file whose path defaults per build profile and
//! can be overridden with `--settings`.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
