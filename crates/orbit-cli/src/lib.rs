#![forbid(unsafe_code)]

//! `orbit` command-line tool.
//!
//! Runs the Orbit layout engine over a roster file, replays gesture traces
//! recorded by `orbit-web`, and validates configuration files. Output goes to
//! stdout as JSON; logs go to stderr, filtered by `ORBIT_LOG`.

pub mod cli;
pub mod error;
pub mod logging;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};
