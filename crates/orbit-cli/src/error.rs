#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;

use orbit_web::{ConfigError, ReplayError, RosterError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Roster {
        path: PathBuf,
        #[source]
        source: RosterError,
    },
    #[error("{}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("{}: {source}", path.display())]
    Trace {
        path: PathBuf,
        #[source]
        source: ReplayError,
    },
    #[error("{count} member(s) placed by the fallback path: {ids}")]
    Fallback { count: usize, ids: String },
    #[error("replay diverged at seq {seq}")]
    Diverged { seq: u64 },
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// `2` bad input, `3` strict layout violated, `4` replay divergence,
    /// `1` anything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. } | Self::Roster { .. } | Self::Config { .. } | Self::Trace { .. } => 2,
            Self::Fallback { .. } => 3,
            Self::Diverged { .. } => 4,
            Self::Output(_) | Self::Encode(_) => 1,
        }
    }
}
