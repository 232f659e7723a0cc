use std::{io, path::PathBuf};

use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("fork failed: {}", .0.desc())]
    Spawn(Errno),

    #[error("exec failed: argument contains a NUL byte")]
    InvalidArgument,

    #[error("wait failed: completion channel closed")]
    Wait,

    #[error("too many background jobs (limit {capacity})")]
    JobTableFull { capacity: usize },

    #[error("cd failed: {path}: {source}")]
    Navigation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cd failed: home directory not found")]
    NoHomeDir,

    #[error("signal setup failed: {0}")]
    Handler(#[source] io::Error),
}

