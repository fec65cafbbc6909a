//! Typed errors the binary needs to tell apart.
//!
//! - `BuildError`: failures while running the command chain
//! - `UsageError`: malformed command lines, reported with the help text

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A child exited with a status outside its allowed set. The orchestrator
    /// exits with `code`.
    #[error("`{program}` failed with exit status {code}")]
    ChildFailed { program: String, code: i32 },

    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl BuildError {
    /// Exit status the orchestrator should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::ChildFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Parameter {0} is not defined. Aborting.")]
    UnknownParameter(String),

    #[error("{0} parameter is not implemented, sorry! Aborting.")]
    NotImplemented(String),

    #[error("Command {0} was already specified earlier in the chain. Aborting.")]
    DuplicateCommand(String),

    #[error("Argument {0} was not understood. Aborting.")]
    UnknownArgument(String),

    #[error("No commands were specified. Aborting.")]
    NoCommands,
}

impl UsageError {
    /// Whether the help text should be printed before the message.
    pub fn shows_help(&self) -> bool {
        !matches!(self, UsageError::NotImplemented(_))
    }
}
