//! Crate-wide error type.
//!
//! Three failure families matter to callers:
//!
//! - configuration problems, caught while building experiments and parameter
//!   names (bad attribute, unknown condition key, unknown atom or type tag)
//! - measurement-file problems, caught at load time
//! - parameter-resolution problems, caught at evaluation time when a required
//!   global parameter is absent from the supplied set
//!
//! Errors are raised at the point of detection and propagate uncaught; the
//! binary maps each family to a distinct process exit code.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration: experiment attributes, parameter
    /// condition keys, atom symbols, experiment type tags.
    #[error("configuration error: {0}")]
    Config(String),

    /// The measurement file is missing, empty, or does not match the expected
    /// three-column shape. `line` is 0 for file-level problems.
    #[error("input error in '{}' (line {line}): {message}", path.display())]
    InputFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A required global parameter was absent from the supplied set.
    #[error("missing parameter '{0}' in the supplied parameter set")]
    MissingParameter(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn input(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::InputFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::InputFormat { .. } => 3,
            Error::MissingParameter(_) => 4,
        }
    }
}
