use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. These abort the run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to open input file {path:?}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write output file {path:?}: {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0:?} contains no usable declarations")]
    NothingToEmit(PathBuf),
    #[error("failed to format generated code: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("failed to read limits file {path:?}: {source}")]
    ReadLimits {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse limits file {path:?}: {source}")]
    ParseLimits {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}
