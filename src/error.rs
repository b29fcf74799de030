use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DataError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("empty region set: request at least one region or pass None for all")]
    EmptyRegionSet,

    #[error("index request failed: {0}")]
    IndexHttp(String),

    #[error("index returned status {status}: {message}")]
    IndexStatus { status: u16, message: String },

    #[error("archive error: {0}")]
    Archive(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
