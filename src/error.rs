use std::path::PathBuf;

use thiserror::Error;

/// Errors raised on the host side: loading and checking a run configuration,
/// and preparing the worker pool. The heading computation itself never fails.
#[derive(Debug, Error)]
pub enum BoidsError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, BoidsError>;
