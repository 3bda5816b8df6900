//! Error types for amq-bench

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// amq-bench error types
#[derive(Error, Debug)]
pub enum Error {
    /// The external experiment process exited non-zero
    #[error("experiment process exited with {status}: {stderr}")]
    ExperimentFailed {
        /// Exit status reported by the OS
        status: std::process::ExitStatus,
        /// Captured standard error of the process
        stderr: String,
    },

    /// The external experiment process produced output that is not JSON
    #[error("experiment output is not a JSON object: {0}")]
    ExperimentOutput(#[source] serde_json::Error),

    /// A single run of the sweep failed, aborting the whole collection
    #[error("experiment run {index}/{total} failed: {source}")]
    Run {
        /// 1-based index of the failed run
        index: usize,
        /// Total number of runs in the sweep
        total: usize,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The persisted results document is missing a key or field
    #[error("malformed results document: {0}")]
    MalformedDocument(String),

    /// Chart rendering failed
    #[error("chart rendering failed for {path}: {message}")]
    Chart {
        /// Output file the chart was being written to
        path: String,
        /// Backend error description
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_carries_context() {
        let inner = Error::MalformedDocument("missing field".to_string());
        let err = Error::Run {
            index: 3,
            total: 10,
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.contains("run 3/10"));
        assert!(msg.contains("missing field"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
