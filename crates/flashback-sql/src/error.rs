//! Error types for the batch driver.

use std::path::PathBuf;

use flashback_sql_core::RewriteError;

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// IO error (reading the input, writing the output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file does not exist.
    #[error("File {0} does not exist")]
    InputNotFound(PathBuf),

    /// A statement could not be rewritten.
    #[error("Detect error in line {line}: [{statement}], err_msg is: {source}")]
    Rewrite {
        /// 1-based line number.
        line: usize,
        /// The line as read.
        statement: String,
        /// Why the rewrite failed.
        #[source]
        source: RewriteError,
    },
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
