use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    /// The statement could not be prepared.
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("store is already open in this process: {}", .0.display())]
    AlreadyOpen(PathBuf),
}
