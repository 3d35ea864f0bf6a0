// src/error.rs
use jstream_query::QueryError;
use thiserror::Error;

/// Everything that can go wrong between reading a document and writing the
/// transformed result.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
