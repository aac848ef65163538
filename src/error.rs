//! Error taxonomy for the ERD generation pipeline.

use thiserror::Error;

/// Failures that abort a generation run. None of these are retried; the
/// tool is a one-shot batch operation.
#[derive(Debug, Error)]
pub enum ErdError {
    /// The host environment cannot introspect the requested database
    /// (unsupported URL scheme, missing connection URL, bad config file).
    /// Raised before any extraction begins.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or catalog introspection failure during
    /// extraction.
    #[error("schema introspection failed: {0}")]
    SchemaUnavailable(#[from] sqlx::Error),

    /// Extraction succeeded but every table was filtered out. Almost
    /// always a misconfigured ignore list, so it is a user-facing failure
    /// rather than an empty diagram.
    #[error("no tables found in the database (or all were ignored)")]
    EmptySchema,

    /// Destination directory or file could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
