//! Error types for firds-dl
//!
//! Every failure domain the pipeline crosses (network, XML syntax, archive
//! decoding, filesystem, remote storage) surfaces as a distinguishable kind
//! on the main [`Error`] enum. Stage failures are logged with context by the
//! orchestrator and re-raised unchanged; there is no retry logic anywhere.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for firds-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for firds-dl
///
/// Each variant maps to one failure domain of the extraction pipeline. The
/// orchestrator aborts the run on the first error encountered; callers can
/// match on the kind to distinguish, for example, an unreachable register
/// from a corrupt payload.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failure (connection error, non-2xx status, body read)
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Byte stream is not well-formed XML
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    /// The index document contains no `download_link` entry
    #[error("no download link found in index document")]
    LinkNotFound,

    /// Payload is not a valid ZIP stream
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    /// Local read/write/extract failure
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// Remote copy of the output file failed; the local file remains on disk
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    /// Any other failure
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// HTTP transport errors
///
/// A fetch is a single attempt: whatever goes wrong is surfaced immediately,
/// never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("request to '{url}' failed: {reason}")]
    Request {
        /// The URL that was being fetched
        url: String,
        /// Underlying client error description
        reason: String,
    },

    /// The server answered with a non-2xx status
    #[error("unexpected status {status} fetching '{url}'")]
    Status {
        /// The URL that was being fetched
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// The response body could not be read to completion
    #[error("failed to read response body from '{url}': {reason}")]
    Body {
        /// The URL that was being fetched
        url: String,
        /// Underlying client error description
        reason: String,
    },
}

/// Remote publishing errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// The local output file could not be read for upload
    #[error("failed to read {path} for upload: {reason}")]
    ReadLocal {
        /// Path of the local file that could not be read
        path: PathBuf,
        /// Underlying error description
        reason: String,
    },

    /// The object store rejected or aborted the upload
    #[error("upload to s3://{bucket}/{key} failed: {reason}")]
    Upload {
        /// Target bucket name
        bucket: String,
        /// Target object key
        key: String,
        /// Underlying client error description
        reason: String,
    },
}
