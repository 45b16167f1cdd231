//! Remote publishing of the tabular output file
//!
//! The core abstraction is the [`Publisher`] trait: copy a local file's
//! bytes verbatim to a named bucket and key. Implementations provided:
//!
//! - [`S3Publisher`]: uploads via the AWS S3 API using opaque static
//!   credentials
//! - [`NoOpPublisher`]: acknowledges without transferring anything, for
//!   embedding without remote storage and for tests
//!
//! Publishing is the last pipeline act; a failure here leaves the local
//! output file on disk untouched.

mod noop;
mod s3;

pub use noop::NoOpPublisher;
pub use s3::S3Publisher;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for copying the local output file to a remote location
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Copy `file`'s bytes verbatim to `bucket` under `key`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Publish`](crate::Error::Publish) when the local
    /// file cannot be read or the remote store rejects the transfer. The
    /// local file is never modified or removed.
    async fn publish(&self, file: &Path, bucket: &str, key: &str) -> Result<()>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
