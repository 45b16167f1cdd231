//! Stub publisher that acknowledges without transferring anything

use super::Publisher;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Publisher that performs no remote transfer
///
/// Useful when embedding the pipeline without an object store, and as the
/// default collaborator in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPublisher;

#[async_trait]
impl Publisher for NoOpPublisher {
    async fn publish(&self, file: &Path, bucket: &str, key: &str) -> Result<()> {
        debug!(bucket, key, file = %file.display(), "publish skipped (noop publisher)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
