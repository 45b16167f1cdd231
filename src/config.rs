//! Configuration types for firds-dl
//!
//! A [`PipelineConfig`] fully describes one run: where the index lives, where
//! the tabular output goes, and which bucket receives the published copy.
//! There is no config-file discovery and no CLI surface; consumers construct
//! the struct directly or deserialize it from whatever format they manage.

use crate::error::{Error, Result};
use crate::xml::NamespaceTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Opaque static credentials for the remote object store
///
/// The pipeline never inspects or validates these; they are handed verbatim
/// to the publisher. Supplying revoked or malformed material surfaces as a
/// publish failure at the end of the run, not earlier.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key identifier
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
}

// Keep the secret out of debug output and error chains.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Configuration for one pipeline run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Registry index endpoint returning the XML index document
    pub index_url: String,

    /// Local path of the tabular output file (default: "output.csv")
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Target bucket for the published output file
    pub bucket: String,

    /// Static credentials for the object store
    pub credentials: Credentials,

    /// Object store region (default: "eu-west-1")
    #[serde(default = "default_region")]
    pub region: String,

    /// Object key to publish under; defaults to the output file's name
    #[serde(default)]
    pub remote_key: Option<String>,

    /// Namespace table driving all qualified XML queries
    ///
    /// Defaults to the ISO 20022 bindings of the reference-data schema
    /// family; substitute alternate bindings to target another schema
    /// version without touching extraction logic.
    #[serde(default)]
    pub namespaces: NamespaceTable,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.csv")
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

impl PipelineConfig {
    /// Validate the configuration before a run starts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unexpected`] when the index URL is not an absolute
    /// HTTP(S) URI or when the bucket name is empty. The resolved payload
    /// link is deliberately not validated here — that is deferred to the
    /// transport at fetch time.
    pub fn validate(&self) -> Result<()> {
        if self.index_url.is_empty() {
            return Err(Error::Unexpected(
                "configuration: index_url must not be empty".to_string(),
            ));
        }
        let parsed = url::Url::parse(&self.index_url).map_err(|e| {
            Error::Unexpected(format!(
                "configuration: index_url '{}' is not an absolute URI: {}",
                self.index_url, e
            ))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Unexpected(format!(
                "configuration: index_url '{}' must use http or https",
                self.index_url
            )));
        }
        if self.bucket.is_empty() {
            return Err(Error::Unexpected(
                "configuration: bucket must not be empty".to_string(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(Error::Unexpected(
                "configuration: output_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Object key the output file publishes under
    ///
    /// Explicit `remote_key` wins; otherwise the output file's own name is
    /// used, so `output.csv` lands as `output.csv` in the bucket.
    pub fn resolved_remote_key(&self) -> String {
        if let Some(key) = &self.remote_key {
            return key.clone();
        }
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| default_output_path().to_string_lossy().into_owned())
    }
}
