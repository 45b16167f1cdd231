//! Pipeline orchestration
//!
//! Sequences the five extraction stages strictly in order: fetch the index,
//! resolve the payload link, fetch the payload, extract records from every
//! XML entry, then persist and publish. Each stage starts only after the
//! previous stage's result is fully materialized; the first failure aborts
//! the run, is logged with its stage, and is re-raised unchanged in kind.
//! A run either writes and publishes the complete record set or writes
//! nothing.

use crate::archive::ZipPayload;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::extract::extract_records;
use crate::publish::{Publisher, S3Publisher};
use crate::sink;
use crate::transport;
use crate::types::{InstrumentRecord, RunReport, Stage};
use crate::xml::{self, XmlDocument};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Case-sensitive suffix selecting archive entries for extraction
const DOCUMENT_SUFFIX: &str = ".xml";

/// Connection timeout for register requests. Applies to connection setup
/// only; payload archives can take arbitrarily long to stream.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// The extraction pipeline
///
/// Holds everything one run needs: validated configuration, an HTTP
/// client, and the publisher collaborator. No state survives a run; each
/// call to [`run`](Pipeline::run) is independent.
pub struct Pipeline {
    config: PipelineConfig,
    client: reqwest::Client,
    publisher: Arc<dyn Publisher>,
}

/// Per-run extraction counters
#[derive(Debug, Default)]
struct ExtractionTally {
    documents: usize,
    entries_skipped: usize,
}

impl Pipeline {
    /// Build a pipeline publishing to S3 with the configured credentials
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unexpected`](crate::Error::Unexpected) when the
    /// configuration fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let publisher = Arc::new(S3Publisher::new(&config.credentials, &config.region));
        Self::with_publisher(config, publisher)
    }

    /// Build a pipeline with a caller-supplied publisher
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unexpected`](crate::Error::Unexpected) when the
    /// configuration fails validation.
    pub fn with_publisher(
        config: PipelineConfig,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Unexpected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            publisher,
        })
    }

    /// Execute one full pipeline run
    ///
    /// # Errors
    ///
    /// Surfaces the first error encountered, unchanged in kind; the failing
    /// stage is attached to the error log. No partial record set or partial
    /// tabular output is committed. A publish failure leaves the local
    /// output file on disk.
    pub async fn run(&self) -> Result<RunReport> {
        info!(
            index_url = %self.config.index_url,
            publisher = self.publisher.name(),
            "starting extraction pipeline"
        );

        let index_bytes = transport::fetch(&self.client, &self.config.index_url)
            .await
            .map_err(|e| stage_failed(Stage::FetchIndex, e))?;

        let payload_url =
            resolve_payload_url(&index_bytes).map_err(|e| stage_failed(Stage::ResolveLink, e))?;
        info!(payload_url = %payload_url, "download link resolved");

        let payload = transport::fetch_streaming(&self.client, &payload_url)
            .await
            .map_err(|e| stage_failed(Stage::FetchPayload, e))?;

        let (records, tally) = self
            .extract_all(payload)
            .map_err(|e| stage_failed(Stage::ExtractAll, e))?;

        let remote_key = self.config.resolved_remote_key();
        self.persist_and_publish(&records, &remote_key)
            .await
            .map_err(|e| stage_failed(Stage::PersistAndPublish, e))?;

        let report = RunReport {
            documents: tally.documents,
            entries_skipped: tally.entries_skipped,
            records: records.len(),
            output_path: self.config.output_path.clone(),
            remote_key,
        };
        info!(
            documents = report.documents,
            records = report.records,
            skipped = report.entries_skipped,
            "pipeline completed"
        );
        Ok(report)
    }

    /// Open the payload, materialize every `.xml` entry into a run-scoped
    /// working directory, and extract records from each in archive order
    ///
    /// The working directory is removed on every exit path — success or
    /// failure — when it drops at the end of this function.
    fn extract_all(
        &self,
        payload: Vec<u8>,
    ) -> Result<(Vec<InstrumentRecord>, ExtractionTally)> {
        let mut archive = ZipPayload::open(payload)?;
        let workdir = tempfile::tempdir()?;
        let mut records = Vec::new();
        let mut tally = ExtractionTally::default();

        for name in archive.entry_names()? {
            if !name.ends_with(DOCUMENT_SUFFIX) {
                debug!(entry = %name, "skipping non-XML archive entry");
                tally.entries_skipped += 1;
                continue;
            }

            let path = archive.materialize(&name, workdir.path())?;
            let bytes = std::fs::read(&path)?;
            let document = XmlDocument::parse(&bytes)?;
            let extracted = extract_records(&document, &self.config.namespaces)?;

            debug!(entry = %name, records = extracted.len(), "reference data document processed");
            records.extend(extracted);
            tally.documents += 1;
        }

        info!(
            documents = tally.documents,
            records = records.len(),
            skipped = tally.entries_skipped,
            "payload archive processed"
        );
        Ok((records, tally))
    }

    /// Write the tabular output, then copy it to the remote store
    async fn persist_and_publish(
        &self,
        records: &[InstrumentRecord],
        remote_key: &str,
    ) -> Result<()> {
        sink::write_records(&self.config.output_path, records)?;
        self.publisher
            .publish(&self.config.output_path, &self.config.bucket, remote_key)
            .await
    }
}

/// Parse the index document and resolve the payload download link
fn resolve_payload_url(index_bytes: &[u8]) -> Result<String> {
    let index = XmlDocument::parse(index_bytes)?;
    let link = xml::resolve_download_link(&index)?;
    Ok(link.to_string())
}

fn stage_failed(stage: Stage, error: crate::error::Error) -> crate::error::Error {
    error!(stage = %stage, error = %error, "pipeline stage failed");
    error
}
