//! Core types: pipeline stages, the record schema, and run reporting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One stage of the extraction pipeline
///
/// Stages execute strictly in declaration order; no stage is skipped,
/// retried, or re-ordered. The failing stage is attached to the error log
/// so a failed run is diagnosable from its output alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Fetch the registry index document
    FetchIndex,
    /// Parse the index and resolve the payload download link
    ResolveLink,
    /// Fetch the payload archive
    FetchPayload,
    /// Extract records from every XML entry in the archive
    ExtractAll,
    /// Write the tabular output and copy it to the remote store
    PersistAndPublish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchIndex => "fetch-index",
            Stage::ResolveLink => "resolve-link",
            Stage::FetchPayload => "fetch-payload",
            Stage::ExtractAll => "extract-all",
            Stage::PersistAndPublish => "persist-and-publish",
        };
        f.write_str(name)
    }
}

/// One field of the record schema: an output column name paired with the
/// namespace-qualified query that populates it
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    /// Column name as it appears in the output header row
    pub column: &'static str,
    /// Qualified-name query evaluated beneath each record element
    pub path: &'static str,
}

/// Qualified name of the element that scopes one record
pub const RECORD_ELEMENT: &str = "ns2:FinInstrm";

/// The record schema: six fields, in output column order
///
/// This is the single source of truth consumed by both the record extractor
/// and the sink writer, so extraction order and header order cannot drift
/// apart.
pub const RECORD_SCHEMA: &[FieldRule] = &[
    FieldRule {
        column: "FinInstrmGnlAttrbts.Id",
        path: "ns2:Id",
    },
    FieldRule {
        column: "FinInstrmGnlAttrbts.FullNm",
        path: "ns2:FullNm",
    },
    FieldRule {
        column: "FinInstrmGnlAttrbts.ClssfctnTp",
        path: "ns2:ClssfctnTp",
    },
    FieldRule {
        column: "FinInstrmGnlAttrbts.CmmdtyDerivInd",
        path: "ns2:CmmdtyDerivInd",
    },
    FieldRule {
        column: "FinInstrmGnlAttrbts.NtnlCcy",
        path: "ns2:NtnlCcy",
    },
    FieldRule {
        column: "Issr",
        path: "ns2:Issr",
    },
];

/// One flattened reference-data record
///
/// Values are stored in [`RECORD_SCHEMA`] order; a missing sub-field is
/// `None` and serializes as an empty cell. Records carry no identity beyond
/// their values — no deduplication, no sorting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrumentRecord {
    values: Vec<Option<String>>,
}

impl InstrumentRecord {
    /// Build a record from values in schema order
    pub(crate) fn new(values: Vec<Option<String>>) -> Self {
        debug_assert_eq!(values.len(), RECORD_SCHEMA.len());
        Self { values }
    }

    /// Field values in schema order
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Look up a field value by its output column name
    pub fn value(&self, column: &str) -> Option<&str> {
        RECORD_SCHEMA
            .iter()
            .position(|rule| rule.column == column)
            .and_then(|idx| self.values[idx].as_deref())
    }
}

/// Summary of a completed pipeline run
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Number of XML documents extracted from the payload archive
    pub documents: usize,
    /// Number of archive entries skipped for not carrying the `.xml` suffix
    pub entries_skipped: usize,
    /// Number of records written to the output file
    pub records: usize,
    /// Path of the local tabular output file
    pub output_path: PathBuf,
    /// Object key the output file was published under
    pub remote_key: String,
}
