//! # firds-dl
//!
//! Pipeline library for harvesting financial-instrument reference data from
//! a regulatory register.
//!
//! One run retrieves the register's XML index, resolves the nested download
//! link it carries, fetches the linked ZIP payload, extracts instrument
//! records from every XML document inside via namespace-qualified queries,
//! writes the result as a CSV file, and copies that file to an object-store
//! bucket.
//!
//! ## Design Philosophy
//!
//! - **Strictly sequential** - five ordered stages, each starting only after
//!   the previous completed; the first failure aborts the whole run
//! - **Typed failures** - every failure domain (network, XML, archive,
//!   filesystem, remote storage) is a distinguishable error kind
//! - **Library-first** - no CLI or UI; configuration is a plain struct the
//!   embedding application constructs or deserializes
//! - **Collaborators behind traits** - the object store is a capability
//!   interface, swappable without touching the pipeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use firds_dl::{Credentials, Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig {
//!         index_url: "https://registers.example.org/select?wt=xml".to_string(),
//!         output_path: "output.csv".into(),
//!         bucket: "reference-data".to_string(),
//!         credentials: Credentials {
//!             access_key: "AKIA...".to_string(),
//!             secret_key: "...".to_string(),
//!         },
//!         region: "eu-west-1".to_string(),
//!         remote_key: None,
//!         namespaces: Default::default(),
//!     };
//!
//!     let report = Pipeline::new(config)?.run().await?;
//!     println!("wrote {} records", report.records);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Payload archive handling
pub mod archive;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Record extraction from reference-data documents
pub mod extract;
/// Pipeline orchestration
pub mod pipeline;
/// Remote publishing of the output file
pub mod publish;
/// Tabular output writing
pub mod sink;
/// HTTP transport for index and payload fetching
pub mod transport;
/// Core types: stages, records, schema, run reporting
pub mod types;
/// Namespace-aware XML decoding and querying
pub mod xml;

// Re-export commonly used types
pub use config::{Credentials, PipelineConfig};
pub use error::{Error, PublishError, Result, TransportError};
pub use pipeline::Pipeline;
pub use publish::{NoOpPublisher, Publisher, S3Publisher};
pub use types::{FieldRule, InstrumentRecord, RunReport, Stage, RECORD_SCHEMA};
pub use xml::{resolve_download_link, NamespaceTable, XmlDocument, XmlNode};
