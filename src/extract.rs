//! Record extraction from reference-data documents
//!
//! Every `ns2:FinInstrm` element found at any depth yields exactly one
//! record, populated by running each [`RECORD_SCHEMA`](crate::types::RECORD_SCHEMA)
//! query beneath that element. A missing sub-field leaves its cell empty;
//! the record is still emitted. A document with no matching elements yields
//! an empty set, not an error.

use crate::error::Result;
use crate::types::{InstrumentRecord, RECORD_ELEMENT, RECORD_SCHEMA};
use crate::xml::{NamespaceTable, XmlDocument};
use tracing::debug;

/// Extract all instrument records from one parsed document, document order
///
/// # Errors
///
/// Propagates [`Error::Unexpected`](crate::Error::Unexpected) only when a
/// schema query expression is itself invalid; absent fields and absent
/// record elements are data conditions, not errors.
pub fn extract_records(
    document: &XmlDocument,
    namespaces: &NamespaceTable,
) -> Result<Vec<InstrumentRecord>> {
    let instruments = document.find_all(namespaces, RECORD_ELEMENT)?;
    let mut records = Vec::with_capacity(instruments.len());

    for instrument in instruments {
        let mut values = Vec::with_capacity(RECORD_SCHEMA.len());
        for rule in RECORD_SCHEMA {
            let value = instrument.find_text(namespaces, rule.path)?;
            values.push(value.map(str::to_owned));
        }
        records.push(InstrumentRecord::new(values));
    }

    debug!(records = records.len(), "records extracted from document");
    Ok(records)
}
