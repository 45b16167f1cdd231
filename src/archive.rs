//! Payload archive handling
//!
//! Wraps an in-memory ZIP byte stream fetched by the transport. Entries are
//! enumerated in archive-native order; selected entries are materialized to
//! a caller-provided directory and re-read from disk by the decoder, which
//! keeps the on-disk artifacts byte-identical to the archive contents.

use crate::error::{Error, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// An opened payload archive
pub struct ZipPayload {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipPayload {
    /// Open a byte buffer as a ZIP archive
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`] when the buffer is not a valid ZIP
    /// stream.
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::CorruptArchive(format!("failed to read ZIP archive: {e}")))?;
        debug!(entries = archive.len(), "payload archive opened");
        Ok(Self { archive })
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the archive holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Entry names in archive-native order
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`] when an entry header cannot be
    /// decoded.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let entry = self.archive.by_index(index).map_err(|e| {
                Error::CorruptArchive(format!("failed to read entry {index}: {e}"))
            })?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    /// Extract one entry beneath `dir` and return the written path
    ///
    /// Parent directories inside the entry name are created as needed.
    /// Entries whose names escape the destination directory are refused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filesystem`] when the entry does not exist, carries
    /// an unsafe path, or cannot be written to disk.
    pub fn materialize(&mut self, name: &str, dir: &Path) -> Result<PathBuf> {
        let mut entry = self.archive.by_name(name).map_err(|e| {
            Error::Filesystem(std::io::Error::other(format!(
                "failed to open archive entry '{name}': {e}"
            )))
        })?;

        let relative = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            Error::Filesystem(std::io::Error::other(format!(
                "archive entry '{name}' has an unsafe path"
            )))
        })?;
        let target = dir.join(relative);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = std::fs::File::create(&target)?;
        std::io::copy(&mut entry, &mut outfile)?;

        debug!(entry = name, path = %target.display(), "archive entry materialized");
        Ok(target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build an in-memory ZIP holding the given entries, in order
    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn open_rejects_non_zip_bytes() {
        let result = ZipPayload::open(b"this is not a zip stream".to_vec());
        assert!(matches!(result, Err(Error::CorruptArchive(_))));
    }

    #[test]
    fn entry_names_preserves_archive_order() {
        let bytes = build_zip(&[
            ("b_second.xml", b"<b/>"),
            ("a_first.xml", b"<a/>"),
            ("notes.txt", b"text"),
        ]);
        let mut payload = ZipPayload::open(bytes).unwrap();
        assert_eq!(payload.len(), 3);
        assert_eq!(
            payload.entry_names().unwrap(),
            vec!["b_second.xml", "a_first.xml", "notes.txt"]
        );
    }

    #[test]
    fn materialize_writes_entry_contents() {
        let bytes = build_zip(&[("file1.xml", b"<root>content1</root>")]);
        let mut payload = ZipPayload::open(bytes).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = payload.materialize("file1.xml", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("file1.xml"));
        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"<root>content1</root>".to_vec()
        );
    }

    #[test]
    fn materialize_creates_nested_directories() {
        let bytes = build_zip(&[("data/2021/file1.xml", b"<root/>")]);
        let mut payload = ZipPayload::open(bytes).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = payload.materialize("data/2021/file1.xml", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("data/2021/file1.xml"));
        assert!(path.is_file());
    }

    #[test]
    fn materialize_unknown_entry_is_filesystem_error() {
        let bytes = build_zip(&[("file1.xml", b"<root/>")]);
        let mut payload = ZipPayload::open(bytes).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = payload.materialize("missing.xml", dir.path());
        assert!(matches!(result, Err(Error::Filesystem(_))));
    }

    #[test]
    fn materialize_refuses_path_traversal() {
        let bytes = build_zip(&[("../escape.xml", b"<root/>")]);
        let mut payload = ZipPayload::open(bytes).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = payload.materialize("../escape.xml", dir.path());
        assert!(matches!(result, Err(Error::Filesystem(_))));
        assert!(!dir.path().parent().unwrap().join("escape.xml").exists());
    }

    #[test]
    fn empty_archive_has_no_entries() {
        let bytes = build_zip(&[]);
        let mut payload = ZipPayload::open(bytes).unwrap();
        assert!(payload.is_empty());
        assert!(payload.entry_names().unwrap().is_empty());
    }
}
