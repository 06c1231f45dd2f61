//! Incremental archive building
//!
//! Accepts entries one at a time and writes them straight through to the
//! backing stream, so a thousand-entry export never holds more than one
//! rendered document in memory.

use crate::domain::Result;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Streaming ZIP builder over any seekable stream
///
/// Entries are compressed with deflate at the fastest level; each entry's
/// bytes are written and released before the next is requested. `finish`
/// must be called on success to write the central directory. If the writer
/// is dropped mid-way (an error path), the underlying `ZipWriter` finalizes
/// the entries written so far, leaving a readable partial archive.
pub struct ArchiveWriter<W: Write + Seek> {
    writer: ZipWriter<W>,
    options: FileOptions,
    entries: usize,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Create a writer over the given stream
    pub fn new(inner: W) -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(1));

        Self {
            writer: ZipWriter::new(inner),
            options,
            entries: 0,
        }
    }

    /// Append one named entry
    pub fn append(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer.start_file(name, self.options)?;
        self.writer.write_all(bytes)?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries appended so far
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Write the central directory and return the backing stream
    pub fn finish(mut self) -> Result<W> {
        Ok(self.writer.finish()?)
    }
}

/// Build a complete archive in memory
///
/// Convenience path for small ad-hoc exports; the job worker streams to a
/// file instead.
pub fn build_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer.append(name, bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}
