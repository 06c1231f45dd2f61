//! Integration tests for the streaming archive writer
//!
//! Streams entries into a real file and reads the result back with an
//! independent ZIP reader.

use std::io::{Read, Write};
use tempfile::NamedTempFile;
use tombola::core::archive::{build_archive, ArchiveWriter};

#[test]
fn streamed_file_matches_what_was_appended() {
    let mut tmp = NamedTempFile::new().unwrap();

    {
        let mut writer = ArchiveWriter::new(tmp.as_file_mut());
        for i in 1..=100u32 {
            let name = format!("doc_{i:04}.txt");
            let body = format!("document number {i}");
            writer.append(&name, body.as_bytes()).unwrap();
        }
        assert_eq!(writer.entry_count(), 100);
        writer.finish().unwrap();
    }
    tmp.flush().unwrap();

    let mut archive = zip::ZipArchive::new(tmp.reopen().unwrap()).unwrap();
    assert_eq!(archive.len(), 100);

    for i in 1..=100u32 {
        let mut entry = archive
            .by_name(&format!("doc_{i:04}.txt"))
            .expect("entry present under its exact name");
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        assert_eq!(body, format!("document number {i}"));
    }
}

#[test]
fn streamed_and_in_memory_archives_carry_the_same_entries() {
    let entries: Vec<(String, Vec<u8>)> = (0..10)
        .map(|i| (format!("e{i}.txt"), format!("payload {i}").into_bytes()))
        .collect();

    // In-memory convenience path
    let in_memory = build_archive(&entries).unwrap();

    // Streaming path over a real file
    let mut tmp = NamedTempFile::new().unwrap();
    {
        let mut writer = ArchiveWriter::new(tmp.as_file_mut());
        for (name, bytes) in &entries {
            writer.append(name, bytes).unwrap();
        }
        writer.finish().unwrap();
    }
    tmp.flush().unwrap();

    let read_names = |mut archive: zip::ZipArchive<Box<dyn ReadSeek>>| -> Vec<(String, Vec<u8>)> {
        let mut out = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            out.push((entry.name().to_string(), bytes));
        }
        out
    };

    let memory_reader: Box<dyn ReadSeek> = Box::new(std::io::Cursor::new(in_memory));
    let file_reader: Box<dyn ReadSeek> = Box::new(tmp.reopen().unwrap());

    let from_memory = read_names(zip::ZipArchive::new(memory_reader).unwrap());
    let from_file = read_names(zip::ZipArchive::new(file_reader).unwrap());

    assert_eq!(from_memory, entries);
    assert_eq!(from_file, entries);
}

trait ReadSeek: Read + std::io::Seek {}
impl<T: Read + std::io::Seek> ReadSeek for T {}
