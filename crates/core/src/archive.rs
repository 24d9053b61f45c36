//! Compress, list and extract archives.
//!
//! These are the three entry points the command-line layer drives:
//!
//! - [`compress`]: count symbols over every file, build one code tree,
//!   write the header and node table, then each file's entry header
//!   immediately followed by its packed payload
//! - [`list`]: read the entry headers only, seeking over the node table
//!   and payloads
//! - [`extract`]: decode every entry, verify its checksum, and hand the
//!   verified bytes to a caller-supplied sink
//!
//! Opening input files and composing output paths are the caller's job; the
//! core only sees `(name, bytes)` pairs and emits `(entry, bytes)` pairs.

use std::io::{Read, Seek, SeekFrom, Write};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::codes::CodeTable;
use crate::error::{CorruptReason, Error, InputError, Result};
use crate::format::{
    self, ArchiveHeader, FileEntry, NodeTable, ENTRY_SIZE, HEADER_SIZE, MAX_FILES, NODE_SIZE,
};
use crate::frequency::{checksum, FrequencyTable};
use crate::packer::{pack, unpack};
use crate::report::{CompressReport, EntryOutcome, EntryStatus, ExtractReport};
use crate::tree::HuffmanTree;

/// A file to archive: its stored name and full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// One line of an archive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    /// Original size in bytes
    pub size: usize,
}

/// Write an archive containing `files` to `out`.
///
/// Files are stored in the given order. Names must already be unique and
/// fit the 29-byte name field; deduplication is the caller's concern.
///
/// # Errors
/// - `InputError::NoInputFiles` if `files` is empty
/// - `InputError::TooManyFiles` for more than `i16::MAX` files
/// - `InputError::{InvalidName, NameTooLong, FileTooLarge}` for a file
///   that does not fit its entry header
/// - `Error::Io` if writing fails
pub fn compress<W: Write>(files: &[InputFile], out: &mut W) -> Result<CompressReport> {
    let started = Instant::now();

    if files.is_empty() {
        return Err(InputError::NoInputFiles.into());
    }
    if files.len() > MAX_FILES {
        return Err(InputError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES,
        }
        .into());
    }
    for file in files {
        // Fail before anything is written
        FileEntry::new(&file.name, file.data.len(), 0, 0)?;
    }

    let (frequencies, stats) = FrequencyTable::from_files(files.iter().map(|f| f.data.as_slice()));
    let tree = HuffmanTree::build(&frequencies)?;
    let codes = CodeTable::from_tree(&tree);
    let nodes = tree.to_node_table();

    let header = ArchiveHeader {
        node_count: nodes.len() as i16,
        root_index: 0,
        file_count: files.len() as i16,
    };
    header.write_to(out)?;
    nodes.write_to(out)?;

    let mut archive_bytes = (HEADER_SIZE + nodes.len() * NODE_SIZE) as u64;
    let mut packed_bytes = 0u64;

    for (file, stat) in files.iter().zip(&stats) {
        let packed = pack(&file.data, &codes)?;
        let entry = FileEntry::new(&file.name, stat.size, packed.len(), stat.checksum)?;

        entry.write_to(out)?;
        out.write_all(&packed)?;

        debug!(
            name = %entry.name,
            size = entry.file_size,
            packed = entry.packed_len,
            "archived file"
        );

        packed_bytes += packed.len() as u64;
        archive_bytes += (ENTRY_SIZE + packed.len()) as u64;
    }
    out.flush()?;

    let report = CompressReport {
        files: files.len(),
        input_bytes: frequencies.total(),
        packed_bytes,
        archive_bytes,
        distinct_symbols: frequencies.distinct_symbols(),
        node_count: tree.node_count(),
        duration: started.elapsed(),
    };
    info!(
        files = report.files,
        input_bytes = report.input_bytes,
        archive_bytes = report.archive_bytes,
        "compressed archive"
    );
    Ok(report)
}

/// Compress into a fresh buffer.
pub fn compress_to_vec(files: &[InputFile]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(files, &mut out)?;
    Ok(out)
}

/// Entry headers of an archive, sorted by name.
///
/// The node table and payloads are skipped, not decoded.
///
/// # Errors
/// `ArchiveFormatError` if the header or any entry header is truncated or
/// malformed, or if a payload extends past the end of the archive.
pub fn list<R: Read + Seek>(mut reader: R) -> Result<Vec<ListEntry>> {
    let header = ArchiveHeader::read_from(&mut reader)?;
    reader.seek(SeekFrom::Current((header.nodes() * NODE_SIZE) as i64))?;

    let mut listing: Vec<ListEntry> = scan_entries(&mut reader, &header)?
        .into_iter()
        .map(|(entry, _)| ListEntry {
            name: entry.name,
            size: entry.file_size,
        })
        .collect();
    listing.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listing)
}

/// Decode every entry of an archive and hand verified bytes to `emit`.
///
/// See [`ArchiveReader::extract`].
pub fn extract<R, F>(reader: R, emit: F) -> Result<ExtractReport>
where
    R: Read + Seek,
    F: FnMut(&FileEntry, &[u8]) -> std::io::Result<()>,
{
    ArchiveReader::open(reader)?.extract(emit)
}

/// Read entry headers from the current position, seeking over each payload.
///
/// Returns each entry with the stream offset of its payload.
fn scan_entries<R: Read + Seek>(
    reader: &mut R,
    header: &ArchiveHeader,
) -> Result<Vec<(FileEntry, u64)>> {
    let mut entries = Vec::with_capacity(header.files());
    for _ in 0..header.files() {
        let entry = FileEntry::read_from(reader)?;
        let offset = reader.stream_position()?;
        reader.seek(SeekFrom::Current(entry.packed_len as i64))?;
        entries.push((entry, offset));
    }

    // Seeking past the end succeeds silently, so check the last payload fits
    let position = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    if position > end {
        return Err(crate::error::ArchiveFormatError::Truncated { section: "payload" }.into());
    }
    Ok(entries)
}

/// An opened archive: header, node table and entry index.
#[derive(Debug)]
pub struct ArchiveReader<R> {
    reader: R,
    header: ArchiveHeader,
    nodes: NodeTable,
    entries: Vec<(FileEntry, u64)>,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Read and validate the header, node table and every entry header.
    ///
    /// # Errors
    /// `ArchiveFormatError` for a truncated or malformed archive, `Error::Io`
    /// for other read failures. Both are fatal for the whole archive.
    pub fn open(mut reader: R) -> Result<Self> {
        let header = ArchiveHeader::read_from(&mut reader)?;
        let nodes = NodeTable::read_from(&mut reader, &header)?;
        let entries = scan_entries(&mut reader, &header)?;

        debug!(
            nodes = nodes.len(),
            files = entries.len(),
            "opened archive"
        );

        Ok(Self {
            reader,
            header,
            nodes,
            entries,
        })
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Entry headers in archive order.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.entries.iter().map(|(entry, _)| entry)
    }

    /// Decode and verify the entry at `index` (archive order).
    ///
    /// # Errors
    /// - `Error::CorruptEntry` if the payload cannot be decoded or the
    ///   checksum does not match
    /// - `ArchiveFormatError::Truncated` / `Error::Io` if the payload cannot
    ///   be read
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn read_entry(&mut self, index: usize) -> Result<Vec<u8>> {
        let (entry, offset) = &self.entries[index];

        // Only one file's packed and decoded bytes are held at a time
        self.reader.seek(SeekFrom::Start(*offset))?;
        let mut packed = vec![0u8; entry.packed_len];
        self.reader
            .read_exact(&mut packed)
            .map_err(|e| format::truncated(e, "payload"))?;

        let corrupt = |reason: CorruptReason| Error::CorruptEntry {
            name: entry.name.clone(),
            reason,
        };

        let bytes = unpack(&packed, &self.nodes, entry.file_size)
            .map_err(|e| corrupt(CorruptReason::Undecodable(e)))?;

        let actual = checksum(&bytes);
        if actual != entry.checksum {
            return Err(corrupt(CorruptReason::ChecksumMismatch {
                expected: entry.checksum,
                actual,
            }));
        }
        Ok(bytes)
    }

    /// Decode every entry in archive order and hand verified bytes to `emit`.
    ///
    /// Corrupt entries are skipped and `emit` failures are recorded; both
    /// are reported per entry and extraction continues with the next file.
    ///
    /// # Errors
    /// Only archive-level failures (truncation, I/O on the archive itself).
    pub fn extract<F>(&mut self, mut emit: F) -> Result<ExtractReport>
    where
        F: FnMut(&FileEntry, &[u8]) -> std::io::Result<()>,
    {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(self.entries.len());

        for index in 0..self.entries.len() {
            let status = match self.read_entry(index) {
                Ok(bytes) => {
                    let entry = &self.entries[index].0;
                    match emit(entry, &bytes) {
                        Ok(()) => {
                            debug!(name = %entry.name, size = bytes.len(), "extracted file");
                            EntryStatus::Extracted
                        }
                        Err(e) => {
                            warn!(name = %entry.name, error = %e, "can't write extracted file");
                            EntryStatus::WriteFailed(e.to_string())
                        }
                    }
                }
                Err(Error::CorruptEntry { name, reason }) => {
                    warn!(%name, %reason, "corrupt entry skipped");
                    EntryStatus::Corrupt(reason)
                }
                Err(e) => return Err(e),
            };

            let entry = &self.entries[index].0;
            outcomes.push(EntryOutcome {
                name: entry.name.clone(),
                size: entry.file_size,
                status,
            });
        }

        let report = ExtractReport {
            entries: outcomes,
            duration: started.elapsed(),
        };
        info!(
            extracted = report.extracted(),
            corrupt = report.corrupt(),
            failed = report.write_failures(),
            "extracted archive"
        );
        Ok(report)
    }
}
