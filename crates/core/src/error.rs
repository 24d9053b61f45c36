//! Error types for the huffarc archiver.
//!
//! All operations return structured errors rather than panicking. Fatal
//! errors abort a whole compress/extract/list run; per-entry problems are
//! recorded in the run report instead (see [`crate::report`]).

use thiserror::Error;

/// Top-level error type for all operations in the archiver.
///
/// Each variant corresponds to a specific failure domain:
/// - Heap: priority queue misuse during tree construction
/// - Encode: Huffman payload packing
/// - Corrupt entry: one archived file failed decoding or its checksum
/// - Input: files handed to `compress` cannot be archived
/// - Archive format: the archive being read is truncated or malformed
/// - I/O: reading or writing the archive stream
#[derive(Debug, Error)]
pub enum Error {
    /// Priority queue misuse (internal error)
    #[error("priority queue error: {0}")]
    Heap(#[from] HeapError),

    /// Packing a file's bytes into codes failed
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Input files cannot be archived
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Archive is unreadable, truncated, or malformed
    #[error("archive format error: {0}")]
    ArchiveFormat(#[from] ArchiveFormatError),

    /// One archived file failed verification
    #[error("{name} is CORRUPT: {reason}")]
    CorruptEntry { name: String, reason: CorruptReason },

    /// Archive stream I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Priority queue errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapError {
    /// `extract_min` on a queue with no elements
    #[error("extract_min called on an empty queue")]
    EmptyQueue,
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream at bit {position}")]
    UnexpectedEof { position: usize },
}

/// Payload encoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A byte occurs in the input but has no code in the table
    #[error("byte {0:#04x} has no code in the code table")]
    MissingCode(u8),

    /// Packed payload does not fit the 32-bit byte count field
    #[error("packed payload of {bits} bits exceeds the format limit")]
    PayloadTooLarge { bits: u64 },
}

/// Why a single archived file was rejected during extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CorruptReason {
    /// Decoded bytes do not sum to the stored checksum
    #[error("checksum expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Packed payload could not be walked through the code tree
    #[error("{0}")]
    Undecodable(#[from] DecodeError),
}

/// Payload decoding errors. These mark a single entry as corrupt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Ran out of packed bits before decoding `file_size` symbols
    #[error("payload exhausted after {decoded} of {expected} symbols")]
    PayloadExhausted { decoded: usize, expected: usize },

    /// A bit steered the walk onto an absent child
    #[error("bit {position} leads to a missing child of node {node}")]
    MissingChild { node: usize, position: usize },

    /// Entry has symbols to decode but the archive has no code tree
    #[error("entry has {expected} symbols but the archive has no code tree")]
    NoTree { expected: usize },
}

/// Errors about the files handed to `compress`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Nothing to archive
    #[error("no input files")]
    NoInputFiles,

    /// More files than the 16-bit file count can hold
    #[error("too many input files: {count} (max {max})")]
    TooManyFiles { count: usize, max: usize },

    /// Name does not fit the fixed-size name field
    #[error("file name {name:?} is {len} bytes long (max {max})")]
    NameTooLong { name: String, len: usize, max: usize },

    /// Name is empty or contains a nul byte
    #[error("invalid file name {0:?}")]
    InvalidName(String),

    /// File does not fit the 32-bit size field
    #[error("{name} is {size} bytes long (max {max})")]
    FileTooLarge { name: String, size: usize, max: usize },
}

/// Archive layout errors on read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchiveFormatError {
    /// The archive ended in the middle of a structure
    #[error("archive truncated while reading {section}")]
    Truncated { section: &'static str },

    /// A count or size field holds a negative value
    #[error("negative {field}: {value}")]
    NegativeField { field: &'static str, value: i64 },

    /// More nodes than an 8-bit alphabet can produce
    #[error("node count {count} exceeds maximum {max}")]
    TooManyNodes { count: usize, max: usize },

    /// Root index does not address a node
    #[error("root index {root} out of range for {count} nodes")]
    InvalidRoot { root: usize, count: usize },

    /// Root is a leaf, so decoding would consume no bits
    #[error("root node {root} is a leaf")]
    LeafRoot { root: usize },

    /// Child index is out of range or does not point forward
    #[error("node {node} has invalid child index {child}")]
    InvalidChild { node: usize, child: i16 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
