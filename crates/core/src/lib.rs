//! huffarc-core: multi-file Huffman archives
//!
//! This library implements a self-describing archive format that stores
//! several files compressed with a single shared Huffman code:
//! - Counts byte frequencies across every input file
//! - Builds the code tree with a comparator-driven min-heap
//! - Packs each file's codes MSB-first into a payload
//! - Stores the tree, per-file headers with checksums, and payloads
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `heap`: Generic min-heap with a caller-supplied comparator
//! - `queue`: FIFO queue for breadth-first tree flattening
//! - `frequency`: Archive-wide symbol counts, per-file size and checksum
//! - `tree`: Huffman tree construction and breadth-first node table
//! - `codes`: Per-symbol bit codes
//! - `bitio`: Low-level bit reading/writing
//! - `packer`: Payload packing and tree-walking decode
//! - `format`: On-disk header, node and entry layout
//! - `archive`: compress / list / extract entry points
//! - `report`: Run summaries and per-entry outcomes
//!
//! # Example
//! ```
//! use std::io::Cursor;
//! use huffarc_core::{compress_to_vec, extract, list, InputFile};
//!
//! let files = vec![
//!     InputFile::new("b.txt", "banana"),
//!     InputFile::new("a.txt", "abracadabra"),
//! ];
//! let archive = compress_to_vec(&files)?;
//!
//! let names: Vec<_> = list(Cursor::new(&archive))?
//!     .into_iter()
//!     .map(|e| e.name)
//!     .collect();
//! assert_eq!(names, ["a.txt", "b.txt"]);
//!
//! let mut restored = Vec::new();
//! let report = extract(Cursor::new(&archive), |entry, bytes| {
//!     restored.push((entry.name.clone(), bytes.to_vec()));
//!     Ok(())
//! })?;
//! assert!(report.is_clean());
//! assert_eq!(restored[1].1, b"abracadabra");
//! # Ok::<(), huffarc_core::Error>(())
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured; corrupt archives are rejected
//!   or reported, never trusted
//! - **Partial failure**: One corrupt entry does not abort an extraction
//! - **Bounded memory**: Payloads are written and decoded one file at a time

pub mod archive;
pub mod bitio;
pub mod codes;
pub mod error;
pub mod format;
pub mod frequency;
pub mod heap;
pub mod packer;
pub mod queue;
pub mod report;
pub mod tree;

// Re-export commonly used types
pub use archive::{compress, compress_to_vec, extract, list, ArchiveReader, InputFile, ListEntry};
pub use error::{Error, Result};
pub use report::{CompressReport, EntryOutcome, EntryStatus, ExtractReport};
