//! On-disk archive layout.
//!
//! An archive is self-describing: it carries the code tree it was packed
//! with, followed by one entry header and payload per file.
//!
//! # Archive Format
//!
//! All integers are little-endian and fixed width, with no padding.
//!
//! ```text
//! +--------------------------+
//! | node_count (2)           |  i16 nodes in the code tree
//! | root_index (2)           |  u16 index of the root node (always 0 on write)
//! | file_count (2)           |  i16 number of file entries
//! +--------------------------+
//! | node[node_count]         |  5 bytes each, breadth-first order:
//! |   value (1)              |    u8 symbol (leaves only)
//! |   left (2)               |    i16 child index, -1 if absent
//! |   right (2)              |    i16 child index, -1 if absent
//! +--------------------------+
//! | repeated file_count:     |
//! |   file_name (30)         |    nul-terminated, at most 29 bytes
//! |   file_size (4)          |    i32 original byte count
//! |   packed_len (4)         |    i32 payload byte count
//! |   checksum (4)           |    u32 wrapping sum of original bytes
//! |   payload (packed_len)   |    MSB-first Huffman bits, zero padded
//! +--------------------------+
//! ```
//!
//! There is no magic number and no delimiter between payloads; each entry's
//! `packed_len` says exactly where the next entry header starts.

use std::io::{self, Read, Write};

use crate::error::{ArchiveFormatError, Error, InputError, Result};

/// Size of [`ArchiveHeader`] on disk.
pub const HEADER_SIZE: usize = 6;

/// Size of one [`SerializedNode`] on disk.
pub const NODE_SIZE: usize = 5;

/// Size of one [`FileEntry`] header on disk (payload excluded).
pub const ENTRY_SIZE: usize = NAME_FIELD_LEN + 12;

/// Width of the fixed name field, terminator included.
pub const NAME_FIELD_LEN: usize = 30;

/// Longest storable file name in bytes.
pub const MAX_NAME_LEN: usize = NAME_FIELD_LEN - 1;

/// Upper bound on tree nodes: 256 leaves plus 255 merges.
pub const MAX_NODES: usize = 511;

/// Most entries a 16-bit file count can describe.
pub const MAX_FILES: usize = i16::MAX as usize;

/// Largest file (and payload) a 32-bit size field can describe.
pub const MAX_FILE_SIZE: usize = i32::MAX as usize;

/// Read exactly `N` bytes, reporting a short read as a truncated `section`.
fn read_array<R: Read, const N: usize>(reader: &mut R, section: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| truncated(e, section))?;
    Ok(buf)
}

/// Map `UnexpectedEof` to `ArchiveFormatError::Truncated`, keep other I/O errors.
pub(crate) fn truncated(err: io::Error, section: &'static str) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ArchiveFormatError::Truncated { section }.into()
    } else {
        Error::Io(err)
    }
}

fn non_negative(value: i64, field: &'static str) -> Result<usize> {
    if value < 0 {
        return Err(ArchiveFormatError::NegativeField { field, value }.into());
    }
    Ok(value as usize)
}

/// Fixed-size archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub node_count: i16,
    pub root_index: u16,
    pub file_count: i16,
}

impl ArchiveHeader {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.node_count.to_le_bytes())?;
        writer.write_all(&self.root_index.to_le_bytes())?;
        writer.write_all(&self.file_count.to_le_bytes())
    }

    /// Read and validate a header.
    ///
    /// # Errors
    /// - `ArchiveFormatError::Truncated` if fewer than 6 bytes are available
    /// - `ArchiveFormatError::NegativeField` for a negative count
    /// - `ArchiveFormatError::TooManyNodes` if `node_count > 511`
    /// - `ArchiveFormatError::InvalidRoot` if the root index is out of range
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let buf: [u8; HEADER_SIZE] = read_array(reader, "archive header")?;
        let header = Self {
            node_count: i16::from_le_bytes([buf[0], buf[1]]),
            root_index: u16::from_le_bytes([buf[2], buf[3]]),
            file_count: i16::from_le_bytes([buf[4], buf[5]]),
        };

        let nodes = non_negative(header.node_count.into(), "node count")?;
        non_negative(header.file_count.into(), "file count")?;

        if nodes > MAX_NODES {
            return Err(ArchiveFormatError::TooManyNodes {
                count: nodes,
                max: MAX_NODES,
            }
            .into());
        }
        if nodes > 0 && header.root_index as usize >= nodes {
            return Err(ArchiveFormatError::InvalidRoot {
                root: header.root_index as usize,
                count: nodes,
            }
            .into());
        }

        Ok(header)
    }

    /// Node count as an index bound. Only meaningful on a validated header.
    pub fn nodes(&self) -> usize {
        self.node_count.max(0) as usize
    }

    /// File count as a length. Only meaningful on a validated header.
    pub fn files(&self) -> usize {
        self.file_count.max(0) as usize
    }
}

/// One code tree node as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializedNode {
    /// Symbol (leaves only; 0 for internal nodes)
    pub value: u8,
    /// Index of the left child, -1 if absent
    pub left: i16,
    /// Index of the right child, -1 if absent
    pub right: i16,
}

impl SerializedNode {
    pub fn is_leaf(&self) -> bool {
        self.left == -1 && self.right == -1
    }

    /// Child to follow for a bit: `false` (0) goes left, `true` (1) right.
    pub fn child(&self, bit: bool) -> Option<usize> {
        let index = if bit { self.right } else { self.left };
        (index >= 0).then_some(index as usize)
    }

    fn to_bytes(self) -> [u8; NODE_SIZE] {
        let [l0, l1] = self.left.to_le_bytes();
        let [r0, r1] = self.right.to_le_bytes();
        [self.value, l0, l1, r0, r1]
    }

    fn from_bytes(buf: [u8; NODE_SIZE]) -> Self {
        Self {
            value: buf[0],
            left: i16::from_le_bytes([buf[1], buf[2]]),
            right: i16::from_le_bytes([buf[3], buf[4]]),
        }
    }
}

/// The flat node table a decoder walks.
///
/// # Invariants
/// - Every child index is -1 or points strictly forward and in range, so any
///   walk from the root terminates within `len()` steps
/// - `root < len()` whenever the table is nonempty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTable {
    nodes: Vec<SerializedNode>,
    root: usize,
}

impl NodeTable {
    /// Wrap nodes produced by a breadth-first walk (root at index 0).
    pub(crate) fn from_tree_order(nodes: Vec<SerializedNode>) -> Self {
        Self { nodes, root: 0 }
    }

    /// Validate a node table read from an archive.
    ///
    /// # Errors
    /// - `ArchiveFormatError::InvalidRoot` if `root` is out of range
    /// - `ArchiveFormatError::LeafRoot` if the root has no children
    /// - `ArchiveFormatError::InvalidChild` for a child index that is out of
    ///   range or does not point forward
    pub fn new(nodes: Vec<SerializedNode>, root: usize) -> Result<Self> {
        if nodes.len() > MAX_NODES {
            return Err(ArchiveFormatError::TooManyNodes {
                count: nodes.len(),
                max: MAX_NODES,
            }
            .into());
        }
        if !nodes.is_empty() && root >= nodes.len() {
            return Err(ArchiveFormatError::InvalidRoot {
                root,
                count: nodes.len(),
            }
            .into());
        }
        if nodes.get(root).is_some_and(SerializedNode::is_leaf) {
            return Err(ArchiveFormatError::LeafRoot { root }.into());
        }

        for (i, node) in nodes.iter().enumerate() {
            for child in [node.left, node.right] {
                if child == -1 {
                    continue;
                }
                if child < 0 || child as usize <= i || child as usize >= nodes.len() {
                    return Err(ArchiveFormatError::InvalidChild { node: i, child }.into());
                }
            }
        }

        Ok(Self { nodes, root })
    }

    /// Read `header.node_count` nodes and validate them.
    pub fn read_from<R: Read>(reader: &mut R, header: &ArchiveHeader) -> Result<Self> {
        let mut nodes = Vec::with_capacity(header.nodes());
        for _ in 0..header.nodes() {
            let buf: [u8; NODE_SIZE] = read_array(reader, "node table")?;
            nodes.push(SerializedNode::from_bytes(buf));
        }
        Self::new(nodes, header.root_index as usize)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for node in &self.nodes {
            writer.write_all(&node.to_bytes())?;
        }
        Ok(())
    }

    /// Root index, or `None` for an empty table.
    pub fn root(&self) -> Option<usize> {
        (!self.nodes.is_empty()).then_some(self.root)
    }

    /// Node at `index`.
    ///
    /// # Panics
    /// If `index` is out of range. Indices obtained from [`Self::root`] and
    /// [`SerializedNode::child`] are always in range.
    pub fn node(&self, index: usize) -> &SerializedNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Per-file header that precedes each packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, at most [`MAX_NAME_LEN`] bytes
    pub name: String,
    /// Original byte count
    pub file_size: usize,
    /// Number of packed payload bytes that follow the header
    pub packed_len: usize,
    /// Wrapping sum of the original bytes
    pub checksum: u32,
}

impl FileEntry {
    /// Create an entry, checking that every field fits the on-disk layout.
    ///
    /// # Errors
    /// - `InputError::InvalidName` if the name is empty or contains a nul
    /// - `InputError::NameTooLong` if the name exceeds 29 bytes
    /// - `InputError::FileTooLarge` if a size exceeds `i32::MAX`
    pub fn new(name: &str, file_size: usize, packed_len: usize, checksum: u32) -> Result<Self> {
        validate_name(name)?;
        for size in [file_size, packed_len] {
            if size > MAX_FILE_SIZE {
                return Err(InputError::FileTooLarge {
                    name: name.to_string(),
                    size,
                    max: MAX_FILE_SIZE,
                }
                .into());
            }
        }

        Ok(Self {
            name: name.to_string(),
            file_size,
            packed_len,
            checksum,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut name = [0u8; NAME_FIELD_LEN];
        let bytes = self.name.as_bytes();
        let len = bytes.len().min(MAX_NAME_LEN);
        name[..len].copy_from_slice(&bytes[..len]);

        writer.write_all(&name)?;
        writer.write_all(&(self.file_size as i32).to_le_bytes())?;
        writer.write_all(&(self.packed_len as i32).to_le_bytes())?;
        writer.write_all(&self.checksum.to_le_bytes())
    }

    /// Read one entry header.
    ///
    /// The name ends at the first nul byte (or the end of the field). Names
    /// that are not valid UTF-8 are decoded lossily.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let buf: [u8; ENTRY_SIZE] = read_array(reader, "file entry")?;

        let name_field = &buf[..NAME_FIELD_LEN];
        let name_len = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_LEN);
        let name = String::from_utf8_lossy(&name_field[..name_len]).into_owned();

        let at = NAME_FIELD_LEN;
        let file_size = i32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let packed_len = i32::from_le_bytes([buf[at + 4], buf[at + 5], buf[at + 6], buf[at + 7]]);
        let checksum = u32::from_le_bytes([buf[at + 8], buf[at + 9], buf[at + 10], buf[at + 11]]);

        Ok(Self {
            name,
            file_size: non_negative(file_size.into(), "file size")?,
            packed_len: non_negative(packed_len.into(), "packed byte count")?,
            checksum,
        })
    }
}

/// Check that `name` fits the fixed-size, nul-terminated name field.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.as_bytes().contains(&0) {
        return Err(InputError::InvalidName(name.to_string()).into());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(InputError::NameTooLong {
            name: name.to_string(),
            len: name.len(),
            max: MAX_NAME_LEN,
        }
        .into());
    }
    Ok(())
}
