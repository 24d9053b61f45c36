//! Per-symbol bit codes derived from the code tree.
//!
//! A depth-first walk appends `0` when descending left and `1` when
//! descending right; the path accumulated at a leaf is that leaf's code.
//! Because codes are leaf paths in a binary tree, no code is a prefix of
//! another.

use std::fmt;

use crate::error::EncodeError;
use crate::format::MAX_FILE_SIZE;
use crate::frequency::SYMBOL_COUNT;
use crate::tree::{HuffmanTree, TreeNode};

/// A variable-length bit string, first bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Code for every symbol present in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Derive codes from `tree`. An empty tree yields an empty table.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; SYMBOL_COUNT];
        if let Some(root) = tree.root() {
            let mut path = Vec::new();
            collect(root, &mut path, &mut codes);
        }
        Self { codes }
    }

    /// Code for `symbol`, if it occurs in the archive.
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u8, c)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of bits needed to encode `bytes`.
    ///
    /// # Errors
    /// `EncodeError::MissingCode` for a byte with no code.
    pub fn bit_len(&self, bytes: &[u8]) -> Result<u64, EncodeError> {
        bytes.iter().try_fold(0u64, |bits, &b| {
            let code = self.get(b).ok_or(EncodeError::MissingCode(b))?;
            Ok(bits + code.len() as u64)
        })
    }

    /// Packed byte count for `bytes`: `ceil(bit_len / 8)`.
    ///
    /// # Errors
    /// - `EncodeError::MissingCode` for a byte with no code
    /// - `EncodeError::PayloadTooLarge` if the result does not fit an `i32`
    pub fn packed_len(&self, bytes: &[u8]) -> Result<usize, EncodeError> {
        let bits = self.bit_len(bytes)?;
        let packed = bits.div_ceil(8);
        if packed > MAX_FILE_SIZE as u64 {
            return Err(EncodeError::PayloadTooLarge { bits });
        }
        Ok(packed as usize)
    }
}

fn collect(node: &TreeNode, path: &mut Vec<bool>, codes: &mut [Option<Code>]) {
    if node.is_leaf() {
        codes[node.symbol as usize] = Some(Code(path.clone()));
        return;
    }
    if let Some(left) = node.left.as_deref() {
        path.push(false);
        collect(left, path, codes);
        path.pop();
    }
    if let Some(right) = node.right.as_deref() {
        path.push(true);
        collect(right, path, codes);
        path.pop();
    }
}
