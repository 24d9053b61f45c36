//! Packing file bytes into Huffman bit streams and back.
//!
//! [`pack`] concatenates the code of every byte into one MSB-first bit
//! stream. [`unpack`] walks the archive's node table one bit at a time and
//! emits a symbol at every leaf, stopping after exactly the number of
//! symbols recorded in the file entry so padding bits are never consulted.

use crate::bitio::{BitReader, BitWriter};
use crate::codes::CodeTable;
use crate::error::{DecodeError, EncodeError};
use crate::format::NodeTable;

/// Encode `bytes` with `codes`.
///
/// The result is exactly `codes.packed_len(bytes)` bytes long.
///
/// # Errors
/// - `EncodeError::MissingCode` if a byte has no code
/// - `EncodeError::PayloadTooLarge` if the payload exceeds the format limit
pub fn pack(bytes: &[u8], codes: &CodeTable) -> Result<Vec<u8>, EncodeError> {
    let mut writer = BitWriter::with_capacity(codes.packed_len(bytes)?);
    for &b in bytes {
        let code = codes.get(b).ok_or(EncodeError::MissingCode(b))?;
        writer.write_code(code);
    }
    Ok(writer.finish())
}

/// Decode `count` symbols from `packed` using the archive's node table.
///
/// # Errors
/// - `DecodeError::NoTree` if `count > 0` but the table is empty
/// - `DecodeError::PayloadExhausted` if the bits run out early
/// - `DecodeError::MissingChild` if a bit selects an absent child
pub fn unpack(packed: &[u8], nodes: &NodeTable, count: usize) -> Result<Vec<u8>, DecodeError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let root = nodes.root().ok_or(DecodeError::NoTree { expected: count })?;

    let mut reader = BitReader::new(packed);
    // Every symbol costs at least one bit, so `count` beyond that is a lie
    let mut out = Vec::with_capacity(count.min(packed.len().saturating_mul(8)));

    while out.len() < count {
        let mut index = root;
        loop {
            let node = nodes.node(index);
            if node.is_leaf() {
                out.push(node.value);
                break;
            }

            let position = reader.position();
            let bit = reader
                .read_bit()
                .map_err(|_| DecodeError::PayloadExhausted {
                    decoded: out.len(),
                    expected: count,
                })?;
            index = node
                .child(bit)
                .ok_or(DecodeError::MissingChild { node: index, position })?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;

    fn build(data: &[u8]) -> (CodeTable, NodeTable) {
        let mut table = FrequencyTable::new();
        table.add_file(data);
        let tree = HuffmanTree::build(&table).unwrap();
        (CodeTable::from_tree(&tree), tree.to_node_table())
    }

    #[test]
    fn test_pack_unpack_text() {
        let data = b"she sells sea shells by the sea shore";
        let (codes, nodes) = build(data);

        let packed = pack(data, &codes).unwrap();
        assert_eq!(packed.len(), codes.packed_len(data).unwrap());
        assert!(packed.len() < data.len());

        let unpacked = unpack(&packed, &nodes, data.len()).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_pack_bit_layout() {
        // x -> 0, y -> 1
        let (codes, _) = build(b"xyy");
        let packed = pack(b"yxyyxxxyy", &codes).unwrap();
        assert_eq!(packed, vec![0b1011_0001, 0b1000_0000]);
    }

    #[test]
    fn test_single_symbol_one_bit_each() {
        let data = [0x41u8; 5];
        let (codes, nodes) = build(&data);

        let packed = pack(&data, &codes).unwrap();
        assert_eq!(packed, vec![0x00]);

        let unpacked = unpack(&packed, &nodes, 5).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_single_symbol_set_bit_is_missing_child() {
        let (_, nodes) = build(&[0x41; 5]);
        let result = unpack(&[0b0010_0000], &nodes, 5);
        assert_eq!(
            result,
            Err(DecodeError::MissingChild {
                node: 0,
                position: 2
            })
        );
    }

    #[test]
    fn test_zero_count_skips_decoding() {
        let empty = NodeTable::new(Vec::new(), 0).unwrap();
        assert_eq!(unpack(&[], &empty, 0).unwrap(), Vec::<u8>::new());
        assert_eq!(
            unpack(&[0xFF], &empty, 1),
            Err(DecodeError::NoTree { expected: 1 })
        );
    }

    #[test]
    fn test_payload_exhausted() {
        let data = b"abcdefgh";
        let (codes, nodes) = build(data);
        let packed = pack(data, &codes).unwrap();

        let result = unpack(&packed[..1], &nodes, data.len());
        assert!(matches!(
            result,
            Err(DecodeError::PayloadExhausted { expected: 8, .. })
        ));
    }

    #[test]
    fn test_oversized_count_fails_fast() {
        let data = b"abcdefgh";
        let (codes, nodes) = build(data);
        let packed = pack(data, &codes).unwrap();

        let result = unpack(&packed[..1], &nodes, i32::MAX as usize);
        assert!(matches!(
            result,
            Err(DecodeError::PayloadExhausted {
                expected,
                ..
            }) if expected == i32::MAX as usize
        ));
    }

    #[test]
    fn test_padding_bits_never_read() {
        let data = b"aab";
        let (codes, nodes) = build(data);
        let mut packed = pack(data, &codes).unwrap();
        assert_eq!(packed.len(), 1);

        // Garbage in the pad bits must not change the result
        packed[0] |= 0b0000_0111;
        assert_eq!(unpack(&packed, &nodes, 3).unwrap(), data);
    }

    #[test]
    fn test_all_symbols() {
        let data: Vec<u8> = (0..=255).collect();
        let (codes, nodes) = build(&data);

        // Uniform frequencies over 256 symbols give 8-bit codes
        assert!(codes.iter().all(|(_, c)| c.len() == 8));
        let packed = pack(&data, &codes).unwrap();
        assert_eq!(packed.len(), 256);
        assert_eq!(unpack(&packed, &nodes, data.len()).unwrap(), data);
    }
}
