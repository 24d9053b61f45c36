//! Archive-wide byte statistics.
//!
//! Symbol frequencies are accumulated over every input file combined, so a
//! single code tree serves the whole archive. Each file additionally gets
//! its own size and additive checksum, which end up in its file entry.

/// Number of distinct symbols in the alphabet.
pub const SYMBOL_COUNT: usize = 256;

/// Wrapping 32-bit sum of all byte values.
///
/// This is an error-detection aid, not an integrity guarantee: reordering
/// bytes or compensating flips go unnoticed.
pub fn checksum(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(u32::from(b)))
}

/// Size and checksum of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// Original byte count
    pub size: usize,
    /// Additive checksum of the original bytes
    pub checksum: u32,
}

/// Occurrence count per byte value, summed across files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Create a table with every count at zero.
    pub fn new() -> Self {
        Self {
            counts: [0; SYMBOL_COUNT],
        }
    }

    /// Count the bytes of one more file and return its size and checksum.
    pub fn add_file(&mut self, bytes: &[u8]) -> FileStats {
        let mut sum = 0u32;
        for &b in bytes {
            self.counts[b as usize] += 1;
            sum = sum.wrapping_add(u32::from(b));
        }
        FileStats {
            size: bytes.len(),
            checksum: sum,
        }
    }

    /// Build a table over several files, returning per-file stats in order.
    pub fn from_files<'a, I>(files: I) -> (Self, Vec<FileStats>)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut table = Self::new();
        let stats = files.into_iter().map(|bytes| table.add_file(bytes)).collect();
        (table, stats)
    }

    /// Occurrences of `symbol` so far.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Symbols with a nonzero count, in ascending byte order.
    pub fn present_symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of distinct symbols seen.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_across_files() {
        let a: &[u8] = b"aab";
        let b: &[u8] = b"bc";
        let (table, stats) = FrequencyTable::from_files([a, b]);

        assert_eq!(table.count(b'a'), 2);
        assert_eq!(table.count(b'b'), 2);
        assert_eq!(table.count(b'c'), 1);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.distinct_symbols(), 3);
        assert_eq!(table.total(), 5);

        assert_eq!(stats[0], FileStats { size: 3, checksum: 97 + 97 + 98 });
        assert_eq!(stats[1], FileStats { size: 2, checksum: 98 + 99 });
    }

    #[test]
    fn test_present_symbols_ascending() {
        let mut table = FrequencyTable::new();
        table.add_file(&[200, 3, 3, 100]);

        let present: Vec<_> = table.present_symbols().collect();
        assert_eq!(present, vec![(3, 2), (100, 1), (200, 1)]);
    }

    #[test]
    fn test_empty_file() {
        let mut table = FrequencyTable::new();
        let stats = table.add_file(&[]);
        assert_eq!(stats, FileStats { size: 0, checksum: 0 });
        assert_eq!(table.distinct_symbols(), 0);
    }

    #[test]
    fn test_checksum_wraps() {
        // 2^24 + 1 bytes of 0xFF overflow a u32 sum
        let data = vec![0xFFu8; (1 << 24) + 1];
        let expected = (0xFFu64 * data.len() as u64) as u32;
        assert_eq!(checksum(&data), expected);
        assert_eq!(FrequencyTable::new().add_file(&data).checksum, expected);
    }
}
