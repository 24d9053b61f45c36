//! Run reports for compress and extract.
//!
//! Each entry operation returns a report describing what happened: sizes
//! and compression ratio for `compress`, and a per-entry outcome for
//! `extract`. Per-entry failures live here rather than in `Err`, since one
//! bad entry does not abort the batch.
//!
//! # Thread Safety
//!
//! Reports are plain values built by a single call; nothing here is shared.

use std::time::Duration;

use crate::error::CorruptReason;

/// Summary of one `compress` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressReport {
    /// Files written to the archive
    pub files: usize,

    /// Total original bytes across all files
    pub input_bytes: u64,

    /// Total packed payload bytes across all files
    pub packed_bytes: u64,

    /// Bytes written to the archive (headers, nodes, entries, payloads)
    pub archive_bytes: u64,

    /// Distinct byte values seen across all files
    pub distinct_symbols: usize,

    /// Nodes in the stored code tree
    pub node_count: usize,

    /// Wall time spent
    pub duration: Duration,
}

impl CompressReport {
    /// Archive size relative to the original data (archive / input).
    ///
    /// Returns 0.0 if there was no input data.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.archive_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Compute throughput in input bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Compression ===");
        println!("Files: {}", self.files);
        println!("Input: {} bytes", self.input_bytes);
        println!("Packed payloads: {} bytes", self.packed_bytes);
        println!("Archive: {} bytes", self.archive_bytes);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!(
            "Tree: {} symbols, {} nodes",
            self.distinct_symbols, self.node_count
        );
        println!(
            "Duration: {} ms ({:.2} MB/s)",
            self.duration.as_millis(),
            self.throughput_bps() / 1_000_000.0
        );
    }
}

/// What happened to one archived file during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// Decoded, verified, and handed to the sink
    Extracted,
    /// Failed decoding or checksum verification; nothing was written
    Corrupt(CorruptReason),
    /// Verified, but the sink failed to store it
    WriteFailed(String),
}

/// Outcome for one archived file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub name: String,
    /// Original size from the entry header
    pub size: usize,
    pub status: EntryStatus,
}

impl EntryOutcome {
    pub fn is_extracted(&self) -> bool {
        self.status == EntryStatus::Extracted
    }
}

/// Summary of one `extract` call, in archive order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub entries: Vec<EntryOutcome>,

    /// Wall time spent
    pub duration: Duration,
}

impl ExtractReport {
    /// Number of entries written out.
    pub fn extracted(&self) -> usize {
        self.entries.iter().filter(|e| e.is_extracted()).count()
    }

    /// Number of entries rejected as corrupt.
    pub fn corrupt(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Corrupt(_)))
            .count()
    }

    /// Number of verified entries the sink failed to store.
    pub fn write_failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::WriteFailed(_)))
            .count()
    }

    /// Total bytes handed to the sink.
    pub fn output_bytes(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.is_extracted())
            .map(|e| e.size as u64)
            .sum()
    }

    /// True if every entry was extracted.
    pub fn is_clean(&self) -> bool {
        self.extracted() == self.entries.len()
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Extraction ===");
        println!("Entries: {}", self.entries.len());
        println!("Extracted: {}", self.extracted());
        println!("Corrupt: {}", self.corrupt());
        println!("Write failures: {}", self.write_failures());
        println!("Output: {} bytes", self.output_bytes());
        println!("Duration: {} ms", self.duration.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, size: usize, status: EntryStatus) -> EntryOutcome {
        EntryOutcome {
            name: name.to_string(),
            size,
            status,
        }
    }

    #[test]
    fn test_compression_ratio() {
        let report = CompressReport {
            files: 1,
            input_bytes: 200,
            packed_bytes: 40,
            archive_bytes: 100,
            distinct_symbols: 4,
            node_count: 7,
            duration: Duration::from_millis(5),
        };
        assert!((report.compression_ratio() - 0.5).abs() < 1e-9);
        assert!(report.throughput_bps() > 0.0);

        let empty = CompressReport {
            input_bytes: 0,
            duration: Duration::ZERO,
            ..report
        };
        assert_eq!(empty.compression_ratio(), 0.0);
        assert_eq!(empty.throughput_bps(), 0.0);
    }

    #[test]
    fn test_extract_counts() {
        let report = ExtractReport {
            entries: vec![
                outcome("a", 10, EntryStatus::Extracted),
                outcome(
                    "b",
                    20,
                    EntryStatus::Corrupt(CorruptReason::ChecksumMismatch {
                        expected: 1,
                        actual: 2,
                    }),
                ),
                outcome("c", 30, EntryStatus::WriteFailed("denied".into())),
                outcome("d", 40, EntryStatus::Extracted),
            ],
            duration: Duration::ZERO,
        };

        assert_eq!(report.extracted(), 2);
        assert_eq!(report.corrupt(), 1);
        assert_eq!(report.write_failures(), 1);
        assert_eq!(report.output_bytes(), 50);
        assert!(!report.is_clean());
    }
}
