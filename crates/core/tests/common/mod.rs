//! Shared helpers for archive integration tests.
//!
//! Sample data mixes highly compressible runs, text-like data, short
//! repeating patterns, and incompressible random bytes, so the code tree
//! sees both skewed and flat frequency distributions.

#![allow(dead_code)] // Not every test file uses every helper

use std::io::Cursor;

use huffarc_core::{compress_to_vec, extract, ExtractReport, InputFile};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `size_bytes` of mixed-compressibility data.
pub fn sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let chunk_size = (size_bytes - data.len()).min(4096);

        match rng.gen_range(0..10u8) {
            // runs of one byte
            0..=2 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(chunk_size));
            }
            // limited alphabet, text-like
            3..=5 => {
                let alphabet = b"abcdefghijklmnopqrstuvwxyz .!,\n";
                for _ in 0..chunk_size {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }
            // repeating pattern
            6..=7 => {
                let pattern_len = rng.gen_range(4..=32);
                let pattern: Vec<u8> = (0..pattern_len).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().cycle().take(chunk_size));
            }
            // random bytes
            _ => {
                for _ in 0..chunk_size {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}

/// Compress `files`, extract the result, and return what was emitted.
pub fn round_trip(files: &[InputFile]) -> (ExtractReport, Vec<InputFile>) {
    let archive = compress_to_vec(files).expect("compress failed");
    extract_archive(&archive)
}

/// Extract an in-memory archive, collecting emitted files.
pub fn extract_archive(archive: &[u8]) -> (ExtractReport, Vec<InputFile>) {
    let mut restored = Vec::new();
    let report = extract(Cursor::new(archive), |entry, bytes| {
        restored.push(InputFile::new(entry.name.clone(), bytes));
        Ok(())
    })
    .expect("extract failed");
    (report, restored)
}
