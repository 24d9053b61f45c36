//! Collecting input files for compression.
//!
//! Each path is read whole into memory. The stored name is the path's base
//! name cut to the archive's name field; when two inputs end up with the
//! same stored name, only the first is kept. Files that can't be read are
//! skipped. Neither case stops the run.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use huffarc_core::error::InputError;
use huffarc_core::format::MAX_NAME_LEN;
use huffarc_core::InputFile;
use tracing::debug;

/// Why an input path was left out of the archive.
#[derive(Debug)]
pub enum SkipReason {
    /// Opening or reading the file failed
    Unreadable(io::Error),
    /// An earlier input already uses this stored name
    Duplicate(String),
    /// The path has no usable file name component
    NoFileName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(e) => write!(f, "can't be opened: {e}"),
            SkipReason::Duplicate(name) => write!(f, "duplicate name {name:?}"),
            SkipReason::NoFileName => write!(f, "has no file name"),
        }
    }
}

/// An input path that was skipped.
#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Files accepted for the archive plus those skipped along the way.
#[derive(Debug)]
pub struct Inputs {
    pub files: Vec<InputFile>,
    pub skipped: Vec<Skipped>,
}

/// Cut `name` to at most `max` bytes without splitting a character.
pub fn truncate_name(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Stored name for `path`: its base name cut to the name field.
pub fn stored_name(path: &Path) -> Option<String> {
    let base = path.file_name()?.to_string_lossy();
    let name = truncate_name(&base, MAX_NAME_LEN);
    (!name.is_empty() && !name.contains('\0')).then(|| name.to_string())
}

/// Read every path in order.
///
/// # Errors
/// `InputError::NoInputFiles` if none of the paths could be used.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Inputs, InputError> {
    let mut files: Vec<InputFile> = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        let path = path.as_ref();

        let Some(name) = stored_name(path) else {
            skipped.push(Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::NoFileName,
            });
            continue;
        };

        if files.iter().any(|f| f.name == name) {
            skipped.push(Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::Duplicate(name),
            });
            continue;
        }

        match fs::read(path) {
            Ok(data) => {
                debug!(path = %path.display(), %name, size = data.len(), "read input");
                files.push(InputFile::new(name, data));
            }
            Err(e) => skipped.push(Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::Unreadable(e),
            }),
        }
    }

    if files.is_empty() {
        return Err(InputError::NoInputFiles);
    }
    Ok(Inputs { files, skipped })
}
